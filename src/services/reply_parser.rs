//! Best-effort extraction of a JSON object from a model reply.
//!
//! Models do not always honour "strict JSON" instructions: replies come back
//! wrapped in prose or code fences. Parsing never fails; a reply with nothing
//! recoverable yields an empty map and the caller treats every field as unknown.

use serde_json::{Map, Value};

type Strategy = fn(&str) -> Option<Map<String, Value>>;

/// Tried in order, first hit wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("strict", parse_strict),
    ("first balanced block", parse_first_balanced_block),
];

pub fn parse_reply(text: &str) -> Map<String, Value> {
    for (name, strategy) in STRATEGIES {
        if let Some(map) = strategy(text) {
            log::debug!("🧩 Parsed model reply with '{}' strategy", name);
            return map;
        }
    }

    log::warn!(
        "⚠️ No JSON object in model reply, returning sparse result (first 200 chars): {}",
        &text[..floor_char_boundary(text, 200)]
    );
    Map::new()
}

fn parse_strict(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_first_balanced_block(text: &str) -> Option<Map<String, Value>> {
    let block = first_balanced_block(text)?;
    parse_strict(block)
}

/// Slice from the first `{` to its matching `}`, counting depth and skipping
/// braces inside string literals. Later blocks are never considered.
pub fn first_balanced_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset;
                    return Some(&text[start..=end]);
                }
            }
            _ => {}
        }
    }

    None
}

fn floor_char_boundary(text: &str, max: usize) -> usize {
    if text.len() <= max {
        return text.len();
    }
    let mut idx = max;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
