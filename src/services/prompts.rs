use crate::models::EstimationRequest;

/// Shared output contract for both input modes.
const JSON_CONTRACT: &str = "Return STRICT JSON with keys: \
     dish (string), estimated_carbon_kg (number), ingredients (array of {name, carbon_kg}). \
     Use reasonable, order-of-magnitude values in kg CO2e. \
     Do not include any extra commentary, markdown or code fences.";

pub fn build_instruction_for_text(dish: &str) -> String {
    format!(
        "You are a sustainability assistant. Given a dish name, infer 3-8 likely ingredients \
         and estimate their carbon footprint in kg CO2e each. {}\n\nDish: {}",
        JSON_CONTRACT, dish
    )
}

pub fn build_instruction_for_image() -> String {
    format!(
        "You are a vision sustainability assistant. First identify the food dish in the image \
         (or its main ingredients if the dish is unclear). Then infer 3-8 likely ingredients \
         and estimate their carbon footprint in kg CO2e each, using your best guess of the \
         dish name for the dish field. {}",
        JSON_CONTRACT
    )
}

pub fn build_instruction(request: &EstimationRequest) -> String {
    match request {
        EstimationRequest::Dish(name) => build_instruction_for_text(name),
        EstimationRequest::Image { .. } => build_instruction_for_image(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prompt_names_fields_and_dish() {
        let prompt = build_instruction_for_text("Chicken Biryani");

        assert!(prompt.contains("STRICT JSON"));
        assert!(prompt.contains("estimated_carbon_kg"));
        assert!(prompt.contains("ingredients"));
        assert!(prompt.ends_with("Dish: Chicken Biryani"));
    }

    #[test]
    fn test_dish_is_forwarded_verbatim() {
        let odd = "{not a dish} \"quoted\"";
        let prompt = build_instruction(&EstimationRequest::Dish(odd.to_string()));
        assert!(prompt.contains(odd));
    }

    #[test]
    fn test_image_prompt_identifies_first() {
        let prompt = build_instruction(&EstimationRequest::Image {
            bytes: vec![],
            mime_type: "image/jpeg".to_string(),
        });

        assert!(prompt.contains("First identify the food dish"));
        assert!(prompt.contains("STRICT JSON"));
        assert!(!prompt.contains("Dish:"));
    }
}
