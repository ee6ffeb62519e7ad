use image::ImageFormat;

use crate::error::EstimateError;

/// Formats the vision model accepts, keyed by what the magic bytes say.
fn supported_mime(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        _ => None,
    }
}

/// Sniff and decode the upload, returning the MIME type to send upstream.
///
/// The sniffed type wins over whatever the client declared; a mismatch is
/// only logged. Content that does not decode is rejected so a corrupt file
/// never reaches the model.
pub fn detect_image_mime(bytes: &[u8], declared: Option<&str>) -> Result<&'static str, EstimateError> {
    let format = image::guess_format(bytes).map_err(|_| {
        EstimateError::UnsupportedImage(format!(
            "content is not a recognised image (declared {})",
            declared.unwrap_or("nothing")
        ))
    })?;

    let mime = supported_mime(format)
        .ok_or_else(|| EstimateError::UnsupportedImage(format!("{:?} images are not supported", format)))?;

    let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        EstimateError::UnsupportedImage(format!("corrupt {} content: {}", mime, e))
    })?;
    log::debug!("🖼️ Decoded {} upload ({:?})", mime, img.color());

    if let Some(declared) = declared {
        let declared = declared.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if declared != mime && declared != "application/octet-stream" {
            log::warn!("⚠️ Upload declared {} but looks like {}, using {}", declared, mime, mime);
        }
    }

    Ok(mime)
}
