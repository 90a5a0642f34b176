//! Uploaded image checks
//!
//! Runs before any model call: the image must be present, decode as base64,
//! sniff as JPEG/PNG/WEBP and stay under the size ceiling.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::ai::InlineImage;

const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// A decoded, type-checked upload
#[derive(Debug, Clone)]
pub struct CheckedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl CheckedImage {
    /// Hex SHA-256 of the decoded bytes
    pub fn sha256_hex(&self) -> String {
        Sha256::digest(&self.bytes)
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    pub fn to_inline(&self) -> InlineImage {
        InlineImage {
            mime_type: self.mime_type.clone(),
            data_base64: STANDARD.encode(&self.bytes),
        }
    }
}

/// Check one image field
///
/// `field` names the request field in error messages.
pub fn check_image(field: &str, value: Option<&str>, max_bytes: usize) -> Result<CheckedImage, String> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Missing required field: {}", field))?;

    // Browsers send data URLs: "data:image/png;base64,...."
    let payload = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| format!("{} is not valid base64", field))?;

    if bytes.is_empty() {
        return Err(format!("{} is empty", field));
    }
    if bytes.len() > max_bytes {
        return Err(format!(
            "{} is {} bytes, larger than the {} byte limit",
            field,
            bytes.len(),
            max_bytes
        ));
    }

    let mime_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| ACCEPTED_MIME_TYPES.contains(mime))
        .ok_or_else(|| format!("{} must be a JPEG, PNG or WEBP image", field))?;

    Ok(CheckedImage {
        mime_type: mime_type.to_string(),
        bytes,
    })
}

/// Check an optional image field; absent is fine, malformed is not
pub fn check_optional_image(
    field: &str,
    value: Option<&str>,
    max_bytes: usize,
) -> Result<Option<CheckedImage>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => check_image(field, Some(v), max_bytes).map(Some),
    }
}
