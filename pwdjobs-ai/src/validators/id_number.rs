//! PWD ID number normalization
//!
//! IDs look like `13-7602-000-0001234` (region-province/city-barangay-sequence),
//! but LGUs format them loosely, so only obviously unusable input is rejected.
//! `matches_standard_format` is informational.

const MAX_ID_LEN: usize = 32;

/// Normalize an ID number: trim, drop inner whitespace, uppercase
///
/// Returns `Err` with a user-facing reason when the value cannot be an ID.
pub fn normalize_id_number(raw: &str) -> Result<String, String> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if normalized.is_empty() {
        return Err("Missing required field: id_number".to_string());
    }
    if normalized.len() > MAX_ID_LEN {
        return Err(format!("id_number is longer than {} characters", MAX_ID_LEN));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err("id_number may only contain letters, digits and dashes".to_string());
    }
    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return Err("id_number must contain digits".to_string());
    }

    Ok(normalized)
}

/// True for the `RR-PPMM-BBB-NNNNNNN` layout
pub fn matches_standard_format(normalized: &str) -> bool {
    let groups: Vec<&str> = normalized.split('-').collect();
    let expected = [2, 4, 3, 7];
    groups.len() == expected.len()
        && groups
            .iter()
            .zip(expected)
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_digit()))
}
