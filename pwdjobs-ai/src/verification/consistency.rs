//! Cross-check of fields read off the card against what the applicant typed

use serde::Serialize;

use crate::models::ExtractedFields;
use crate::validators::disability_category::validate_category;
use crate::validators::id_number::normalize_id_number;

/// Comparison of claimed vs extracted fields
///
/// `None` means the comparison could not be made (field missing on either side).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldConsistency {
    pub name_match: Option<bool>,
    pub name_similarity: Option<f64>,
    pub id_match: Option<bool>,
    pub category_match: Option<bool>,
}

impl FieldConsistency {
    pub fn has_mismatch(&self) -> bool {
        [self.name_match, self.id_match, self.category_match]
            .iter()
            .any(|m| *m == Some(false))
    }

    pub fn mismatch_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.name_match == Some(false) {
            flags.push("name_mismatch".to_string());
        }
        if self.id_match == Some(false) {
            flags.push("id_number_mismatch".to_string());
        }
        if self.category_match == Some(false) {
            flags.push("category_mismatch".to_string());
        }
        flags
    }
}

/// Compare claimed fields with extracted ones
pub fn compare_fields(
    claimed_name: Option<&str>,
    claimed_id: Option<&str>,
    claimed_category: Option<&str>,
    extracted: &ExtractedFields,
    name_threshold: f64,
) -> FieldConsistency {
    let mut result = FieldConsistency::default();

    if let (Some(claimed), Some(read)) = (non_blank(claimed_name), non_blank(extracted.full_name.as_deref())) {
        let similarity = name_similarity(claimed, read);
        result.name_similarity = Some((similarity * 1000.0).round() / 1000.0);
        result.name_match = Some(similarity >= name_threshold);
    }

    if let (Some(claimed), Some(read)) = (non_blank(claimed_id), non_blank(extracted.id_number.as_deref())) {
        result.id_match = match (normalize_id_number(claimed), normalize_id_number(read)) {
            (Ok(a), Ok(b)) => Some(a == b),
            // The printed value is unreadable as an ID; nothing to compare
            _ => None,
        };
    }

    if let (Some(claimed), Some(read)) = (
        non_blank(claimed_category),
        non_blank(extracted.disability_category.as_deref()),
    ) {
        let a = validate_category(claimed).matched_category;
        let b = validate_category(read).matched_category;
        result.category_match = match (a, b) {
            (Some(a), Some(b)) => Some(a == b),
            _ => None,
        };
    }

    result
}

/// Jaro-Winkler similarity on names with case, punctuation and word order normalized
///
/// Filipino names are written "Dela Cruz, Juan" as often as "Juan Dela Cruz".
fn name_similarity(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(&canonical_name(a), &canonical_name(b))
}

fn canonical_name(name: &str) -> String {
    let mut tokens: Vec<String> = name
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    tokens.sort();
    tokens.join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
