//! Disability category validation
//!
//! PWD IDs print one of a fixed set of disability categories. Applicants often
//! type their medical diagnosis instead ("Diabetes", "Glaucoma"), which is not a
//! category. The two mistakes get different remediation messages, so the
//! validator reports them separately.
//!
//! Matching is case-insensitive and works on whole words: "visual", "VISUAL
//! DISABILITY" and "Visual disability (low vision)" all match Visual Disability,
//! while "developmental delay" does not match Mental Disability. Words shared by
//! several categories ("disability", "disease", "impairment") never match alone.

use serde::{Deserialize, Serialize};

/// A recognized category and the keywords that identify it
struct Category {
    name: &'static str,
    keywords: &'static [&'static str],
}

const CATEGORIES: [Category; 9] = [
    Category {
        name: "Visual Disability",
        keywords: &["visual", "blind", "low vision"],
    },
    Category {
        name: "Deaf or Hard of Hearing",
        keywords: &["deaf", "hard of hearing", "hearing"],
    },
    Category {
        name: "Speech and Language Impairment",
        keywords: &["speech", "language impairment"],
    },
    Category {
        name: "Intellectual Disability",
        keywords: &["intellectual"],
    },
    Category {
        name: "Learning Disability",
        keywords: &["learning"],
    },
    Category {
        name: "Mental Disability",
        keywords: &["mental"],
    },
    Category {
        name: "Psychosocial Disability",
        keywords: &["psychosocial"],
    },
    Category {
        name: "Physical Disability (Orthopedic)",
        keywords: &["physical", "orthopedic", "orthopaedic"],
    },
    Category {
        name: "Rare Disease",
        keywords: &["rare disease"],
    },
];

/// Common diagnoses entered in place of a category
const MEDICAL_DIAGNOSES: &[&str] = &[
    "diabetes",
    "hypertension",
    "high blood",
    "cancer",
    "leukemia",
    "asthma",
    "epilepsy",
    "seizure",
    "autism",
    "adhd",
    "stroke",
    "arthritis",
    "glaucoma",
    "cataract",
    "schizophrenia",
    "depression",
    "bipolar",
    "anxiety",
    "cerebral palsy",
    "down syndrome",
    "polio",
    "tuberculosis",
    "hiv",
    "kidney disease",
    "heart disease",
    "scoliosis",
    "amputation",
];

/// Validation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_category: Option<String>,
    pub is_medical_diagnosis: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Names of the recognized categories
pub fn valid_categories() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}

/// Validate a free-text disability category
pub fn validate_category(input: &str) -> CategoryValidation {
    let normalized = normalize(input);

    if normalized.is_empty() {
        return CategoryValidation {
            valid: false,
            matched_category: None,
            is_medical_diagnosis: false,
            reason: "Disability category is required".to_string(),
            suggestion: Some(categories_hint()),
        };
    }

    if let Some(category) = match_category(&normalized) {
        return CategoryValidation {
            valid: true,
            matched_category: Some(category.name.to_string()),
            is_medical_diagnosis: false,
            reason: format!("Recognized disability category: {}", category.name),
            suggestion: None,
        };
    }

    if let Some(diagnosis) = MEDICAL_DIAGNOSES
        .iter()
        .find(|d| contains_phrase(&normalized, d))
    {
        return CategoryValidation {
            valid: false,
            matched_category: None,
            is_medical_diagnosis: true,
            reason: format!(
                "\"{}\" looks like a medical diagnosis ({}), not a disability category",
                input.trim(),
                diagnosis
            ),
            suggestion: Some(format!(
                "Enter the disability category printed on your PWD ID instead of the diagnosis. {}",
                categories_hint()
            )),
        };
    }

    CategoryValidation {
        valid: false,
        matched_category: None,
        is_medical_diagnosis: false,
        reason: format!("\"{}\" is not a recognized disability category", input.trim()),
        suggestion: Some(categories_hint()),
    }
}

fn match_category(normalized: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| {
        category.keywords.iter().any(|k| contains_phrase(normalized, k))
            || is_shortened_name(normalized, &normalize(category.name))
    })
}

/// Typed the start of a category name ("intellectual disab", "psychoso")
///
/// The input has to begin where the name begins, so it always carries the
/// category's own first word rather than a word several names share.
fn is_shortened_name(input: &str, name: &str) -> bool {
    input.len() >= 4 && name.starts_with(input)
}

/// True when `phrase` occurs in `text` as a run of whole words
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let words: Vec<&str> = text.split(' ').collect();
    let wanted: Vec<&str> = phrase.split(' ').collect();
    words.windows(wanted.len()).any(|w| w == wanted.as_slice())
}

/// Lowercase, keep letters and digits, single spaces between words
fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn categories_hint() -> String {
    format!("Valid categories: {}", valid_categories().join(", "))
}
