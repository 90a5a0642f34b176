//! Prompt builders
//!
//! Pure, deterministic functions from structured request data to the
//! instruction text sent to the model. Every prompt ends with the exact JSON
//! shape expected back; the caller still validates that shape, since nothing
//! forces the model to comply.

pub mod assessment;
pub mod scoring;
pub mod verification;

/// Closing instruction shared by all prompts
fn json_contract(schema: &str) -> String {
    format!(
        "Return ONLY valid JSON with exactly this structure, no markdown, no commentary:\n{}",
        schema
    )
}

/// Render a list as "- item" lines, or a placeholder when empty
fn bullet_list(items: &[String], empty: &str) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("- {}", s))
        .collect();
    if lines.is_empty() {
        format!("- {}", empty)
    } else {
        lines.join("\n")
    }
}
