//! Word-count fallback scorer
//!
//! Used only when both model providers fail. Length is a weak proxy for
//! effort; the bands are deliberately coarse.

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Score 0-100 from a word count
pub fn fallback_score(words: usize) -> f64 {
    match words {
        0 => 0.0,
        1..=49 => 35.0,
        50..=99 => 50.0,
        100..=199 => 62.0,
        200..=299 => 72.0,
        300..=499 => 80.0,
        _ => 85.0,
    }
}

/// Feedback attached to fallback-scored work
pub fn fallback_feedback(words: usize) -> String {
    if words == 0 {
        "No answer was submitted.".to_string()
    } else {
        format!(
            "Automated review is temporarily unavailable. A provisional score was given based on \
             the length of your answer ({} words); it may be reviewed later.",
            words
        )
    }
}
