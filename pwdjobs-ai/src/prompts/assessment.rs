//! Skill-gap and roadmap prompts

use super::{bullet_list, json_contract};

const SKILL_GAP_SCHEMA: &str = r#"{
  "analysis": {
    "summary": "2-3 sentence overview of readiness for the role",
    "strengths": ["skill or experience the candidate can lead with"],
    "priority_skills": ["missing skill to learn first"],
    "recommendations": ["concrete, accessible next step"],
    "readiness_level": "ready | nearly_ready | developing"
  }
}"#;

const ROADMAP_SCHEMA: &str = r#"{
  "roadmap": {
    "title": "string",
    "summary": "string",
    "total_weeks": 12,
    "milestones": [
      {
        "title": "string",
        "start_week": 1,
        "end_week": 3,
        "skills": ["string"],
        "activities": ["string"],
        "resources": [{ "title": "string", "url": "string or null", "kind": "course | video | article | practice" }]
      }
    ]
  }
}"#;

/// Skill-gap analysis prompt
///
/// `matched` / `missing` come from local skill matching so the model explains
/// the gap rather than recomputing it.
pub fn build_skill_gap_prompt(
    target_role: &str,
    matched: &[String],
    missing: &[String],
    match_percentage: f64,
    experience_summary: Option<&str>,
) -> String {
    let experience = experience_summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Not provided");

    format!(
        "You are a career coach for Persons with Disabilities (PWD) in the Philippines.\n\
         Analyze the candidate's readiness for the role below. Be encouraging and specific, \
         and prefer learning options that are free, online and accessible.\n\n\
         Target role: {role}\n\
         Skill match: {pct:.0}% of required skills\n\n\
         Skills the candidate already has:\n{matched}\n\n\
         Required skills the candidate is missing:\n{missing}\n\n\
         Experience summary: {experience}\n\n\
         {contract}",
        role = target_role.trim(),
        pct = match_percentage,
        matched = bullet_list(matched, "none listed"),
        missing = bullet_list(missing, "none"),
        experience = experience,
        contract = json_contract(SKILL_GAP_SCHEMA),
    )
}

/// Learning roadmap prompt
pub fn build_roadmap_prompt(
    target_role: &str,
    skill_gaps: &[String],
    current_skills: &[String],
    timeframe_weeks: u32,
    hours_per_week: u32,
    accessibility_needs: Option<&str>,
) -> String {
    let accessibility = accessibility_needs
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("None specified; still prefer captioned and screen-reader friendly material");

    format!(
        "You are a learning designer creating a step-by-step roadmap for a Person with \
         Disability (PWD) in the Philippines preparing for a job.\n\n\
         Target role: {role}\n\
         Timeframe: {weeks} weeks at about {hours} hours per week\n\
         Accessibility needs: {accessibility}\n\n\
         Skills to build:\n{gaps}\n\n\
         Skills already held:\n{current}\n\n\
         Rules:\n\
         - Milestones are ordered, use 1-based week numbers, and end_week >= start_week.\n\
         - The last milestone ends no later than week {weeks}.\n\
         - Every skill to build appears in at least one milestone.\n\n\
         {contract}",
        role = target_role.trim(),
        weeks = timeframe_weeks,
        hours = hours_per_week,
        accessibility = accessibility,
        gaps = bullet_list(skill_gaps, "none"),
        current = bullet_list(current_skills, "none listed"),
        contract = json_contract(ROADMAP_SCHEMA),
    )
}
