//! Quiz and challenge scoring prompts

use super::{bullet_list, json_contract};
use crate::models::{Challenge, RubricCriterion};

/// An open-ended answer to be scored
pub struct OpenEndedItem<'a> {
    pub question_id: &'a str,
    pub prompt: &'a str,
    pub guidance: Option<&'a str>,
    pub max_points: f64,
    pub answer: &'a str,
}

/// Prompt scoring every open-ended answer of one quiz in a single call
pub fn build_open_ended_prompt(skill: Option<&str>, items: &[OpenEndedItem<'_>]) -> String {
    let questions = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let guidance = item
                .guidance
                .map(|g| format!("\nA strong answer covers: {}", g.trim()))
                .unwrap_or_default();
            format!(
                "Question {n} (question_id: \"{id}\", max {max} points)\n{prompt}{guidance}\nCandidate answer:\n\"\"\"\n{answer}\n\"\"\"",
                n = idx + 1,
                id = item.question_id,
                max = item.max_points,
                prompt = item.prompt.trim(),
                guidance = guidance,
                answer = item.answer.trim(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let schema = r#"{
  "scoring": {
    "answers": [
      { "question_id": "string", "score": 0, "feedback": "one or two sentences" }
    ]
  }
}"#;

    format!(
        "You are grading a skills quiz{skill} taken by a job seeker with a disability.\n\
         Grade on substance, not on spelling, grammar or writing style.\n\
         Award each answer between 0 and its max points.\n\n\
         {questions}\n\n\
         Return one entry per question_id above.\n\
         {contract}",
        skill = skill
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!(" on {}", s))
            .unwrap_or_default(),
        questions = questions,
        contract = json_contract(schema),
    )
}

/// Prompt scoring a challenge submission against its rubric
pub fn build_challenge_prompt(challenge: &Challenge, rubric: &[RubricCriterion], submission: &str) -> String {
    let rubric_lines = rubric
        .iter()
        .map(|c| match c.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => {
                format!("- {} (max {} points): {}", c.criterion, c.max_points, desc)
            }
            _ => format!("- {} (max {} points)", c.criterion, c.max_points),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let schema = r#"{
  "scoring": {
    "rubric_scores": [
      { "criterion": "string", "score": 0, "max_points": 0, "feedback": "string" }
    ],
    "final_score": 0,
    "feedback": "overall feedback",
    "strengths": ["string"],
    "improvements": ["string"]
  }
}"#;

    format!(
        "You are evaluating a job challenge submission from a Person with Disability (PWD).\n\
         Judge the work itself. Do not penalize formatting or language mechanics unless the \
         rubric asks for them.\n\n\
         Challenge: {title}\n\
         {job}\
         Description:\n{description}\n\n\
         Relevant skills:\n{skills}\n\n\
         Rubric:\n{rubric}\n\n\
         Submission:\n\"\"\"\n{submission}\n\"\"\"\n\n\
         Score every rubric criterion between 0 and its max points. \
         final_score is the overall score from 0 to 100.\n\
         {contract}",
        title = challenge.title.trim(),
        job = challenge
            .job_title
            .as_deref()
            .map(|j| format!("Job: {}\n", j.trim()))
            .unwrap_or_default(),
        description = if challenge.description.trim().is_empty() {
            "(none)"
        } else {
            challenge.description.trim()
        },
        skills = bullet_list(&challenge.skills, "not specified"),
        rubric = rubric_lines,
        submission = submission.trim(),
        contract = json_contract(schema),
    )
}
