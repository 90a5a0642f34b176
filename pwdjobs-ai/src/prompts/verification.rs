//! Document forensics and liveness prompts
//!
//! Images travel as inline parts of the same request; these prompts only
//! describe them.

use super::json_contract;

const FORENSICS_SCHEMA: &str = r#"{
  "analysis": {
    "is_authentic": true,
    "confidence": 0,
    "document_type": "string",
    "forgery_indicators": ["string"],
    "overall_suspicion_level": "LOW | MEDIUM | HIGH",
    "suspicion_score": 0,
    "extracted": {
      "full_name": "string or null",
      "id_number": "string or null",
      "disability_category": "string or null",
      "expiry_date": "string or null"
    }
  }
}"#;

const LIVENESS_SCHEMA: &str = r#"{
  "analysis": {
    "is_live_person": true,
    "liveness_confidence": 0,
    "face_match": true,
    "face_match_confidence": 0,
    "spoofing_indicators": ["string"]
  }
}"#;

/// Forensic examination of a Philippine PWD ID
///
/// `has_back` tells the model whether a second image follows the front.
pub fn build_document_forensics_prompt(
    has_back: bool,
    claimed_name: Option<&str>,
    claimed_id_number: Option<&str>,
) -> String {
    let images = if has_back {
        "The first image is the FRONT of the card, the second is the BACK."
    } else {
        "The image is the FRONT of the card."
    };

    let mut claims = Vec::new();
    if let Some(name) = claimed_name.map(str::trim).filter(|s| !s.is_empty()) {
        claims.push(format!("- Name: {}", name));
    }
    if let Some(id) = claimed_id_number.map(str::trim).filter(|s| !s.is_empty()) {
        claims.push(format!("- ID number: {}", id));
    }
    let claims = if claims.is_empty() {
        "- none".to_string()
    } else {
        claims.join("\n")
    };

    format!(
        "You are a document forensics examiner checking a Philippine PWD (Person with \
         Disability) identification card issued by a city or municipal PDAO.\n\
         {images}\n\n\
         Examine the card for signs of tampering or fabrication: inconsistent fonts or \
         alignment, edited text regions, mismatched photo borders, missing official seals or \
         signatures, screen or print artifacts suggesting a photo of a photo, and an ID number \
         layout other than RR-PPMM-BBB-NNNNNNN.\n\
         Read the printed fields exactly as shown; use null when a field is unreadable.\n\
         Do not compare against the applicant's claims; report what the card shows.\n\n\
         Applicant claims (for context only):\n{claims}\n\n\
         overall_suspicion_level is LOW when the card looks genuine, MEDIUM when some \
         indicators need human review, HIGH when forgery is likely. confidence and \
         suspicion_score are 0-100.\n\
         {contract}",
        images = images,
        claims = claims,
        contract = json_contract(FORENSICS_SCHEMA),
    )
}

/// Liveness check on a selfie, with optional face match against the ID photo
pub fn build_liveness_prompt(has_id_photo: bool) -> String {
    let images = if has_id_photo {
        "The first image is a selfie taken just now. The second image is the photo on the \
         applicant's ID card. Decide whether both show the same person (face_match)."
    } else {
        "The image is a selfie taken just now. No ID photo is provided; set face_match and \
         face_match_confidence to null."
    };

    format!(
        "You are verifying that a selfie shows a real person who is present, not a photo of \
         a photo, a screen replay, a printed mask or an edited image.\n\
         {images}\n\
         Look for moiré patterns, screen bezels, paper edges, unnatural lighting, and \
         inconsistent reflections. Assistive devices, prosthetics, facial differences or \
         atypical head positions are NOT spoofing indicators.\n\
         Confidence values are 0-100.\n\
         {contract}",
        images = images,
        contract = json_contract(LIVENESS_SCHEMA),
    )
}
