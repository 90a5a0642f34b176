//! Government PWD registry client
//!
//! The registry is consulted for corroboration only. A hit raises trust; a miss
//! or an unreachable registry is inconclusive. Many LGUs have not uploaded
//! their records, so absence from the registry must never count against an
//! applicant.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use pwdjobs_common::config::RegistryConfig;

use crate::validators::id_number::matches_standard_format;

/// Query parameter carrying the ID number
const ID_QUERY_PARAM: &str = "id_number";

const USER_AGENT: &str = concat!("pwdjobs-ai/", env!("CARGO_PKG_VERSION"));

/// Why a lookup produced no answer
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry did not answer within {0:?}")]
    Timeout(Duration),

    #[error("registry network error: {0}")]
    Network(String),

    #[error("registry returned HTTP {0}")]
    Upstream(u16),
}

/// Three-way registry outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryOutcome {
    /// Positive match; corroborates the document
    Found,
    /// No match; inconclusive
    NotFound,
    /// Timeout, network error or upstream failure; inconclusive
    Unreachable,
}

impl RegistryOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistryOutcome::Found => "found",
            RegistryOutcome::NotFound => "not_found",
            RegistryOutcome::Unreachable => "unreachable",
        }
    }

    /// Human-readable reading of the outcome
    pub fn interpretation(self) -> &'static str {
        match self {
            RegistryOutcome::Found => {
                "The PWD ID was found in the government registry. This corroborates the submitted document."
            }
            RegistryOutcome::NotFound => {
                "The PWD ID was not found in the government registry. This is inconclusive: many LGUs \
                 have not uploaded their records yet, so a missing entry is not evidence against the applicant."
            }
            RegistryOutcome::Unreachable => {
                "The government registry could not be reached. The registry result is inconclusive and \
                 does not count against the applicant."
            }
        }
    }

    /// Only a positive match carries evidential weight
    pub fn is_conclusive(self) -> bool {
        matches!(self, RegistryOutcome::Found)
    }
}

/// Result of one registry lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryCheck {
    pub id_number: String,
    pub outcome: RegistryOutcome,
    pub interpretation: String,
    pub checked_at: DateTime<Utc>,
    /// Whether the ID uses the `RR-PPMM-BBB-NNNNNNN` layout; informational only
    #[serde(default)]
    pub standard_format: bool,
    /// Failure reason when unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Registry HTTP client
pub struct RegistryClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// Check a normalized ID number; never fails
    pub async fn check(&self, id_number: &str) -> RegistryCheck {
        let standard_format = matches_standard_format(id_number);
        if !standard_format {
            debug!("ID number does not follow the standard layout");
        }

        let (outcome, detail) = match self.lookup(id_number).await {
            Ok(true) => (RegistryOutcome::Found, None),
            Ok(false) => (RegistryOutcome::NotFound, None),
            Err(e) => {
                warn!(error = %e, "Registry lookup failed; treating as inconclusive");
                (RegistryOutcome::Unreachable, Some(e.to_string()))
            }
        };

        info!(outcome = outcome.as_str(), standard_format, "Registry check complete");

        RegistryCheck {
            id_number: id_number.to_string(),
            outcome,
            interpretation: outcome.interpretation().to_string(),
            checked_at: Utc::now(),
            standard_format,
            detail,
        }
    }

    /// `Ok(true)` on a match, `Ok(false)` on a definite miss
    async fn lookup(&self, id_number: &str) -> Result<bool, RegistryError> {
        debug!(url = %self.base_url, "Querying PWD registry");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[(ID_QUERY_PARAM, id_number)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(RegistryError::Upstream(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        Ok(body_indicates_match(&body, id_number))
    }

    fn classify(&self, err: reqwest::Error) -> RegistryError {
        if err.is_timeout() {
            RegistryError::Timeout(self.timeout)
        } else {
            RegistryError::Network(err.to_string())
        }
    }
}

/// Phrases a registry page uses for an empty result
const NO_RECORD_MARKERS: &[&str] = &[
    "no records",
    "no record found",
    "no results",
    "no matching",
    "not found",
    "no data available",
];

/// Decide whether a registry response body reports the ID
///
/// JSON bodies are read structurally (`found`, or a non-empty `records` /
/// `results` / `data` array). Anything else (the public registry serves HTML)
/// is treated as a result page: an explicit "no records" message means a miss,
/// otherwise the ID must be the whole text of a table cell. Search forms echo
/// the query back in attributes and headings, so the rest of the page is
/// never searched.
fn body_indicates_match(body: &str, id_number: &str) -> bool {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(found) = map.get("found").and_then(Value::as_bool) {
            return found;
        }
        for key in ["records", "results", "data"] {
            if let Some(items) = map.get(key).and_then(Value::as_array) {
                return !items.is_empty();
            }
        }
    }

    if id_number.is_empty() {
        return false;
    }

    let text = collapse_whitespace(&strip_tags(body)).to_lowercase();
    if NO_RECORD_MARKERS.iter().any(|m| text.contains(m)) {
        return false;
    }

    let wanted = compact(id_number);
    table_cells(body).iter().any(|cell| compact(cell) == wanted)
}

/// Inner text of every `<td>` / `<th>` element
fn table_cells(html: &str) -> Vec<String> {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lower = html.to_ascii_lowercase();
    let mut cells = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_cell_open(&lower, pos) {
        let Some(gt) = lower[open..].find('>').map(|i| open + i + 1) else {
            break;
        };
        let close = ["</td", "</th"]
            .iter()
            .filter_map(|tag| lower[gt..].find(tag))
            .min()
            .map(|i| gt + i)
            .unwrap_or(lower.len());
        cells.push(strip_tags(&html[gt..close]));
        pos = close;
    }
    cells
}

fn find_cell_open(lower: &str, from: usize) -> Option<usize> {
    ["<td", "<th"]
        .iter()
        .filter_map(|tag| {
            lower[from..].match_indices(tag).map(|(i, _)| from + i).find(|&i| {
                // `<td>` or `<td ...>`, not `<thead>`
                matches!(lower.as_bytes().get(i + 3), Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r'))
            })
        })
        .min()
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}
