//! Bootstrap configuration loading and root folder resolution
//!
//! Configuration is read once at startup from a TOML file. Every section and
//! field is optional: a missing file or a missing key falls back to built-in
//! defaults so the service can always start.
//!
//! # Sources Priority
//!
//! 1. Command-line arguments (`--config`, `--port`, `--root-folder`)
//! 2. Environment variables (`PWDJOBS_CONFIG`, `PWDJOBS_ROOT_FOLDER`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PWDJOBS_CONFIG";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "PWDJOBS_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "pwdjobs.db";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder holding the SQLite database
    pub root_folder: Option<PathBuf>,

    /// HTTP server port (CLI `--port` wins)
    pub port: Option<u16>,

    pub logging: LoggingConfig,
    pub ai: AiConfig,
    pub registry: RegistryConfig,
    pub scoring: ScoringConfig,
    pub sync: SyncConfig,
    pub verification: VerificationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Generative model endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key (the `PWDJOBS_AI_API_KEY` environment variable takes priority)
    pub api_key: Option<String>,
    /// Base URL of the `generateContent` API
    pub base_url: String,
    /// Model tried first
    pub primary_model: String,
    /// Model tried once when the primary fails
    pub fallback_model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// HTTP client timeout for model calls
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            primary_model: "gemini-2.0-flash".to_string(),
            fallback_model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            max_output_tokens: 2048,
            timeout_secs: 60,
        }
    }
}

/// Government PWD registry endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
    /// Lookup timeout; slower answers are treated as unreachable
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pwd.doh.gov.ph/tbl_pwd_id_verificationlist.php".to_string(),
            timeout_secs: 8,
        }
    }
}

/// Scoring defaults (the database `settings` table overrides these at runtime)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum quiz score (0-100) to pass
    pub quiz_pass_threshold: f64,
    /// Minimum challenge score (0-100) to pass
    pub challenge_pass_threshold: f64,
    /// Points awarded for a correct single-choice answer
    pub single_choice_points: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            quiz_pass_threshold: 60.0,
            challenge_pass_threshold: 70.0,
            single_choice_points: 20.0,
        }
    }
}

/// Workspace sync worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Webhook receiving sync records. Without it records are only logged.
    pub webhook_url: Option<String>,
    pub queue_capacity: usize,
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            queue_capacity: 256,
            timeout_secs: 10,
        }
    }
}

/// Document verification limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Largest accepted decoded image
    pub max_image_bytes: usize,
    /// Jaro-Winkler similarity needed for the extracted name to match
    pub name_match_threshold: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 8 * 1024 * 1024,
            name_match_threshold: 0.85,
        }
    }
}

/// Locate the TOML config file
///
/// Order: explicit path, `PWDJOBS_CONFIG`, user config dir, `/etc/pwdjobs`.
/// Returns `None` when no candidate exists.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("pwdjobs").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/pwdjobs/config.toml");
    if cfg!(unix) && system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the bootstrap config, falling back to defaults when no file exists
///
/// A file that exists but does not parse is an error; a missing file is not.
pub fn load_or_default(explicit: Option<&Path>) -> Result<TomlConfig> {
    match locate_config_file(explicit) {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve the root folder
///
/// Priority: CLI argument → `PWDJOBS_ROOT_FOLDER` → TOML → OS default.
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("pwdjobs"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\pwdjobs"))
    } else if cfg!(any(target_os = "linux", target_os = "macos")) {
        dirs::data_local_dir()
            .map(|d| d.join("pwdjobs"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/pwdjobs"))
    } else {
        PathBuf::from("./pwdjobs_data")
    }
}

/// Database path inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}
