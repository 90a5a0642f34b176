//! Settings database operations
//!
//! Key-value accessors for the `settings` table. Scoring thresholds stored
//! here override the TOML values at startup.

use sqlx::{Pool, Sqlite};
use pwdjobs_common::{Error, Result};

pub const QUIZ_PASS_THRESHOLD_KEY: &str = "quiz_pass_threshold";
pub const CHALLENGE_PASS_THRESHOLD_KEY: &str = "challenge_pass_threshold";
pub const SINGLE_CHOICE_POINTS_KEY: &str = "single_choice_points";

/// Generic setting getter
pub async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT value FROM settings WHERE key = ?"
    )
    .bind(key)
    .fetch_optional(db)
    .await
    .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value.parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting `{}` failed: {}", key, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (upsert)
pub async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value"
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
