//! Database access for pwdjobs-ai
//!
//! SQLite in the root folder. Every write here is best-effort from the
//! caller's point of view: handlers log failures and still answer.

pub mod results;
pub mod settings;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create tables if they don't exist
///
/// Result tables are keyed by submission id so a retried request overwrites
/// rather than duplicates.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_results (
            submission_id TEXT PRIMARY KEY,
            user_id TEXT,
            quiz_id TEXT,
            score REAL NOT NULL,
            passed INTEGER NOT NULL,
            degraded INTEGER NOT NULL DEFAULT 0,
            detail TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS challenge_results (
            submission_id TEXT PRIMARY KEY,
            user_id TEXT,
            challenge_id TEXT,
            score REAL NOT NULL,
            passed INTEGER NOT NULL,
            source TEXT NOT NULL,
            detail TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS skill_assessments (
            submission_id TEXT PRIMARY KEY,
            user_id TEXT,
            target_role TEXT NOT NULL,
            match_percentage REAL NOT NULL,
            detail TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS verifications (
            submission_id TEXT PRIMARY KEY,
            user_id TEXT,
            status TEXT NOT NULL,
            risk_tier TEXT NOT NULL,
            risk_score REAL NOT NULL,
            document_digest TEXT NOT NULL,
            detail TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!(
        "Database tables initialized (settings, quiz_results, challenge_results, skill_assessments, verifications)"
    );

    Ok(())
}
