//! SQLite-backed request log.
//!
//! Inserts are fire-and-forget and never on the critical path of a response;
//! failures are logged and swallowed by the caller. The schema is owned by
//! this collaborator and bootstrapped on connect.

use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestLogError {
    #[error("request log connection failed: {0}")]
    Connection(String),
    #[error("request log query failed: {0}")]
    Query(String),
}

/// Per-endpoint request count returned by `/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointCount {
    pub endpoint: String,
    pub count: i64,
}

#[derive(Clone)]
pub struct RequestLog {
    pool: SqlitePool,
}

impl RequestLog {
    /// Connect to the SQLite database at `url`, creating the file and the
    /// `requests` table when missing.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RequestLogError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| RequestLogError::Connection(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| RequestLogError::Connection(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                endpoint TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| RequestLogError::Query(e.to_string()))?;

        tracing::info!("request log connected at {}", url);
        Ok(Self { pool })
    }

    /// Record one call to `endpoint` at the current time.
    pub async fn record(&self, endpoint: &str) -> Result<(), RequestLogError> {
        sqlx::query("INSERT INTO requests (endpoint, timestamp) VALUES (?, ?)")
            .bind(endpoint)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| RequestLogError::Query(e.to_string()))?;
        Ok(())
    }

    /// Aggregate request counts per endpoint, ordered by endpoint name.
    pub async fn counts(&self) -> Result<Vec<EndpointCount>, RequestLogError> {
        let rows = sqlx::query(
            "SELECT endpoint, COUNT(*) AS count FROM requests GROUP BY endpoint ORDER BY endpoint",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RequestLogError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| EndpointCount {
                endpoint: row.get("endpoint"),
                count: row.get("count"),
            })
            .collect())
    }
}
