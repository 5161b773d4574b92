// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use tracing::debug;

use tiffinhub_core::HubError;

use crate::migrations;

/// Map a tokio-rusqlite error into the crate error type.
pub(crate) fn map_tr_err(err: tokio_rusqlite::Error) -> HubError {
    HubError::Storage {
        source: Box::new(err),
    }
}

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the single background connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, run pending
    /// migrations, and configure the connection PRAGMAs.
    pub async fn open(path: &str) -> Result<Self, HubError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| HubError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        // Migrations run on a short-lived blocking connection before the
        // async handle opens; refinery needs exclusive synchronous access.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), HubError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(|e| HubError::Storage {
                    source: Box::new(e),
                })?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| HubError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| HubError::Storage {
                source: Box::new(e),
            })?;
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), HubError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
