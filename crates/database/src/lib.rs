//! Durable session mirror in PostgreSQL.
//!
//! Memory is the source of truth while a session runs; this crate keeps a
//! write-behind copy so sessions survive a server restart. A missing or
//! broken database never blocks play: every operation on a disconnected
//! [`Store`] logs once and carries on as a no-op.
//!
//! ## Tables
//!
//! - [`GAMES`] — One JSONB snapshot per unfinished session, keyed by code
//! - [`SCORES`] — Final per-player scores, outliving the session row
use std::sync::Arc;
use tokio_postgres::Client;
use wb_core::*;
use wb_gameplay::Code;
use wb_gameplay::Phase;
use wb_gameplay::Snapshot;

/// Table for active session snapshots.
#[rustfmt::skip]
pub const GAMES:  &str = "games";
/// Table for final scores.
#[rustfmt::skip]
pub const SCORES: &str = "scores";

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

const CREATE_GAMES: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    GAMES,
    " (
        code        TEXT PRIMARY KEY,
        phase       TEXT NOT NULL,
        state       JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    );"
);
const CREATE_SCORES: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    SCORES,
    " (
        code        TEXT NOT NULL,
        player      UUID NOT NULL,
        name        TEXT NOT NULL,
        score       INTEGER NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (code, player)
    );"
);

/// Write-behind durability gateway.
///
/// Cheap to clone and share across tasks. The disconnected form drops
/// every write, which is exactly the behavior wanted when `DB_URL` is
/// absent or the database goes away mid-run.
#[derive(Clone)]
pub struct Store {
    client: Option<Arc<Client>>,
}

impl Store {
    /// Connect using the `DB_URL` environment variable and run migrations.
    /// Any failure, an unset variable included, yields a disconnected
    /// store rather than an error.
    pub async fn connect() -> Self {
        let Ok(url) = std::env::var("DB_URL") else {
            log::warn!("[store] DB_URL not set, sessions will not survive restarts");
            return Self::disconnected();
        };
        let tls = tokio_postgres::tls::NoTls;
        match tokio_postgres::connect(&url, tls).await {
            Ok((client, connection)) => {
                tokio::spawn(connection);
                let store = Self {
                    client: Some(Arc::new(client)),
                };
                store.migrate().await;
                log::info!("[store] connected to database");
                store
            }
            Err(e) => {
                log::warn!("[store] connection failed, sessions will not survive restarts: {}", e);
                Self::disconnected()
            }
        }
    }
    /// A store that drops every write.
    pub fn disconnected() -> Self {
        Self { client: None }
    }
    /// True when writes actually land in PostgreSQL.
    pub fn durable(&self) -> bool {
        self.client.is_some()
    }
    async fn migrate(&self) {
        let Some(client) = self.client.as_ref() else {
            return;
        };
        for ddl in [CREATE_GAMES, CREATE_SCORES] {
            if let Err(e) = client.batch_execute(ddl).await {
                log::warn!("[store] migration failed: {}", e);
            }
        }
    }
    /// Write or refresh a session snapshot.
    pub async fn upsert(&self, snapshot: &Snapshot) {
        let Some(client) = self.client.as_ref() else {
            return;
        };
        let state = match serde_json::to_value(snapshot) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("[store] snapshot of {} did not serialize: {}", snapshot.code, e);
                return;
            }
        };
        let result = client
            .execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    GAMES,
                    " (code, phase, state) VALUES ($1, $2, $3)
                     ON CONFLICT (code)
                     DO UPDATE SET phase = $2, state = $3, updated_at = now()"
                ),
                &[&snapshot.code.as_str(), &snapshot.phase.label(), &state],
            )
            .await;
        if let Err(e) = result {
            log::warn!("[store] upsert of {} failed: {}", snapshot.code, e);
        }
    }
    /// Drop a session row once the session ends or empties out.
    pub async fn delete(&self, code: &Code) {
        let Some(client) = self.client.as_ref() else {
            return;
        };
        let result = client
            .execute(
                const_format::concatcp!("DELETE FROM ", GAMES, " WHERE code = $1"),
                &[&code.as_str()],
            )
            .await;
        if let Err(e) = result {
            log::warn!("[store] delete of {} failed: {}", code, e);
        }
    }
    /// Record final scores for every roster member of a finished session.
    /// These rows outlive the session snapshot.
    pub async fn record_scores(&self, snapshot: &Snapshot) {
        let Some(client) = self.client.as_ref() else {
            return;
        };
        for player in snapshot.players.iter() {
            let result = client
                .execute(
                    const_format::concatcp!(
                        "INSERT INTO ",
                        SCORES,
                        " (code, player, name, score) VALUES ($1, $2, $3, $4)
                         ON CONFLICT (code, player)
                         DO UPDATE SET name = $3, score = $4, updated_at = now()"
                    ),
                    &[
                        &snapshot.code.as_str(),
                        &player.id().inner(),
                        &player.name(),
                        &player.score(),
                    ],
                )
                .await;
            if let Err(e) = result {
                log::warn!("[store] score write for {} in {} failed: {}", player.id(), snapshot.code, e);
            }
        }
    }
    /// Every unfinished session, in no particular order. Rows that no
    /// longer parse are skipped with a warning rather than blocking the
    /// reload.
    pub async fn active(&self) -> Vec<Snapshot> {
        let Some(client) = self.client.as_ref() else {
            return Vec::new();
        };
        let rows = match client
            .query(
                const_format::concatcp!("SELECT state FROM ", GAMES, " WHERE phase <> $1"),
                &[&Phase::Ended.label()],
            )
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("[store] active scan failed: {}", e);
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| {
                let state = row.get::<_, serde_json::Value>(0);
                match serde_json::from_value::<Snapshot>(state) {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        log::warn!("[store] skipping unreadable session row: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
    /// One stored session by code, for invite validation when the session
    /// is not live in memory.
    pub async fn lookup(&self, code: &Code) -> Option<Snapshot> {
        let client = self.client.as_ref()?;
        let row = match client
            .query_opt(
                const_format::concatcp!("SELECT state FROM ", GAMES, " WHERE code = $1"),
                &[&code.as_str()],
            )
            .await
        {
            Ok(row) => row?,
            Err(e) => {
                log::warn!("[store] lookup of {} failed: {}", code, e);
                return None;
            }
        };
        match serde_json::from_value(row.get::<_, serde_json::Value>(0)) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("[store] stored session {} did not parse: {}", code, e);
                None
            }
        }
    }
}
