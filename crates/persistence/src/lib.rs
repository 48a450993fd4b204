#![deny(warnings)]

//! Save tokens and snapshot files.
//!
//! A save token is the base64 form of a JSON [`SaveEnvelope`]. It carries the
//! whole [`GameState`] plus the versions it was written with, so a game can be
//! copied out as one string and resumed later. Snapshot files hold the same
//! envelope as pretty-printed JSON.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sim_core::{validate_game_state, GameState, ValidationError, ENGINE_VERSION, SCHEMA_VERSION};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Schema versions this build can read.
pub const SUPPORTED_SCHEMAS: &[&str] = &[SCHEMA_VERSION];

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported schema version {0}")]
    UnsupportedSchema(String),
    #[error("saved state is invalid: {0}")]
    InvalidState(#[from] ValidationError),
}

/// Everything written to a save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub engine_version: String,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
    pub state: GameState,
}

impl SaveEnvelope {
    /// Wrap a state with the current versions, stamped `at`.
    pub fn new(state: GameState, at: DateTime<Utc>) -> Self {
        Self {
            engine_version: ENGINE_VERSION.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            timestamp: at,
            state,
        }
    }

    fn check(self) -> Result<Self, PersistenceError> {
        if !SUPPORTED_SCHEMAS.contains(&self.schema_version.as_str()) {
            warn!(schema = %self.schema_version, "rejected save");
            return Err(PersistenceError::UnsupportedSchema(self.schema_version));
        }
        validate_game_state(&self.state)?;
        if self.engine_version != ENGINE_VERSION {
            debug!(saved = %self.engine_version, current = ENGINE_VERSION, "engine version differs");
        }
        Ok(self)
    }
}

/// Encode an envelope as a save token.
pub fn encode_token(envelope: &SaveEnvelope) -> Result<String, PersistenceError> {
    let json = serde_json::to_vec(envelope)?;
    Ok(STANDARD.encode(json))
}

/// Token for `state`, stamped now.
pub fn export_token(state: &GameState) -> Result<String, PersistenceError> {
    encode_token(&SaveEnvelope::new(state.clone(), Utc::now()))
}

/// Decode and check a save token. Surrounding whitespace is ignored.
pub fn import_token(token: &str) -> Result<SaveEnvelope, PersistenceError> {
    let bytes = STANDARD.decode(token.trim())?;
    let envelope: SaveEnvelope = serde_json::from_slice(&bytes)?;
    envelope.check()
}

/// Write `state` to `path` as pretty JSON, creating parent directories.
pub fn save_snapshot(path: &Path, state: &GameState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let envelope = SaveEnvelope::new(state.clone(), Utc::now());
    fs::write(path, serde_json::to_string_pretty(&envelope)?)?;
    info!(path = %path.display(), week = state.week, "snapshot saved");
    Ok(())
}

/// Read and check a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<SaveEnvelope, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let envelope: SaveEnvelope = serde_json::from_str(&text)?;
    let envelope = envelope.check()?;
    info!(path = %path.display(), week = envelope.state.week, "snapshot loaded");
    Ok(envelope)
}
