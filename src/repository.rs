// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Referral Yield Simulation Suite - Snapshot Repository

//! Durable storage for the editable state around the engine.
//!
//! The engine never touches a repository. Hosts load a snapshot, edit it
//! through [`WalletBook`] and [`MovementSchedule`], run, and save.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::movements::MovementSchedule;
use crate::types::{ScheduledMovement, Wallet};
use crate::wallets::WalletBook;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("snapshot i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// WalletSnapshot
// ---------------------------------------------------------------------------

/// Wallets, scheduled movements and run parameters as one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletSnapshot {
    pub wallets: Vec<Wallet>,
    pub movements: Vec<ScheduledMovement>,
    pub config: SimulationConfig,
}

impl WalletSnapshot {
    pub fn capture(book: &WalletBook, schedule: &MovementSchedule, config: &SimulationConfig) -> Self {
        Self {
            wallets: book.wallets().to_vec(),
            movements: schedule.entries().to_vec(),
            config: config.clone(),
        }
    }

    /// Split back into the editable parts.
    pub fn restore(self) -> (WalletBook, MovementSchedule, SimulationConfig) {
        let book = WalletBook::from_wallets(self.wallets, self.config.cycle_policy);
        let schedule = MovementSchedule::from_entries(self.movements);
        (book, schedule, self.config)
    }

    pub fn to_json(&self) -> Result<String, RepositoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

pub trait WalletRepository {
    fn load(&self) -> Result<WalletSnapshot, RepositoryError>;
    fn save(&self, snapshot: &WalletSnapshot) -> Result<(), RepositoryError>;
}

/// Process-local repository, mostly for tests and the browser build.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    stored: RefCell<Option<WalletSnapshot>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.stored.borrow_mut().take();
    }
}

impl WalletRepository for InMemoryRepository {
    fn load(&self) -> Result<WalletSnapshot, RepositoryError> {
        Ok(self.stored.borrow().clone().unwrap_or_default())
    }

    fn save(&self, snapshot: &WalletSnapshot) -> Result<(), RepositoryError> {
        *self.stored.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

/// Pretty-printed JSON file. A missing file loads as an empty snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io { path: self.path.clone(), source }
    }
}

impl WalletRepository for JsonFileRepository {
    fn load(&self) -> Result<WalletSnapshot, RepositoryError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no snapshot on disk, starting empty");
                return Ok(WalletSnapshot::default());
            }
            Err(e) => return Err(self.io_err(e)),
        };
        WalletSnapshot::from_json(&json)
    }

    fn save(&self, snapshot: &WalletSnapshot) -> Result<(), RepositoryError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
        }
        let json = snapshot.to_json()?;
        std::fs::write(&self.path, json).map_err(|e| self.io_err(e))?;
        tracing::debug!(path = %self.path.display(), wallets = snapshot.wallets.len(), "snapshot saved");
        Ok(())
    }
}
