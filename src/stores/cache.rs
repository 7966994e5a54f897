use std::{
    collections::BTreeMap,
    fs::{read_to_string, write},
    io,
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::geocoding::GeocodeResult;

/// Only ever logged, so the cause is part of the message.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file not found")]
    NotFound,
    #[error("failed to read cache: {0}")]
    Read(io::Error),
    #[error("failed to parse cache: {0}")]
    Parse(serde_json::Error),
    #[error("failed to serialize cache: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write cache: {0}")]
    Write(io::Error),
}

/// Normalized address -> geocode result, persisted as a JSON object.
///
/// Entries are only ever added: once an address has a result (successful
/// or not) it is reused until the file is edited by hand.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeocodeCache {
    entries: BTreeMap<String, GeocodeResult>,
}

impl GeocodeCache {
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let raw = read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CacheError::NotFound,
            _ => CacheError::Read(e),
        })?;
        serde_json::from_str(&raw).map_err(CacheError::Parse)
    }

    /// Like `load`, but any failure just means starting over empty.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cache) => cache,
            Err(CacheError::NotFound) => {
                info!("No geocode cache at {}, starting empty", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Ignoring geocode cache {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let mut output = serde_json::to_string_pretty(self).map_err(CacheError::Serialize)?;
        output.push('\n');
        write(path, output).map_err(CacheError::Write)
    }

    pub fn get(&self, address: &str) -> Option<&GeocodeResult> {
        self.entries.get(address)
    }

    /// Inserts unless the address is already known; returns the kept entry.
    pub fn insert(&mut self, address: String, result: GeocodeResult) -> &GeocodeResult {
        self.entries.entry(address).or_insert(result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
