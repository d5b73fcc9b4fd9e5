use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Persistent client-side key/value storage backed by a single JSON object file.
///
/// A missing file reads as empty storage; writes create it.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// Returns whether the key was present.
    pub fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }

    fn read_all(&self) -> anyhow::Result<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt storage file {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
