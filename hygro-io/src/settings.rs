//! Persisted user settings
//!
//! Remembers the last port the user connected to, so the next run can
//! reconnect without asking.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_port: Option<String>,
}

/// TOML-backed store for the last used port
#[derive(Debug, Clone)]
pub struct LastPortStore {
    path: PathBuf,
}

impl LastPortStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last saved port, or `None` if nothing was saved yet
    pub fn load(&self) -> Result<Option<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSettings = toml::from_str(&contents)?;
        Ok(stored.last_port.filter(|port| !port.is_empty()))
    }

    /// Remember `port` as the last used port
    pub fn save(&self, port: &str) -> Result<()> {
        let stored = StoredSettings {
            last_port: Some(port.to_string()),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, toml::to_string(&stored)?)?;
        log::debug!("Saved last port {} to {}", port, self.path.display());
        Ok(())
    }
}
