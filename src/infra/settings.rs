// ============================================================
// Layer 6 — Settings
// ============================================================
// Service configuration, resolved in three steps:
//
//   1. Built-in defaults               (Settings::default)
//   2. Optional JSON file              (--config nda.json)
//   3. Environment variable overrides  (NDA_*)
//
// CLI flags are applied last by the CLI layer itself.
//
// Example nda.json:
//   {
//     "store_dir": "/var/lib/nda",
//     "max_file_size_mb": 10,
//     "allowed_file_extensions": ["pdf", "doc", "docx", "zip"],
//     "presigned_url_expiry_seconds": 900
//   }
//
// Reference: serde_json crate documentation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path, path::PathBuf, time::Duration};

use crate::application::upload_policy::UploadPolicy;

pub const ENV_STORE_DIR: &str          = "NDA_STORE_DIR";
pub const ENV_MAX_FILE_SIZE_MB: &str   = "NDA_MAX_FILE_SIZE_MB";
pub const ENV_ALLOWED_EXTENSIONS: &str = "NDA_ALLOWED_FILE_EXTENSIONS";
pub const ENV_PRESIGNED_EXPIRY: &str   = "NDA_PRESIGNED_URL_EXPIRY_SECONDS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory of the filesystem object store
    pub store_dir:                    PathBuf,
    pub max_file_size_mb:             u64,
    pub allowed_file_extensions:      Vec<String>,
    pub presigned_url_expiry_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir:                    PathBuf::from("nda-store"),
            max_file_size_mb:             10,
            allowed_file_extensions:      ["pdf", "doc", "docx", "zip"].map(String::from).to_vec(),
            presigned_url_expiry_seconds: 900,
        }
    }
}

impl Settings {
    /// Defaults, then the JSON file (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None       => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid settings file '{}'", path.display()))
    }

    /// Apply NDA_* overrides from `lookup` (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(ENV_STORE_DIR) {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(mb) = lookup(ENV_MAX_FILE_SIZE_MB) {
            self.max_file_size_mb = mb
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_FILE_SIZE_MB} must be a whole number, got '{mb}'"))?;
        }
        if let Some(list) = lookup(ENV_ALLOWED_EXTENSIONS) {
            self.allowed_file_extensions = list.split(',').map(String::from).collect();
        }
        if let Some(secs) = lookup(ENV_PRESIGNED_EXPIRY) {
            self.presigned_url_expiry_seconds = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PRESIGNED_EXPIRY} must be a whole number, got '{secs}'"))?;
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Normalised extension allow-list: trimmed, lowercase, no dots.
    pub fn allowed_extensions(&self) -> BTreeSet<String> {
        self.allowed_file_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn presigned_expiry(&self) -> Duration {
        Duration::from_secs(self.presigned_url_expiry_seconds)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(self.allowed_extensions(), self.max_file_size_bytes())
    }
}
