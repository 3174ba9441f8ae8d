//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "DRIVER_FILTER_BACKEND_URL";

/// Backend address used when neither the env var nor the config set one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the filter service lives.
    pub backend: BackendCfg,
    /// Where filtered spreadsheets are written.
    pub download: DownloadCfg,
}

/// Filter service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCfg {
    /// Base URL; `/filter-driver` is appended.
    pub base_url: String,
}

/// Download target settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadCfg {
    /// Directory that receives `filtered_<driver>.xlsx`.
    pub dir: PathBuf,
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }

    /// Effective backend URL: env override, then config, then default.
    pub fn backend_base_url(&self) -> String {
        resolve_base_url(std::env::var(BACKEND_URL_ENV).ok(), &self.backend.base_url)
    }
}

fn resolve_base_url(env: Option<String>, configured: &str) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| Some(configured.to_string()).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendCfg {
                base_url: DEFAULT_BACKEND_URL.into(),
            },
            download: DownloadCfg { dir: ".".into() },
        }
    }
}
