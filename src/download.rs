//! Saving the filtered spreadsheet returned by the backend.

use anyhow::{Result, bail};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Host capability that stores a downloaded file for the user.
pub trait FileSaver: Send + Sync {
    fn save_file(&self, bytes: &[u8], filename: &str) -> Result<()>;
}

/// Writes downloads into a fixed directory.
#[derive(Clone, Debug)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSaver for DirectorySaver {
    fn save_file(&self, bytes: &[u8], filename: &str) -> Result<()> {
        // Must be a bare file name so the saved file is exactly `filename`.
        if Path::new(filename).file_name() != Some(OsStr::new(filename)) {
            bail!("invalid download filename: {filename}");
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        if path.exists() {
            tracing::warn!("overwriting existing download {}", path.display());
        }
        std::fs::write(&path, bytes)?;
        tracing::info!("saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// `filtered_<driver>.xlsx` with the name lowercased, whitespace runs
/// collapsed into `_` and path separators replaced by `_`.
pub fn download_filename(driver_name: &str) -> String {
    let mut slug = String::with_capacity(driver_name.len());
    let mut in_space = false;
    for c in driver_name.to_lowercase().chars() {
        if c == '/' || c == '\\' {
            slug.push('_');
            in_space = false;
        } else if c.is_whitespace() {
            if !in_space {
                slug.push('_');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    format!("filtered_{slug}.xlsx")
}

/// Hands a successful response body to the [`FileSaver`].
pub struct DownloadTrigger {
    saver: Box<dyn FileSaver>,
}

impl DownloadTrigger {
    pub fn new(saver: impl FileSaver + 'static) -> Self {
        Self {
            saver: Box::new(saver),
        }
    }

    /// Save `bytes` under the name derived from `driver_name`.
    ///
    /// Fire-and-forget: a failing save is logged, not returned.
    pub fn deliver(&self, bytes: &[u8], driver_name: &str) -> String {
        let filename = download_filename(driver_name);
        if let Err(e) = self.saver.save_file(bytes, &filename) {
            tracing::error!("saving {filename} failed: {e}");
        }
        filename
    }
}
