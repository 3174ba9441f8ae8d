//! Immutable snapshot of everything the user entered in the form.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

use super::time::{TimeComponent, TimeValue};

/// Handle to the spreadsheet the user picked.
///
/// Only the location is kept; the bytes are read when the request is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    name: String,
}

impl SourceFile {
    /// Pick a file from disk, rejecting paths that are not regular files.
    pub fn pick(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .map_err(|e| anyhow!("cannot open {}: {e}", path.display()))?;
        if !meta.is_file() {
            return Err(anyhow!("{} is not a file", path.display()));
        }
        Ok(Self::new(path))
    }

    /// Build a handle without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name sent as the multipart filename.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Date plus start/end time of a break to insert.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreakWindow {
    /// YYYY-MM-DD.
    pub date: String,
    /// HH:MM:SS, possibly partial while being entered.
    pub start_time: String,
    /// HH:MM:SS, possibly partial while being entered.
    pub end_time: String,
}

/// Which of the two break times a sub-field edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakBound {
    Start,
    End,
}

/// A single edit applied to the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    SourceFile(Option<SourceFile>),
    DriverName(String),
    AddBreak(bool),
    BreakDate(String),
    BreakStart(String),
    BreakEnd(String),
    /// Raw input for one HH/MM/SS cell; normalized and recomposed on apply.
    BreakTimeComponent {
        bound: BreakBound,
        component: TimeComponent,
        raw: String,
    },
    GiveOff(bool),
    OffDate(String),
}

/// Current values and flags of the form.
///
/// `Default` is the initial (empty) state the form returns to after a
/// successful submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub source_file: Option<SourceFile>,
    pub driver_name: String,
    pub add_break: bool,
    /// Kept while `add_break` is off, but never validated or sent then.
    pub break_window: BreakWindow,
    pub give_off: bool,
    pub off_date: String,
}

impl FormState {
    /// Return a new snapshot with `update` applied.
    pub fn with(&self, update: FieldUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FieldUpdate::SourceFile(f) => next.source_file = f,
            FieldUpdate::DriverName(s) => next.driver_name = s,
            FieldUpdate::AddBreak(b) => next.add_break = b,
            FieldUpdate::BreakDate(s) => next.break_window.date = s,
            FieldUpdate::BreakStart(s) => next.break_window.start_time = s,
            FieldUpdate::BreakEnd(s) => next.break_window.end_time = s,
            FieldUpdate::BreakTimeComponent {
                bound,
                component,
                raw,
            } => {
                let slot = match bound {
                    BreakBound::Start => &mut next.break_window.start_time,
                    BreakBound::End => &mut next.break_window.end_time,
                };
                *slot = TimeValue::set(slot, component, &raw);
            }
            FieldUpdate::GiveOff(b) => next.give_off = b,
            FieldUpdate::OffDate(s) => next.off_date = s,
        }
        next
    }

    /// Stored time string for one bound of the break.
    pub fn break_time(&self, bound: BreakBound) -> &str {
        match bound {
            BreakBound::Start => &self.break_window.start_time,
            BreakBound::End => &self.break_window.end_time,
        }
    }
}
