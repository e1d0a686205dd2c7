//! JSON output handler
//!
//! Writes one pretty-printed UTF-8 report per category. serde_json never
//! escapes non-ASCII characters, so names and reviews stay readable.

use crate::model::GameDetail;
use crate::output::traits::{CategoryReport, OutputError, OutputHandler, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes category reports as JSON files
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    output_dir: PathBuf,
    explicit_path: Option<PathBuf>,
}

impl JsonOutputHandler {
    /// Writes `<output_dir>/<category>_games.json`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            explicit_path: None,
        }
    }

    /// Writes to `path` instead, whatever the category
    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_path = path;
        self
    }

    /// The file a category will be written to
    pub fn path_for(&self, category: &str) -> PathBuf {
        match &self.explicit_path {
            Some(path) => path.clone(),
            None => self.output_dir.join(format!("{}_games.json", category)),
        }
    }

    /// Serializes a report to the category's path
    pub fn write_report(&self, report: &CategoryReport) -> OutputResult<PathBuf> {
        let path = self.path_for(&report.category);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json).map_err(|e| {
            OutputError::Write(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!("Wrote {} games to {}", report.total_games, path.display());
        Ok(path)
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write_category(&self, category: &str, games: &[GameDetail]) -> OutputResult<PathBuf> {
        self.write_report(&CategoryReport::new(category, games.to_vec()))
    }
}

/// Reads a report previously written by [`JsonOutputHandler`]
///
/// # Arguments
///
/// * `path` - The report file
///
/// # Returns
///
/// * `Ok(CategoryReport)` - The parsed report
/// * `Err(OutputError)` - Missing file or malformed JSON
pub fn load_report(path: &Path) -> OutputResult<CategoryReport> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
