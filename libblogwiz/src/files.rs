//! File operations port
//!
//! The host (a desktop shell, a CLI) owns the dialogs. The core only asks
//! for a path and reads or writes whole files. Closing a dialog is a normal
//! answer, [`Selection::Canceled`], not an error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{FileError, Result};

/// `blog-wizard-<YYYY-MM-DD>.json` for the UTC date of `now`
pub fn default_export_filename(now: DateTime<Utc>) -> String {
    format!("blog-wizard-{}.json", now.format("%Y-%m-%d"))
}

/// Answer from a file dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Canceled,
    Chosen(T),
}

impl<T> Selection<T> {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Selection::Canceled)
    }

    pub fn chosen(self) -> Option<T> {
        match self {
            Selection::Canceled => None,
            Selection::Chosen(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn json() -> Self {
        Self {
            name: "JSON".to_string(),
            extensions: vec!["json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: Option<String>,
    pub default_path: Option<PathBuf>,
    pub filters: Vec<FileFilter>,
}

#[async_trait]
pub trait FileOps: Send + Sync {
    /// Write `content` to `path`, replacing any existing file
    async fn save_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Read the whole file at `path`
    async fn load_file(&self, path: &Path) -> Result<String>;

    /// Ask the user for one or more files to open
    async fn select_file(&self, options: &DialogOptions) -> Selection<Vec<PathBuf>>;

    /// Ask the user where to save
    async fn save_file_dialog(&self, options: &DialogOptions) -> Selection<PathBuf>;
}

/// Local filesystem with dialog answers decided up front
///
/// Without a preset, the save dialog accepts the suggested path (placed in
/// the export directory when it is relative) and the open dialog reports
/// canceled.
#[derive(Debug, Clone, Default)]
pub struct LocalFiles {
    export_dir: PathBuf,
    save_answer: Option<PathBuf>,
    open_answer: Option<PathBuf>,
    cancel_dialogs: bool,
}

impl LocalFiles {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            ..Self::default()
        }
    }

    /// Answer the save dialog with `path`
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_answer = Some(path.into());
        self
    }

    /// Answer the open dialog with `path`
    pub fn with_open_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_answer = Some(path.into());
        self
    }

    /// Close every dialog without choosing
    pub fn canceling(mut self) -> Self {
        self.cancel_dialogs = true;
        self
    }
}

#[async_trait]
impl FileOps for LocalFiles {
    async fn save_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::Save(format!("{}: {}", parent.display(), e)))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FileError::Save(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "saved file");
        Ok(())
    }

    async fn load_file(&self, path: &Path) -> Result<String> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FileError::Load(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded file");
        Ok(content)
    }

    async fn select_file(&self, _options: &DialogOptions) -> Selection<Vec<PathBuf>> {
        if self.cancel_dialogs {
            return Selection::Canceled;
        }
        match &self.open_answer {
            Some(path) => Selection::Chosen(vec![path.clone()]),
            None => Selection::Canceled,
        }
    }

    async fn save_file_dialog(&self, options: &DialogOptions) -> Selection<PathBuf> {
        if self.cancel_dialogs {
            return Selection::Canceled;
        }
        if let Some(path) = &self.save_answer {
            return Selection::Chosen(path.clone());
        }
        match &options.default_path {
            Some(path) if path.is_absolute() => Selection::Chosen(path.clone()),
            Some(path) => Selection::Chosen(self.export_dir.join(path)),
            None => Selection::Canceled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn suggest(name: &str) -> DialogOptions {
        DialogOptions {
            default_path: Some(PathBuf::from(name)),
            ..DialogOptions::default()
        }
    }

    #[test]
    fn test_default_export_filename() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap();
        assert_eq!(default_export_filename(now), "blog-wizard-2024-03-05.json");
    }

    #[tokio::test]
    async fn test_save_dialog_defaults_into_export_dir() {
        let files = LocalFiles::new("/exports");
        let answer = files.save_file_dialog(&suggest("a.json")).await;
        assert_eq!(answer, Selection::Chosen(PathBuf::from("/exports/a.json")));
    }

    #[tokio::test]
    async fn test_save_dialog_preset_wins() {
        let files = LocalFiles::new("/exports").with_save_path("/tmp/b.json");
        let answer = files.save_file_dialog(&suggest("a.json")).await;
        assert_eq!(answer.chosen(), Some(PathBuf::from("/tmp/b.json")));
    }

    #[tokio::test]
    async fn test_open_dialog_without_preset_is_canceled() {
        let files = LocalFiles::new(".");
        assert!(files
            .select_file(&DialogOptions::default())
            .await
            .is_canceled());
    }

    #[tokio::test]
    async fn test_canceling_closes_everything() {
        let files = LocalFiles::new(".")
            .with_open_path("in.json")
            .with_save_path("out.json")
            .canceling();
        assert!(files.select_file(&DialogOptions::default()).await.is_canceled());
        assert!(files.save_file_dialog(&suggest("x.json")).await.is_canceled());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deep").join("file.json");
        let files = LocalFiles::new(temp_dir.path());

        files.save_file(&path, "{\"a\":1}").await.unwrap();
        assert_eq!(files.load_file(&path).await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocalFiles::new(temp_dir.path());
        let err = files
            .load_file(&temp_dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::BlogwizError::File(FileError::Load(_))
        ));
    }
}
