//! Service layer for Blogwiz
//!
//! Business logic shared by every front end (the wiz-* binaries, an editor
//! session, a desktop shell).
//!
//! # Architecture
//!
//! `PublishCoordinator` is the single entry point. It owns the state and
//! composes the pieces:
//!
//! - `PostStore`: the open post and its draft → published transitions
//! - `HistoryLedger`: capped, newest-first snapshot log
//! - `ConfigValidator`: credential checks ahead of formatting
//! - `EventBus`: change notifications for observers
//! - `EditorSession` / `Autosave`: the single-writer loop with its timer
//!
//! State is written back through the [`KeyValueStore`] port as one archive
//! blob. Save, publish, delete, import and settings updates write it
//! immediately; new, edit and restore stay in memory until the next write.
//!
//! # Example
//!
//! ```no_run
//! use libblogwiz::platforms::Platform;
//! use libblogwiz::service::PublishCoordinator;
//! use libblogwiz::types::PostEdit;
//! use libblogwiz::Config;
//!
//! # fn example() -> libblogwiz::Result<()> {
//! let config = Config::load()?;
//! let mut coordinator = PublishCoordinator::from_config(&config);
//!
//! coordinator.new_post();
//! coordinator.edit_current(&PostEdit {
//!     title: Some("Hello".to_string()),
//!     content: Some("<p>First post</p>".to_string()),
//!     ..PostEdit::default()
//! })?;
//! coordinator.publish_current()?;
//!
//! let result = coordinator.format(Platform::Custom)?;
//! println!("{}", result.content);
//! # Ok(())
//! # }
//! ```

pub mod autosave;
pub mod events;
pub mod history;
pub mod posts;
pub mod session;
pub mod validation;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use self::events::{Event, EventBus, EventReceiver};
use self::history::HistoryLedger;
use self::posts::{Commit, PostStore};
use self::validation::ConfigValidator;
use crate::error::{FileError, FormatError, StorageError};
use crate::files::{default_export_filename, DialogOptions, FileFilter, FileOps, LocalFiles, Selection};
use crate::formatter::{ContentFormatter, FormatResult};
use crate::platforms::Platform;
use crate::storage::{FileStore, KeyValueStore, KeyValueStoreExt, ARCHIVE_KEY};
use crate::types::{AppSettings, ArchiveExtras, ArchiveFile, Post, PostEdit};
use crate::{BlogwizError, Config, Result};

/// How an export attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Canceled,
    Exported { path: PathBuf },
}

/// How an import attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Canceled,
    Imported {
        path: PathBuf,
        history_count: usize,
        has_post: bool,
    },
}

/// Orchestrates the user-facing verbs over the post store and history
pub struct PublishCoordinator {
    store: Arc<dyn KeyValueStore>,
    files: Arc<dyn FileOps>,
    key: String,
    posts: PostStore,
    history: HistoryLedger,
    settings: AppSettings,
    extras: ArchiveExtras,
    events: EventBus,
}

impl PublishCoordinator {
    /// Load state from `store` under `key`
    ///
    /// A missing or corrupt archive starts from an empty state.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        files: Arc<dyn FileOps>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let archive: ArchiveFile = store.get(&key, ArchiveFile::default());
        tracing::debug!(
            key = %key,
            history = archive.history.len(),
            has_post = !archive.posts.is_empty(),
            "loaded archive"
        );

        let extras = archive.extras();
        Self {
            store,
            files,
            key,
            posts: PostStore::with_current(archive.posts.into_iter().next()),
            history: HistoryLedger::from_entries(archive.history),
            settings: archive.settings,
            extras,
            events: EventBus::default(),
        }
    }

    /// File-backed store and local files as described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_files(config, LocalFiles::new(config.export_dir()))
    }

    /// File-backed store from `config` with a caller-chosen file port
    pub fn from_config_with_files(config: &Config, files: impl FileOps + 'static) -> Self {
        Self::new(
            Arc::new(FileStore::new(config.storage_dir())),
            Arc::new(files),
            config.storage.key.clone(),
        )
    }

    /// Throwaway in-memory state
    pub fn in_memory(files: impl FileOps + 'static) -> Self {
        Self::new(
            Arc::new(crate::storage::MemoryStore::new()),
            Arc::new(files),
            ARCHIVE_KEY,
        )
    }

    pub fn current(&self) -> Option<&Post> {
        self.posts.current()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn extras(&self) -> &ArchiveExtras {
        &self.extras
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Open an empty draft with a fresh id (in memory only)
    pub fn new_post(&mut self) -> &Post {
        let post = self.posts.new_post(Utc::now());
        self.events.emit(Event::PostCreated {
            post_id: post.id.clone(),
        });
        post
    }

    /// Change fields of the open post (in memory only)
    pub fn edit_current(&mut self, edit: &PostEdit) -> Result<&Post> {
        self.posts.edit(edit)
    }

    /// Save `post`, snapshot it into history and write the archive
    ///
    /// The in-memory state is updated even when the write fails; the write
    /// error is still returned.
    pub fn save(&mut self, post: Post) -> Result<Post> {
        let Commit { post, entry } = self.posts.save(post, Utc::now());
        let history_id = entry.id.clone();
        self.history.append(entry);
        self.events.emit(Event::PostSaved {
            post_id: post.id.clone(),
            history_id,
        });
        self.flush()?;
        Ok(post)
    }

    /// Save the open post
    pub fn save_current(&mut self) -> Result<Post> {
        let post = self.require_current()?.clone();
        self.save(post)
    }

    /// Publish `post`, snapshot it into history and write the archive
    pub fn publish(&mut self, post: Post) -> Result<Post> {
        let first_publish = self
            .posts
            .current()
            .filter(|p| p.id == post.id)
            .map_or(true, |p| p.published_at.is_none())
            && post.published_at.is_none();

        let Commit { post, entry } = self.posts.publish(post, Utc::now());
        let history_id = entry.id.clone();
        self.history.append(entry);
        tracing::info!(post_id = %post.id, title = %post.title, first_publish, "post published");
        self.events.emit(Event::PostPublished {
            post_id: post.id.clone(),
            history_id,
            first_publish,
        });
        self.flush()?;
        Ok(post)
    }

    /// Publish the open post
    pub fn publish_current(&mut self) -> Result<Post> {
        let post = self.require_current()?.clone();
        self.publish(post)
    }

    /// Open a history entry as a new post (in memory only)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no entry has `history_id`.
    pub fn restore(&mut self, history_id: &str) -> Result<&Post> {
        let entry = self
            .history
            .get(history_id)
            .cloned()
            .ok_or_else(|| not_found(history_id))?;
        let post = self.posts.restore(&entry, Utc::now());
        self.events.emit(Event::PostRestored {
            post_id: post.id.clone(),
            from_history_id: entry.id,
        });
        Ok(post)
    }

    /// Delete a history entry; deleting an unknown id is a no-op
    ///
    /// The open post is never touched. Returns whether an entry was removed.
    pub fn delete(&mut self, history_id: &str) -> Result<bool> {
        let removed = self.history.remove(history_id);
        if removed {
            tracing::debug!(history_id, "deleted history entry");
            self.events.emit(Event::HistoryEntryDeleted {
                history_id: history_id.to_string(),
            });
        }
        self.flush()?;
        Ok(removed)
    }

    /// Format the open post for `platform` with the stored credentials
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` with no open post and
    /// `FormatError::InvalidConfig` when credentials are incomplete. A
    /// payload that fails to build is *not* an error: it comes back as an
    /// unsuccessful [`FormatResult`].
    pub fn format(&self, platform: Platform) -> Result<FormatResult> {
        self.format_at(platform, Utc::now())
    }

    /// [`PublishCoordinator::format`] with the clock supplied
    pub fn format_at(&self, platform: Platform, now: DateTime<Utc>) -> Result<FormatResult> {
        let post = self.require_current()?;
        let config = self.settings.platforms.config_for(platform);
        if !ConfigValidator::is_valid(&config) {
            let missing = ConfigValidator::missing_fields(&config)
                .into_iter()
                .map(String::from)
                .collect();
            return Err(FormatError::InvalidConfig { platform, missing }.into());
        }

        let result = ContentFormatter::format_at(post, &config, now);
        self.events.emit(Event::PostFormatted {
            post_id: post.id.clone(),
            platform,
            success: result.success,
        });
        Ok(result)
    }

    /// Rewrite the open post's HTML for `platform`
    pub fn convert_markup(&self, platform: Platform) -> Result<String> {
        let post = self.require_current()?;
        Ok(ContentFormatter::convert_markup(&post.content, platform)?)
    }

    /// Replace the settings and write the archive
    pub fn update_settings(&mut self, settings: AppSettings) -> Result<()> {
        self.settings = settings;
        self.events.emit(Event::SettingsChanged);
        tracing::debug!("settings updated");
        self.flush()
    }

    /// Save the open post if it has a title or content
    ///
    /// Returns the saved post, or `None` when there was nothing to save.
    pub fn autosave(&mut self) -> Result<Option<Post>> {
        let has_text = self.posts.current().map_or(false, Post::has_text);
        if !has_text {
            tracing::debug!("autosave skipped, nothing to save");
            self.events.emit(Event::AutosaveSkipped);
            return Ok(None);
        }
        self.save_current().map(Some)
    }

    /// Snapshot of everything the archive carries
    ///
    /// `posts` holds at most the open post.
    pub fn archive(&self) -> ArchiveFile {
        ArchiveFile {
            posts: self.posts.current().cloned().into_iter().collect(),
            settings: self.settings.clone(),
            history: self.history.entries(),
            categories: self.extras.categories.clone(),
            tags: self.extras.tags.clone(),
            keywords: self.extras.keywords.clone(),
            thumbnails: self.extras.thumbnails.clone(),
        }
    }

    /// Write the whole archive under the persistence key
    pub fn flush(&self) -> Result<()> {
        let archive = self.archive();
        if let Err(e) = self.store.set(&self.key, &archive) {
            tracing::warn!(key = %self.key, error = %e, "failed to write archive");
            return Err(e);
        }
        tracing::debug!(key = %self.key, history = archive.history.len(), "archive written");
        Ok(())
    }

    /// Ask where to save and write the archive there as pretty JSON
    pub async fn export(&self) -> Result<ExportOutcome> {
        let options = DialogOptions {
            title: Some("Export archive".to_string()),
            default_path: Some(PathBuf::from(default_export_filename(Utc::now()))),
            filters: vec![FileFilter::json()],
        };
        let path = match self.files.save_file_dialog(&options).await {
            Selection::Canceled => {
                tracing::debug!("export canceled");
                return Ok(ExportOutcome::Canceled);
            }
            Selection::Chosen(path) => path,
        };

        let archive = self.archive();
        let json = serde_json::to_string_pretty(&archive).map_err(StorageError::Encode)?;
        self.files.save_file(&path, &json).await?;

        tracing::info!(path = %path.display(), history = archive.history.len(), "archive exported");
        self.events.emit(Event::ArchiveExported {
            path: path.display().to_string(),
            history_count: archive.history.len(),
        });
        Ok(ExportOutcome::Exported { path })
    }

    /// Ask for an archive file and replace settings and history with it
    ///
    /// The first post in the file, if any, becomes the open post. A file
    /// that cannot be read, parsed or written back changes nothing.
    pub async fn import(&mut self) -> Result<ImportOutcome> {
        let options = DialogOptions {
            title: Some("Import archive".to_string()),
            default_path: None,
            filters: vec![FileFilter::json()],
        };
        let path = match self.files.select_file(&options).await {
            Selection::Chosen(paths) => match paths.into_iter().next() {
                Some(path) => path,
                None => return Ok(ImportOutcome::Canceled),
            },
            Selection::Canceled => {
                tracing::debug!("import canceled");
                return Ok(ImportOutcome::Canceled);
            }
        };

        let raw = self.files.load_file(&path).await?;
        let archive: ArchiveFile = serde_json::from_str(&raw).map_err(FileError::Parse)?;

        let history_count = archive.history.len();
        let has_post = !archive.posts.is_empty();
        let previous_post = self.posts.current().cloned();
        let previous = self.archive();
        self.apply_archive(archive);
        if let Err(e) = self.flush() {
            self.apply_archive(previous);
            self.posts.set_current(previous_post);
            return Err(e);
        }

        tracing::info!(path = %path.display(), history = history_count, has_post, "archive imported");
        self.events.emit(Event::ArchiveImported {
            path: path.display().to_string(),
            history_count,
            has_post,
        });
        Ok(ImportOutcome::Imported {
            path,
            history_count,
            has_post,
        })
    }

    fn apply_archive(&mut self, archive: ArchiveFile) {
        self.extras = archive.extras();
        self.settings = archive.settings;
        self.history.replace_all(archive.history);
        if let Some(post) = archive.posts.into_iter().next() {
            self.posts.set_current(Some(post));
        }
    }

    fn require_current(&self) -> Result<&Post> {
        self.posts
            .current()
            .ok_or_else(|| BlogwizError::InvalidInput("No post is open".to_string()))
    }
}

fn not_found(history_id: &str) -> BlogwizError {
    BlogwizError::InvalidInput(format!("History entry not found: {}", history_id))
}
