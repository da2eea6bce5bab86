//! Blogwiz - write a blog post once, publish it everywhere
//!
//! This library holds the content-transformation and publication-lifecycle
//! core behind the wiz-* tools: per-platform payload formatting, credential
//! validation, the save/publish/restore state machine, the capped history
//! ledger, and archive export/import.

pub mod config;
pub mod error;
pub mod files;
pub mod formatter;
pub mod logging;
pub mod markup;
pub mod platforms;
pub mod service;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{BlogwizError, Result};
pub use formatter::{ContentFormatter, FormatResult};
pub use platforms::{Platform, PlatformConfig};
pub use service::PublishCoordinator;
pub use types::{ArchiveFile, HistoryEntry, Post, PostEdit, PostStatus};
