//! Post → platform payload conversion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::markup;
use crate::platforms::{custom, naver, tistory, Platform, PlatformConfig};
use crate::types::Post;

/// Outcome of one formatting attempt
///
/// Never partially successful: a failure carries empty `content` and
/// `metadata` plus the error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatResult {
    pub platform: Platform,
    pub content: String,
    pub metadata: Map<String, Value>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormatResult {
    pub fn ok(platform: Platform, content: String, metadata: Map<String, Value>) -> Self {
        Self {
            platform,
            content,
            metadata,
            success: true,
            error: None,
        }
    }

    pub fn failure(platform: Platform, error: impl Into<String>) -> Self {
        Self {
            platform,
            content: String::new(),
            metadata: Map::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Stateless converter from the canonical post to each target's payload
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentFormatter;

impl ContentFormatter {
    /// Format `post` for the target `config` addresses
    ///
    /// Uses the current time only as Naver's fallback publish date.
    pub fn format(post: &Post, config: &PlatformConfig) -> FormatResult {
        Self::format_at(post, config, Utc::now())
    }

    /// Same as [`ContentFormatter::format`] with the clock supplied
    pub fn format_at(post: &Post, config: &PlatformConfig, now: DateTime<Utc>) -> FormatResult {
        let platform = config.platform();
        let built = match config {
            PlatformConfig::Tistory(cfg) => tistory::build(post, cfg),
            PlatformConfig::Naver(cfg) => naver::build(post, cfg, now),
            PlatformConfig::Custom => custom::build(post),
        };

        match built {
            Ok((content, metadata)) => {
                tracing::debug!(%platform, post_id = %post.id, bytes = content.len(), "formatted post");
                FormatResult::ok(platform, content, metadata)
            }
            Err(e) => {
                tracing::debug!(%platform, post_id = %post.id, error = %e, "formatting failed");
                FormatResult::failure(platform, e.to_string())
            }
        }
    }

    /// Rewrite bare HTML for `platform`; see [`markup::convert_markup`]
    pub fn convert_markup(html: &str, platform: Platform) -> Result<String, FormatError> {
        markup::convert_markup(html, platform)
    }

    /// File name offered when a formatted payload is saved to disk
    pub fn download_filename(post: &Post, platform: Platform) -> String {
        let stem = if post.title.trim().is_empty() {
            "post".to_string()
        } else {
            sanitize_file_stem(post.title.trim())
        };
        format!("{}_{}.txt", stem, platform)
    }
}

fn sanitize_file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
