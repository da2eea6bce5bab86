//! Core types for Blogwiz

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::platforms::PlatformSettings;

/// Maximum number of plain-text characters kept in an excerpt
pub const EXCERPT_MAX_CHARS: usize = 150;

/// Allocate a fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The canonical, platform-neutral blog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// HTML produced by the rich-text editor
    #[serde(default)]
    pub content: String,
    /// Derived from `content` on every save
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create an empty draft with a fresh identity
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            title: String::new(),
            content: String::new(),
            excerpt: String::new(),
            category: None,
            tags: Tags::default(),
            thumbnail: None,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// True when there is something worth autosaving
    pub fn has_text(&self) -> bool {
        !self.title.is_empty() || !self.content.is_empty()
    }

    /// Category, ignoring the empty string the editor leaves behind
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.trim().is_empty())
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(format!(
                "Invalid status: '{}'. Valid options: draft, published",
                s
            )),
        }
    }
}

/// Ordered set of tags
///
/// Insertion order is preserved and duplicates are rejected. Deserializing a
/// list that contains duplicates keeps the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns false for blank or already-present tags
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Remove a tag; returns false when it was not present
    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Tags {
    fn from(values: Vec<String>) -> Self {
        let mut tags = Tags::new();
        for value in &values {
            tags.insert(value);
        }
        tags
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}

impl<'a> FromIterator<&'a str> for Tags {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for value in iter {
            tags.insert(value);
        }
        tags
    }
}

/// A set of field changes applied to the open post
///
/// `category`/`thumbnail` set to an empty string clear the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
}

impl PostEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.thumbnail.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
    }

    /// Apply the edit in place; identity, status and timestamps are untouched
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(category) = &self.category {
            post.category = non_blank(category);
        }
        if let Some(thumbnail) = &self.thumbnail {
            post.thumbnail = non_blank(thumbnail);
        }
        for tag in &self.remove_tags {
            post.tags.remove(tag);
        }
        for tag in &self.add_tags {
            post.tags.insert(tag);
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Immutable snapshot taken at every save or publish
///
/// The full content is duplicated so history stays readable after the live
/// post is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub post_id: String,
    #[serde(default)]
    pub title: String,
    pub status: PostStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub content: String,
}

impl HistoryEntry {
    /// Snapshot `post` as it is right now
    pub fn snapshot(post: &Post, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            post_id: post.id.clone(),
            title: post.title.clone(),
            status: post.status,
            timestamp: now,
            content: post.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: '{}'. Valid options: light, dark", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub auto_save: bool,
    /// Milliseconds between autosaves
    pub auto_save_interval: u64,
    pub theme: Theme,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            auto_save_interval: 3000,
            theme: Theme::Light,
            font_size: 14,
            font_family: "Inter".to_string(),
        }
    }
}

impl EditorConfig {
    /// Autosave period, or `None` when autosave is off
    pub fn autosave_period(&self) -> Option<std::time::Duration> {
        (self.auto_save && self.auto_save_interval > 0)
            .then(|| std::time::Duration::from_millis(self.auto_save_interval))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shortcuts {
    pub save: String,
    pub publish: String,
    pub new_post: String,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            save: "Ctrl+S".to_string(),
            publish: "Ctrl+Enter".to_string(),
            new_post: "Ctrl+N".to_string(),
        }
    }
}

/// Application settings persisted inside the archive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub editor: EditorConfig,
    pub platforms: PlatformSettings,
    pub shortcuts: Shortcuts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub post_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub post_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSuggestion {
    pub id: String,
    pub keyword: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub frequency: u32,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Collections the archive carries but the editor never produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveExtras {
    pub categories: Vec<Category>,
    pub tags: Vec<TagInfo>,
    pub keywords: Vec<KeywordSuggestion>,
    pub thumbnails: Vec<Thumbnail>,
}

/// Export/import unit and the persisted blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveFile {
    pub posts: Vec<Post>,
    pub settings: AppSettings,
    pub history: Vec<HistoryEntry>,
    pub categories: Vec<Category>,
    pub tags: Vec<TagInfo>,
    pub keywords: Vec<KeywordSuggestion>,
    pub thumbnails: Vec<Thumbnail>,
}

impl ArchiveFile {
    /// Split off the side collections
    pub fn extras(&self) -> ArchiveExtras {
        ArchiveExtras {
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            keywords: self.keywords.clone(),
            thumbnails: self.thumbnails.clone(),
        }
    }
}
