//! Post store: the single open post and its lifecycle transitions
//!
//! Every transition takes the clock as an argument, so the store itself is
//! pure state. Persistence and events belong to the coordinator.

use chrono::{DateTime, Utc};

use crate::markup;
use crate::types::{HistoryEntry, Post, PostEdit, PostStatus};
use crate::{BlogwizError, Result};

/// Result of a save or publish
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub post: Post,
    pub entry: HistoryEntry,
}

#[derive(Debug, Clone, Default)]
pub struct PostStore {
    current: Option<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded post
    pub fn with_current(post: Option<Post>) -> Self {
        Self { current: post }
    }

    pub fn current(&self) -> Option<&Post> {
        self.current.as_ref()
    }

    /// Replace the open post wholesale
    pub fn set_current(&mut self, post: Option<Post>) {
        self.current = post;
    }

    /// Open an empty draft with a never-used id
    pub fn new_post(&mut self, now: DateTime<Utc>) -> &Post {
        let post = Post::new(now);
        tracing::debug!(post_id = %post.id, "new post");
        self.current.insert(post)
    }

    /// Apply field changes to the open post without committing them
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no post is open.
    pub fn edit(&mut self, edit: &PostEdit) -> Result<&Post> {
        let post = self
            .current
            .as_mut()
            .ok_or_else(|| BlogwizError::InvalidInput("No post is open".to_string()))?;
        edit.apply_to(post);
        tracing::debug!(post_id = %post.id, "edited post");
        Ok(post)
    }

    /// Commit `post` as a draft save
    pub fn save(&mut self, post: Post, now: DateTime<Utc>) -> Commit {
        let post = self.reconcile(post, now);
        tracing::debug!(post_id = %post.id, status = %post.status, "saved post");
        self.commit(post, now)
    }

    /// Commit `post` and mark it published
    ///
    /// `publishedAt` is set only the first time; republishing advances
    /// `updatedAt` and leaves `publishedAt` alone.
    pub fn publish(&mut self, post: Post, now: DateTime<Utc>) -> Commit {
        let mut post = self.reconcile(post, now);
        post.status = PostStatus::Published;
        if post.published_at.is_none() {
            post.published_at = Some(now);
        }
        tracing::debug!(post_id = %post.id, "published post");
        self.commit(post, now)
    }

    /// Open a copy of a history entry under a brand-new identity
    ///
    /// Category, tags and thumbnail start empty and `publishedAt` is unset,
    /// whatever the entry's status.
    pub fn restore(&mut self, entry: &HistoryEntry, now: DateTime<Utc>) -> &Post {
        let mut post = Post::new(now);
        post.title = entry.title.clone();
        post.content = entry.content.clone();
        post.excerpt = markup::excerpt(&entry.content);
        post.status = entry.status;
        tracing::debug!(post_id = %post.id, history_id = %entry.id, "restored post");
        self.current.insert(post)
    }

    /// Carry immutable fields over from the open post and refresh derived ones
    fn reconcile(&self, mut post: Post, now: DateTime<Utc>) -> Post {
        if let Some(existing) = self.current.as_ref().filter(|p| p.id == post.id) {
            post.created_at = existing.created_at;
            if existing.published_at.is_some() {
                post.published_at = existing.published_at;
            }
            if existing.is_published() {
                post.status = PostStatus::Published;
            }
        }
        post.excerpt = markup::excerpt(&post.content);
        post.updated_at = now.max(post.updated_at).max(post.created_at);
        post
    }

    fn commit(&mut self, post: Post, now: DateTime<Utc>) -> Commit {
        let entry = HistoryEntry::snapshot(&post, now);
        self.current = Some(post.clone());
        Commit { post, entry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn written(store: &mut PostStore, now: DateTime<Utc>) -> Post {
        let mut post = store.new_post(now).clone();
        post.title = "Hi".to_string();
        post.content = "<p>World</p>".to_string();
        post
    }

    #[test]
    fn test_new_post_never_reuses_id() {
        let mut store = PostStore::new();
        let first = store.new_post(t(0)).id.clone();
        let second = store.new_post(t(0)).id.clone();
        assert_ne!(first, second);
        assert_eq!(store.current().unwrap().id, second);
    }

    #[test]
    fn test_save_derives_excerpt_and_snapshot() {
        let mut store = PostStore::new();
        let post = written(&mut store, t(0));
        let commit = store.save(post, t(1));

        assert_eq!(commit.post.excerpt, "World");
        assert_eq!(commit.post.updated_at, t(1));
        assert_eq!(commit.post.status, PostStatus::Draft);
        assert_eq!(commit.entry.post_id, commit.post.id);
        assert_ne!(commit.entry.id, commit.post.id);
        assert_eq!(commit.entry.content, "<p>World</p>");
        assert_eq!(commit.entry.timestamp, t(1));
        assert_eq!(store.current(), Some(&commit.post));
    }

    #[test]
    fn test_double_save_gives_two_entries() {
        let mut store = PostStore::new();
        let post = written(&mut store, t(0));
        let a = store.save(post.clone(), t(1));
        let b = store.save(post, t(2));
        assert_ne!(a.entry.id, b.entry.id);
        assert_eq!(a.entry.content, b.entry.content);
        assert_ne!(a.entry.timestamp, b.entry.timestamp);
    }

    #[test]
    fn test_publish_twice_keeps_published_at() {
        let mut store = PostStore::new();
        let post = written(&mut store, t(0));

        let first = store.publish(post, t(5));
        assert_eq!(first.post.status, PostStatus::Published);
        assert_eq!(first.post.published_at, Some(t(5)));

        let second = store.publish(first.post.clone(), t(9));
        assert_eq!(second.post.published_at, Some(t(5)));
        assert_eq!(second.post.updated_at, t(9));
        assert_eq!(second.post.id, first.post.id);
        assert_eq!(second.entry.status, PostStatus::Published);
    }

    #[test]
    fn test_save_after_publish_stays_published() {
        let mut store = PostStore::new();
        let post = written(&mut store, t(0));
        let published = store.publish(post, t(1)).post;

        let mut stale = published.clone();
        stale.status = PostStatus::Draft;
        stale.published_at = None;
        stale.created_at = t(30);
        let saved = store.save(stale, t(2)).post;

        assert_eq!(saved.status, PostStatus::Published);
        assert_eq!(saved.published_at, Some(t(1)));
        assert_eq!(saved.created_at, t(0));
    }

    #[test]
    fn test_updated_at_never_goes_backwards() {
        let mut store = PostStore::new();
        let post = written(&mut store, t(10));
        let saved = store.save(post, t(20)).post;

        // clock stepped back
        let again = store.save(saved, t(15)).post;
        assert_eq!(again.updated_at, t(20));
        assert!(again.updated_at >= again.created_at);
    }

    #[test]
    fn test_restore_gets_new_identity() {
        let mut store = PostStore::new();
        let post = written(&mut store, t(0));
        let commit = store.publish(post, t(1));

        let restored = store.restore(&commit.entry, t(7)).clone();
        assert_ne!(restored.id, commit.post.id);
        assert_eq!(restored.title, "Hi");
        assert_eq!(restored.content, "<p>World</p>");
        assert_eq!(restored.excerpt, "World");
        assert_eq!(restored.status, PostStatus::Published);
        assert_eq!(restored.created_at, t(7));
        assert_eq!(restored.updated_at, t(7));
        assert!(restored.published_at.is_none());
        assert!(restored.tags.is_empty());
    }

    #[test]
    fn test_edit_without_post_is_invalid_input() {
        let mut store = PostStore::new();
        let err = store.edit(&PostEdit::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_edit_changes_fields_only() {
        let mut store = PostStore::new();
        let id = store.new_post(t(0)).id.clone();
        let edited = store
            .edit(&PostEdit {
                title: Some("T".to_string()),
                add_tags: vec!["x".to_string()],
                ..PostEdit::default()
            })
            .unwrap();
        assert_eq!(edited.id, id);
        assert_eq!(edited.title, "T");
        assert_eq!(edited.updated_at, t(0));
    }
}
