//! Event system for lifecycle notifications
//!
//! The coordinator announces every state change on an in-process bus so a
//! UI layer can observe it without polling the coordinator itself.
//!
//! # Architecture
//!
//! The event bus uses `tokio::sync::broadcast` for multi-subscriber support.
//! Emission never blocks: with no subscribers the event is dropped, and a
//! lagging subscriber loses the oldest events first.
//!
//! # Example
//!
//! ```no_run
//! use libblogwiz::service::events::{Event, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::PostCreated {
//!     post_id: "abc123".to_string(),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::platforms::Platform;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Default per-subscriber buffer
pub const DEFAULT_CAPACITY: usize = 100;

/// Event bus for distributing lifecycle events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    /// Create a new event bus buffering `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: Event) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A fresh post was opened
    PostCreated { post_id: String },

    /// The open post was saved and snapshotted
    PostSaved { post_id: String, history_id: String },

    /// The open post was published
    PostPublished {
        post_id: String,
        history_id: String,
        /// False when the post was already published before this call
        first_publish: bool,
    },

    /// A history entry was reopened as a new post
    PostRestored {
        post_id: String,
        from_history_id: String,
    },

    /// A history entry was deleted
    HistoryEntryDeleted { history_id: String },

    /// Settings were replaced
    SettingsChanged,

    /// A post was formatted for a target
    PostFormatted {
        post_id: String,
        platform: Platform,
        success: bool,
    },

    /// The archive was written to a file
    ArchiveExported { path: String, history_count: usize },

    /// An archive file replaced the in-memory state
    ArchiveImported {
        path: String,
        history_count: usize,
        has_post: bool,
    },

    /// An autosave tick found nothing to save
    AutosaveSkipped,
}
