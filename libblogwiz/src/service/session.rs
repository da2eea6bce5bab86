//! Editor session: the single writer
//!
//! Every mutation (user edits, saves, autosave ticks) arrives as a
//! [`SessionCommand`] on one queue and is applied in order by
//! [`EditorSession::run`]. Nothing else holds the coordinator while the
//! session runs.

use tokio::sync::mpsc;

use super::autosave::Autosave;
use super::PublishCoordinator;
use crate::types::{AppSettings, PostEdit};

/// Queue depth for session commands
pub const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Apply field changes to the open post
    Edit(PostEdit),
    /// Save the open post
    Save,
    /// Publish the open post
    Publish,
    /// Replace the settings (rearms autosave)
    UpdateSettings(Box<AppSettings>),
    /// Autosave timer fired
    Tick,
    /// Stop the session
    Shutdown,
}

pub struct EditorSession {
    coordinator: PublishCoordinator,
    commands: mpsc::Receiver<SessionCommand>,
    autosave: Autosave,
}

impl EditorSession {
    /// Wrap `coordinator`; the returned sender feeds the session
    ///
    /// A session with no open post starts one.
    pub fn new(mut coordinator: PublishCoordinator) -> (Self, mpsc::Sender<SessionCommand>) {
        if coordinator.current().is_none() {
            coordinator.new_post();
        }
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let autosave = Autosave::new(&tx);
        let session = Self {
            coordinator,
            commands: rx,
            autosave,
        };
        (session, tx)
    }

    pub fn coordinator(&self) -> &PublishCoordinator {
        &self.coordinator
    }

    /// Process commands until `Shutdown` or until every sender is dropped
    ///
    /// On the way out the timer is cancelled and the archive is written, then
    /// the coordinator is handed back.
    pub async fn run(mut self) -> PublishCoordinator {
        self.rearm();
        tracing::debug!("editor session started");

        while let Some(command) = self.commands.recv().await {
            if command == SessionCommand::Shutdown {
                break;
            }
            self.handle(command);
        }

        self.autosave.cancel();
        if let Err(e) = self.coordinator.flush() {
            tracing::warn!(error = %e, "final flush failed");
        }
        tracing::debug!("editor session stopped");
        self.coordinator
    }

    fn handle(&mut self, command: SessionCommand) {
        let outcome = match command {
            SessionCommand::Edit(edit) => self.coordinator.edit_current(&edit).map(|_| ()),
            SessionCommand::Save => self.coordinator.save_current().map(|_| ()),
            SessionCommand::Publish => self.coordinator.publish_current().map(|_| ()),
            SessionCommand::UpdateSettings(settings) => {
                let result = self.coordinator.update_settings(*settings);
                self.rearm();
                result
            }
            // a tick queued before autosave was turned off
            SessionCommand::Tick if !self.autosave.is_armed() => Ok(()),
            SessionCommand::Tick => self.coordinator.autosave().map(|_| ()),
            SessionCommand::Shutdown => Ok(()),
        };
        if let Err(e) = outcome {
            tracing::warn!(error = %e, "session command failed");
        }
    }

    fn rearm(&mut self) {
        let period = self.coordinator.settings().editor.autosave_period();
        self.autosave.rearm(period);
    }
}
