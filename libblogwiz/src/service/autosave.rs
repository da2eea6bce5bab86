//! Periodic autosave timer
//!
//! The timer never touches state. It only drops a [`SessionCommand::Tick`]
//! into the session's queue, so the save itself runs on the session's single
//! writer like any other command.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::session::SessionCommand;

/// At most one running interval task
pub struct Autosave {
    commands: mpsc::WeakSender<SessionCommand>,
    task: Option<JoinHandle<()>>,
    period: Option<Duration>,
}

impl Autosave {
    /// A disarmed timer feeding `commands`
    ///
    /// Holds only a weak handle: the session still ends when every other
    /// sender is gone.
    pub fn new(commands: &mpsc::Sender<SessionCommand>) -> Self {
        Self {
            commands: commands.downgrade(),
            task: None,
            period: None,
        }
    }

    /// Start ticking every `period`, replacing any running timer
    ///
    /// A zero period leaves the timer disarmed.
    pub fn arm(&mut self, period: Duration) {
        self.cancel();
        if period.is_zero() {
            return;
        }

        let commands = self.commands.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(sender) = commands.upgrade() else {
                    break;
                };
                if sender.send(SessionCommand::Tick).await.is_err() {
                    break;
                }
            }
        }));
        self.period = Some(period);
        tracing::debug!(period_ms = period.as_millis() as u64, "autosave armed");
    }

    /// Arm with `period`, or disarm for `None`; a no-op when unchanged
    pub fn rearm(&mut self, period: Option<Duration>) {
        if period == self.period && self.is_armed() == period.is_some() {
            return;
        }
        match period {
            Some(period) => self.arm(period),
            None => self.cancel(),
        }
    }

    /// Stop the timer; no tick is sent after this returns
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("autosave cancelled");
        }
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.cancel();
    }
}
