//! Permission gates backed by a human
//!
//! FRAMEWORK PATTERN: suspend on a oneshot, resume from the action loop
//! - `request` opens the prompt through the action channel and awaits
//! - The reducer turns the user's key press into `Effect::AnswerPermission`
//! - The effect handler calls `answer`, which wakes the waiting request

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use geofix_core::{Permission, PermissionGate};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, info};

use crate::action::Action;

/// Gate that asks through the on-screen prompt.
///
/// Only one prompt is pending at a time; a newer request replaces an
/// unanswered one. "Allow" is remembered for the rest of the session,
/// "Deny" is not.
pub struct PromptGate {
    granted: AtomicBool,
    pending: Mutex<Option<oneshot::Sender<bool>>>,
    actions: mpsc::UnboundedSender<Action>,
}

impl PromptGate {
    pub fn new(actions: mpsc::UnboundedSender<Action>, pre_granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(pre_granted),
            pending: Mutex::new(None),
            actions,
        }
    }

    /// Resolve the pending prompt. No-op if nothing is waiting.
    pub async fn answer(&self, granted: bool) {
        match self.pending.lock().await.take() {
            Some(waiter) => {
                info!(granted, "permission answered");
                let _ = waiter.send(granted);
            }
            None => debug!(granted, "answer with no pending prompt"),
        }
    }
}

#[async_trait]
impl PermissionGate for PromptGate {
    fn is_granted(&self, _permission: Permission) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request(&self, permission: Permission) -> bool {
        let (tx, rx) = oneshot::channel();
        if self.pending.lock().await.replace(tx).is_some() {
            debug!("replacing unanswered prompt");
        }
        if self.actions.send(Action::PermissionPromptOpen(permission)).is_err() {
            return false;
        }

        // A dropped sender means the prompt was torn down: treat as denied
        let granted = rx.await.unwrap_or(false);
        if granted {
            self.granted.store(true, Ordering::SeqCst);
        }
        granted
    }
}

/// Gate that asks on stdin, for `--once`.
#[derive(Default)]
pub struct StdinGate {
    granted: AtomicBool,
}

impl StdinGate {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionGate for StdinGate {
    fn is_granted(&self, _permission: Permission) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request(&self, permission: Permission) -> bool {
        let mut stdout = tokio::io::stdout();
        let question = format!("Allow geofix to access this device's {}? [y/N] ", permission);
        if stdout.write_all(question.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return false;
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let granted = match lines.next_line().await {
            Ok(Some(line)) => is_yes(&line),
            _ => false,
        };
        if granted {
            self.granted.store(true, Ordering::SeqCst);
        }
        granted
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
