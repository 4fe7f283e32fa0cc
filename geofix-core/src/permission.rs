//! Permission gate in front of the location provider

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Runtime permissions the controller may need.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    #[default]
    FineLocation,
    CoarseLocation,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::FineLocation => f.write_str("precise location"),
            Permission::CoarseLocation => f.write_str("approximate location"),
        }
    }
}

/// The platform's permission system.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Whether `permission` is already granted. Must not block.
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask the user for `permission`, suspending until they answer.
    async fn request(&self, permission: Permission) -> bool;
}

/// Return `true` if `permission` is granted, prompting the user if needed.
pub async fn ensure_permission(gate: &dyn PermissionGate, permission: Permission) -> bool {
    if gate.is_granted(permission) {
        return true;
    }
    debug!(%permission, "permission not granted, prompting");
    gate.request(permission).await
}

/// Gate with a fixed answer, for headless runs and tests.
///
/// A granted answer sticks, so later checks skip the prompt.
#[derive(Debug)]
pub struct FixedGate {
    granted: AtomicBool,
    answer: bool,
    prompts: AtomicUsize,
}

impl FixedGate {
    /// Permission already granted; never prompts.
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            answer: true,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Not granted yet; every prompt is answered with `answer`.
    pub fn answering(answer: bool) -> Self {
        Self {
            granted: AtomicBool::new(false),
            answer,
            prompts: AtomicUsize::new(0),
        }
    }

    /// How many times the user was prompted.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionGate for FixedGate {
    fn is_granted(&self, _permission: Permission) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request(&self, _permission: Permission) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if self.answer {
            self.granted.store(true, Ordering::SeqCst);
        }
        self.answer
    }
}
