//! Host navigation capability.
//!
//! DESIGN
//! ======
//! The host exposes exactly one interception slot. Whoever registers an
//! interceptor owns the slot until it unregisters with the id it was given.
//! The guard receives the controller explicitly instead of reaching for a
//! global history object, so tests can substitute `MemoryHistory`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::NavigationIntent;

/// Opaque token for one interceptor registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterceptorId(Uuid);

impl InterceptorId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InterceptorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InterceptorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An interceptor's answer to an attempted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Block,
}

/// Callback consulted before a transition is applied.
pub type Interceptor = Box<dyn FnMut(&NavigationIntent) -> Verdict>;

/// What `navigate` did with a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Applied,
    Blocked,
    /// Relative move past either end of history; ignored.
    OutOfRange,
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("interception slot already held by {holder}")]
    SlotOccupied { holder: InterceptorId },
}

pub trait NavigationController {
    /// Install `interceptor` in the interception slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is already held.
    fn register_interceptor(&mut self, interceptor: Interceptor) -> Result<InterceptorId, NavigationError>;

    /// Remove the interceptor registered under `id`. Returns `false` when
    /// `id` does not hold the slot.
    fn unregister_interceptor(&mut self, id: InterceptorId) -> bool;

    /// Attempt a transition, consulting the interceptor first if one is
    /// registered.
    fn navigate(&mut self, intent: NavigationIntent) -> NavigationOutcome;

    /// Path of the entry the host is currently showing.
    fn location(&self) -> String;
}
