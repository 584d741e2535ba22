//! Navigation intents: a transition the host wants to perform.
//!
//! DESIGN
//! ======
//! An intent is created the moment the host attempts a transition and is
//! either committed or discarded. `replay` decides how a confirmed intent
//! is re-issued once interception has been removed.

#[cfg(test)]
#[path = "intent_test.rs"]
mod intent_test;

use serde::{Deserialize, Serialize};

/// How a transition mutates history if it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Add a new history entry.
    Push,
    /// Overwrite the current history entry.
    Replace,
    /// Move the history cursor by a relative offset (back/forward).
    Go(i32),
}

/// How a confirmed non push/replace intent is re-issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Always advance exactly one step, whatever offset was requested.
    #[default]
    StepForward,
    /// Replay the originally requested offset.
    PreserveOffset,
}

/// A pending, not-yet-committed navigation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub target_path: String,
    pub mode: NavigationMode,
}

impl NavigationIntent {
    #[must_use]
    pub fn push(target_path: impl Into<String>) -> Self {
        Self { target_path: target_path.into(), mode: NavigationMode::Push }
    }

    #[must_use]
    pub fn replace(target_path: impl Into<String>) -> Self {
        Self { target_path: target_path.into(), mode: NavigationMode::Replace }
    }

    /// Relative move. The host fills in `target_path` once it knows which
    /// entry the offset lands on.
    #[must_use]
    pub fn go(offset: i32) -> Self {
        Self { target_path: String::new(), mode: NavigationMode::Go(offset) }
    }

    /// Build the intent that is issued after the user confirms.
    ///
    /// Push and replace keep their path and mode. Any relative move becomes
    /// `Go(1)` under [`ReplayPolicy::StepForward`], or keeps its offset under
    /// [`ReplayPolicy::PreserveOffset`]. Relative moves come back without a
    /// path since the host decides where they land.
    #[must_use]
    pub fn replay(&self, policy: ReplayPolicy) -> Self {
        match (self.mode, policy) {
            (NavigationMode::Push | NavigationMode::Replace, _) => self.clone(),
            (NavigationMode::Go(offset), ReplayPolicy::PreserveOffset) => Self::go(offset),
            (NavigationMode::Go(_), ReplayPolicy::StepForward) => Self::go(1),
        }
    }
}

impl std::fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            NavigationMode::Push => write!(f, "push {}", self.target_path),
            NavigationMode::Replace => write!(f, "replace {}", self.target_path),
            NavigationMode::Go(offset) if self.target_path.is_empty() => write!(f, "go {offset}"),
            NavigationMode::Go(offset) => write!(f, "go {offset} ({})", self.target_path),
        }
    }
}
