//! # routeguard
//!
//! Route-leave confirmation for editing screens. While a
//! [`guard::NavigationGuard`] is armed, every transition the host attempts
//! is held until the user answers a confirmation prompt; confirming
//! re-issues the transition, canceling keeps the user where they are.
//!
//! The host history and the prompt are injected capabilities
//! ([`controller::NavigationController`], [`prompt::ConfirmationPrompt`]).
//! [`history::MemoryHistory`] and the prompts in [`prompt`] are ready-made
//! implementations, and [`session`] wires them into an interactive editor.

pub mod config;
pub mod controller;
pub mod guard;
pub mod history;
pub mod intent;
pub mod prompt;
pub mod session;
pub mod state;

pub use config::GuardConfig;
pub use controller::{NavigationController, NavigationOutcome};
pub use guard::{GuardError, GuardHandle, NavigationGuard, Resolution};
pub use history::MemoryHistory;
pub use intent::{NavigationIntent, NavigationMode, ReplayPolicy};
pub use prompt::{ConfirmationPrompt, PromptChoice, PromptText};
pub use state::{GuardState, PendingPolicy};
