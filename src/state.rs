//! Guard-scoped state shared between the guard, its handle, and the
//! interceptor registered with the host.
//!
//! DESIGN
//! ======
//! `GuardSlot` lives behind `Rc<RefCell<_>>`. The interceptor only holds a
//! weak reference, so a slot that has been torn down lets transitions
//! through instead of keeping the guard alive from inside the controller.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::controller::{InterceptorId, Verdict};
use crate::intent::NavigationIntent;
use crate::prompt::{ConfirmRequest, ConfirmationPrompt, PromptText};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    Armed,
    #[default]
    Disarmed,
}

/// What happens when a transition is attempted while another one is still
/// waiting for an answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPolicy {
    /// Block the new attempt without prompting; the first intent stays.
    #[default]
    Reject,
    /// Drop the first intent and prompt for the new one.
    Supersede,
}

pub(crate) struct GuardSlot {
    pub(crate) prompt: Box<dyn ConfirmationPrompt>,
    pub(crate) policy: PendingPolicy,
    pub(crate) state: GuardState,
    pub(crate) text: PromptText,
    pub(crate) registration: Option<InterceptorId>,
    pub(crate) pending: Option<NavigationIntent>,
    /// Bumped on every arm so stale handles cannot release a newer arming.
    pub(crate) generation: u64,
}

impl GuardSlot {
    pub(crate) fn new(prompt: Box<dyn ConfirmationPrompt>, policy: PendingPolicy) -> Self {
        Self {
            prompt,
            policy,
            state: GuardState::Disarmed,
            text: PromptText::default(),
            registration: None,
            pending: None,
            generation: 0,
        }
    }

    /// Park `intent` and show `text`, subject to the pending policy.
    pub(crate) fn intercept(&mut self, text: &PromptText, intent: &NavigationIntent) -> Verdict {
        if self.state == GuardState::Disarmed {
            return Verdict::Allow;
        }

        match (&self.pending, self.policy) {
            (Some(pending), PendingPolicy::Reject) => {
                warn!(%pending, attempted = %intent, "transition rejected while another awaits confirmation");
                return Verdict::Block;
            }
            (Some(pending), PendingPolicy::Supersede) => {
                debug!(%pending, attempted = %intent, "pending transition superseded");
                self.prompt.close();
            }
            (None, _) => {}
        }

        debug!(transition = %intent, title = %text.title, "transition intercepted");
        self.pending = Some(intent.clone());
        self.prompt.show(ConfirmRequest::from(text));
        Verdict::Block
    }

    /// Drop the pending intent, if any, and take its prompt down.
    pub(crate) fn discard_pending(&mut self) -> Option<NavigationIntent> {
        let pending = self.pending.take();
        if pending.is_some() {
            self.prompt.close();
        }
        pending
    }
}
