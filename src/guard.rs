//! Navigation guard: hold a transition until the user confirms it.
//!
//! DESIGN
//! ======
//! Arming registers an interceptor with the host controller. The interceptor
//! blocks every attempted transition, parks it as the pending intent, and
//! shows the confirmation prompt. The answer arrives through `resolve`:
//! confirm releases the interceptor and re-issues the transition, cancel
//! drops the intent and keeps the guard armed.
//!
//! The interceptor captures the prompt text it was registered with. `update`
//! swaps the registration when the text changes so a prompt can never show
//! stale text.
//!
//! `GuardHandle` is the scoped registration: dropping it disarms the guard,
//! and releasing it more than once is a no-op.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{info, warn};

use crate::config::GuardConfig;
use crate::controller::{Interceptor, InterceptorId, NavigationController, NavigationError, NavigationOutcome, Verdict};
use crate::intent::{NavigationIntent, NavigationMode, ReplayPolicy};
use crate::prompt::{ConfirmationPrompt, PromptChoice, PromptText};
use crate::state::{GuardSlot, GuardState};

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("guard is already armed")]
    AlreadyArmed,
    #[error("navigation controller is busy; guard calls cannot run inside a transition")]
    ControllerBusy,
    #[error("failed to register interceptor: {0}")]
    Registration(#[from] NavigationError),
}

/// Result of delivering the user's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The user confirmed; `intent` was re-issued with `outcome`. A relative
    /// move that was applied carries the path it landed on.
    Committed { intent: NavigationIntent, outcome: NavigationOutcome },
    /// The user canceled; the guard is still armed.
    Discarded(NavigationIntent),
    NothingPending,
}

pub struct NavigationGuard<C: NavigationController> {
    controller: Rc<RefCell<C>>,
    slot: Rc<RefCell<GuardSlot>>,
    defaults: PromptText,
    replay: ReplayPolicy,
}

impl<C: NavigationController> NavigationGuard<C> {
    #[must_use]
    pub fn new(controller: Rc<RefCell<C>>, prompt: Box<dyn ConfirmationPrompt>, config: GuardConfig) -> Self {
        Self {
            controller,
            slot: Rc::new(RefCell::new(GuardSlot::new(prompt, config.pending))),
            defaults: config.text,
            replay: config.replay,
        }
    }

    /// Start intercepting transitions. Omitted parts of the prompt fall back
    /// to the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the guard is already armed or the controller
    /// refuses the registration.
    pub fn arm(&self, message: Option<&str>, title: Option<&str>) -> Result<GuardHandle<C>, GuardError> {
        if self.slot.borrow().state == GuardState::Armed {
            return Err(GuardError::AlreadyArmed);
        }

        let text = self.defaults.with_overrides(message, title);
        let id = self.register(&text)?;

        let generation = {
            let mut slot = self.slot.borrow_mut();
            slot.state = GuardState::Armed;
            slot.registration = Some(id);
            slot.generation += 1;
            info!(%id, title = %text.title, "navigation guard armed");
            slot.text = text;
            slot.generation
        };

        Ok(GuardHandle { controller: Rc::clone(&self.controller), slot: Rc::clone(&self.slot), generation })
    }

    /// Release the registration behind `handle`. Same as [`GuardHandle::release`].
    pub fn disarm(&self, handle: &GuardHandle<C>) -> bool {
        handle.release()
    }

    /// Re-register with new prompt text if it differs from the active text.
    /// Returns whether a re-registration happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the new registration is refused. The guard is left
    /// disarmed in that case.
    pub fn update(&self, message: Option<&str>, title: Option<&str>) -> Result<bool, GuardError> {
        let text = self.defaults.with_overrides(message, title);
        let previous = {
            let slot = self.slot.borrow();
            if slot.state != GuardState::Armed || slot.text == text {
                return Ok(false);
            }
            slot.registration
        };

        if let Some(id) = previous {
            self.controller.try_borrow_mut().map_err(|_| GuardError::ControllerBusy)?.unregister_interceptor(id);
        }

        match self.register(&text) {
            Ok(id) => {
                let mut slot = self.slot.borrow_mut();
                info!(%id, title = %text.title, "navigation guard re-armed");
                slot.registration = Some(id);
                slot.text = text;
                Ok(true)
            }
            Err(e) => {
                let mut slot = self.slot.borrow_mut();
                slot.state = GuardState::Disarmed;
                slot.registration = None;
                slot.discard_pending();
                Err(e)
            }
        }
    }

    /// Deliver the user's answer for the pending intent.
    ///
    /// # Errors
    ///
    /// Returns an error if called from inside a transition on the same
    /// controller.
    pub fn resolve(&self, choice: PromptChoice) -> Result<Resolution, GuardError> {
        let Some(intent) = self.slot.borrow().pending.clone() else {
            return Ok(Resolution::NothingPending);
        };

        if choice == PromptChoice::Cancel {
            self.slot.borrow_mut().pending = None;
            info!(transition = %intent, "navigation canceled");
            return Ok(Resolution::Discarded(intent));
        }

        let mut controller = self.controller.try_borrow_mut().map_err(|_| GuardError::ControllerBusy)?;
        let registration = {
            let mut slot = self.slot.borrow_mut();
            slot.pending = None;
            slot.state = GuardState::Disarmed;
            slot.registration.take()
        };
        if let Some(id) = registration {
            controller.unregister_interceptor(id);
        }

        let mut replayed = intent.replay(self.replay);
        let outcome = controller.navigate(replayed.clone());
        if outcome == NavigationOutcome::Applied && matches!(replayed.mode, NavigationMode::Go(_)) {
            replayed.target_path = controller.location();
        }
        info!(requested = %intent, issued = %replayed, ?outcome, "navigation confirmed");
        Ok(Resolution::Committed { intent: replayed, outcome })
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.slot.borrow().state
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.state() == GuardState::Armed
    }

    #[must_use]
    pub fn pending(&self) -> Option<NavigationIntent> {
        self.slot.borrow().pending.clone()
    }

    /// Prompt text of the active registration, or of the last one.
    #[must_use]
    pub fn text(&self) -> PromptText {
        self.slot.borrow().text.clone()
    }

    #[must_use]
    pub fn controller(&self) -> &Rc<RefCell<C>> {
        &self.controller
    }

    fn register(&self, text: &PromptText) -> Result<InterceptorId, GuardError> {
        let interceptor = interceptor(Rc::downgrade(&self.slot), text.clone());
        let id = self
            .controller
            .try_borrow_mut()
            .map_err(|_| GuardError::ControllerBusy)?
            .register_interceptor(interceptor)?;
        Ok(id)
    }
}

fn interceptor(slot: Weak<RefCell<GuardSlot>>, text: PromptText) -> Interceptor {
    Box::new(move |intent: &NavigationIntent| {
        let Some(shared) = slot.upgrade() else {
            return Verdict::Allow;
        };
        let Ok(mut guard_slot) = shared.try_borrow_mut() else {
            warn!(transition = %intent, "guard state busy; blocking transition");
            return Verdict::Block;
        };
        guard_slot.intercept(&text, intent)
    })
}

/// Scoped registration returned by [`NavigationGuard::arm`].
pub struct GuardHandle<C: NavigationController> {
    controller: Rc<RefCell<C>>,
    slot: Rc<RefCell<GuardSlot>>,
    generation: u64,
}

impl<C: NavigationController> GuardHandle<C> {
    /// Whether this handle's registration is still the active one.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let slot = self.slot.borrow();
        slot.generation == self.generation && slot.state == GuardState::Armed
    }

    /// Disarm the guard. Any pending intent is discarded. Returns `false`
    /// if there was nothing left to release.
    pub fn release(&self) -> bool {
        let registration = {
            let Ok(mut slot) = self.slot.try_borrow_mut() else {
                warn!("guard state busy; release skipped");
                return false;
            };
            if slot.generation != self.generation || slot.state == GuardState::Disarmed {
                return false;
            }
            slot.state = GuardState::Disarmed;
            slot.discard_pending();
            slot.registration.take()
        };

        if let Some(id) = registration {
            match self.controller.try_borrow_mut() {
                Ok(mut controller) => {
                    controller.unregister_interceptor(id);
                }
                Err(_) => warn!(%id, "controller busy; interceptor left registered but inert"),
            }
        }
        info!("navigation guard disarmed");
        true
    }
}

impl<C: NavigationController> Drop for GuardHandle<C> {
    fn drop(&mut self) {
        self.release();
    }
}
