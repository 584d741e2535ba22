//! In-memory history stack implementing [`NavigationController`].
//!
//! DESIGN
//! ======
//! Behaves like a browser history object: a list of entries, a cursor, and
//! a single blocking slot. Push drops any forward entries, replace
//! overwrites the current entry, and relative moves outside the list are
//! ignored without consulting the interceptor. Every applied transition is
//! journaled so callers can assert on exactly what happened.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::{debug, trace};

use crate::controller::{Interceptor, InterceptorId, NavigationController, NavigationError, NavigationOutcome, Verdict};
use crate::intent::{NavigationIntent, NavigationMode};

pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    slot: Option<(InterceptorId, Interceptor)>,
    journal: Vec<NavigationIntent>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self { entries: vec![initial_path.into()], cursor: 0, slot: None, journal: Vec::new() }
    }

    /// Path of the current entry.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Every transition applied so far, in order.
    #[must_use]
    pub fn journal(&self) -> &[NavigationIntent] {
        &self.journal
    }

    #[must_use]
    pub fn is_intercepted(&self) -> bool {
        self.slot.is_some()
    }

    fn offset_index(&self, offset: i32) -> Option<usize> {
        let index = self.cursor.checked_add_signed(offset as isize)?;
        (index < self.entries.len()).then_some(index)
    }

    fn apply(&mut self, intent: NavigationIntent) {
        match intent.mode {
            NavigationMode::Push => {
                self.entries.truncate(self.cursor + 1);
                self.entries.push(intent.target_path.clone());
                self.cursor = self.entries.len() - 1;
            }
            NavigationMode::Replace => {
                self.entries[self.cursor].clone_from(&intent.target_path);
            }
            NavigationMode::Go(offset) => {
                if let Some(index) = self.offset_index(offset) {
                    self.cursor = index;
                }
            }
        }
        debug!(transition = %intent, current = %self.current(), "history transition applied");
        self.journal.push(intent);
    }
}

impl NavigationController for MemoryHistory {
    fn location(&self) -> String {
        self.current().to_owned()
    }

    fn register_interceptor(&mut self, interceptor: Interceptor) -> Result<InterceptorId, NavigationError> {
        if let Some((holder, _)) = &self.slot {
            return Err(NavigationError::SlotOccupied { holder: *holder });
        }
        let id = InterceptorId::new();
        self.slot = Some((id, interceptor));
        trace!(%id, "interceptor registered");
        Ok(id)
    }

    fn unregister_interceptor(&mut self, id: InterceptorId) -> bool {
        match &self.slot {
            Some((holder, _)) if *holder == id => {
                self.slot = None;
                trace!(%id, "interceptor unregistered");
                true
            }
            _ => false,
        }
    }

    fn navigate(&mut self, intent: NavigationIntent) -> NavigationOutcome {
        let intent = match intent.mode {
            NavigationMode::Go(offset) => {
                let Some(index) = self.offset_index(offset) else {
                    debug!(offset, cursor = self.cursor, "relative move out of range");
                    return NavigationOutcome::OutOfRange;
                };
                NavigationIntent { target_path: self.entries[index].clone(), mode: intent.mode }
            }
            NavigationMode::Push | NavigationMode::Replace => intent,
        };

        if let Some((_, interceptor)) = self.slot.as_mut() {
            if interceptor(&intent) == Verdict::Block {
                debug!(transition = %intent, "transition blocked by interceptor");
                return NavigationOutcome::Blocked;
            }
        }

        self.apply(intent);
        NavigationOutcome::Applied
    }
}
