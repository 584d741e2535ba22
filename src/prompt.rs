//! Confirmation prompt capability.
//!
//! DESIGN
//! ======
//! A prompt only displays a request. The user's answer comes back later
//! through `NavigationGuard::resolve`, so `show` never re-enters the guard
//! and a pending intent can stay parked for as long as the user takes.

#[cfg(test)]
#[path = "prompt_test.rs"]
mod prompt_test;

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_TITLE: &str = "提示";
pub const DEFAULT_MESSAGE: &str = "确定要离开当前页面吗？请确认数据已保存。";
pub const CONFIRM_LABEL: &str = "好！";
pub const CANCEL_LABEL: &str = "不要啦，我再看看";

/// Title and body shown when a transition is intercepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptText {
    pub title: String,
    pub message: String,
}

impl Default for PromptText {
    fn default() -> Self {
        Self { title: DEFAULT_TITLE.to_owned(), message: DEFAULT_MESSAGE.to_owned() }
    }
}

impl PromptText {
    /// Overlay the provided parts on `self`; omitted parts keep their value.
    #[must_use]
    pub fn with_overrides(&self, message: Option<&str>, title: Option<&str>) -> Self {
        Self {
            title: title.map_or_else(|| self.title.clone(), str::to_owned),
            message: message.map_or_else(|| self.message.clone(), str::to_owned),
        }
    }
}

/// A modal confirmation with two labeled actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub content: String,
    pub ok_text: String,
    pub cancel_text: String,
}

impl From<&PromptText> for ConfirmRequest {
    fn from(text: &PromptText) -> Self {
        Self {
            title: text.title.clone(),
            content: text.message.clone(),
            ok_text: CONFIRM_LABEL.to_owned(),
            cancel_text: CANCEL_LABEL.to_owned(),
        }
    }
}

/// Which action the user took. Dismissing the prompt counts as `Cancel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptChoice {
    Confirm,
    Cancel,
}

impl PromptChoice {
    /// Interpret a typed answer. Only explicit agreement confirms.
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" | "ok" | "好" | "好！" => Self::Confirm,
            _ => Self::Cancel,
        }
    }
}

pub trait ConfirmationPrompt {
    /// Display `request`. Must not call back into the guard.
    fn show(&mut self, request: ConfirmRequest);

    /// Take down a prompt that no longer has a pending intent behind it.
    fn close(&mut self) {}
}

// =============================================================================
// RECORDING PROMPT
// =============================================================================

#[derive(Debug, Default)]
struct Recorded {
    shown: Vec<ConfirmRequest>,
    closed: usize,
}

/// Prompt that remembers every request. Clones share the same record, so a
/// test can hand one clone to the guard and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingPrompt {
    inner: Rc<RefCell<Recorded>>,
}

impl RecordingPrompt {
    #[must_use]
    pub fn shown(&self) -> Vec<ConfirmRequest> {
        self.inner.borrow().shown.clone()
    }

    #[must_use]
    pub fn shown_count(&self) -> usize {
        self.inner.borrow().shown.len()
    }

    #[must_use]
    pub fn last(&self) -> Option<ConfirmRequest> {
        self.inner.borrow().shown.last().cloned()
    }

    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.inner.borrow().closed
    }
}

impl ConfirmationPrompt for RecordingPrompt {
    fn show(&mut self, request: ConfirmRequest) {
        self.inner.borrow_mut().shown.push(request);
    }

    fn close(&mut self) {
        self.inner.borrow_mut().closed += 1;
    }
}

// =============================================================================
// TERMINAL PROMPT
// =============================================================================

/// Render a request as the block of text the terminal prompt prints.
#[must_use]
pub fn render(request: &ConfirmRequest) -> String {
    format!(
        "[{}] {}\n  y) {}\n  n) {}\n",
        request.title, request.content, request.ok_text, request.cancel_text
    )
}

/// Prompt that prints to a shared writer. The answer is read by whoever owns
/// the input stream and fed back through `NavigationGuard::resolve`.
pub struct TerminalPrompt<W: Write> {
    out: Rc<RefCell<W>>,
}

impl<W: Write> TerminalPrompt<W> {
    #[must_use]
    pub fn new(out: Rc<RefCell<W>>) -> Self {
        Self { out }
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write prompt");
        }
    }
}

impl<W: Write> ConfirmationPrompt for TerminalPrompt<W> {
    fn show(&mut self, request: ConfirmRequest) {
        self.emit(&render(&request));
    }

    fn close(&mut self) {
        self.emit("(prompt closed)\n");
    }
}
