//! Interactive draft-editor session driving a guarded history.
//!
//! DESIGN
//! ======
//! The session stands in for an admin editing page: it arms the guard on
//! start, turns each input line into a navigation command, and while a
//! prompt is open treats the next line as the answer. Leaving the session
//! drops the handle, which is the page teardown.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::str::FromStr;

use tracing::debug;

use crate::config::GuardConfig;
use crate::controller::{NavigationController, NavigationOutcome};
use crate::guard::{GuardError, GuardHandle, NavigationGuard, Resolution};
use crate::history::MemoryHistory;
use crate::intent::NavigationIntent;
use crate::prompt::{PromptChoice, TerminalPrompt};

const HELP: &str = "\
commands:
  push PATH      navigate to PATH, adding an entry
  replace PATH   navigate to PATH, replacing the current entry
  back | forward move one entry
  go N           move N entries
  title TEXT     change the prompt title
  message TEXT   change the prompt message
  arm | disarm   toggle the leave guard
  where          show history
  journal        dump applied transitions as JSON
  quit           leave the editor
while a prompt is open, y confirms; anything else (or an empty line) stays";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid offset: {0}")]
    InvalidOffset(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error("failed to encode journal: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Navigate(NavigationIntent),
    Title(String),
    Message(String),
    Arm,
    Disarm,
    Where,
    Journal,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = |name: &'static str| {
            if rest.is_empty() { Err(SessionError::MissingArgument(name)) } else { Ok(rest.to_owned()) }
        };

        match word {
            "push" => Ok(Self::Navigate(NavigationIntent::push(arg("push")?))),
            "replace" => Ok(Self::Navigate(NavigationIntent::replace(arg("replace")?))),
            "back" => Ok(Self::Navigate(NavigationIntent::go(-1))),
            "forward" => Ok(Self::Navigate(NavigationIntent::go(1))),
            "go" => {
                let raw = arg("go")?;
                let offset = raw.parse::<i32>().map_err(|_| SessionError::InvalidOffset(raw))?;
                Ok(Self::Navigate(NavigationIntent::go(offset)))
            }
            "title" => Ok(Self::Title(arg("title")?)),
            "message" => Ok(Self::Message(arg("message")?)),
            "arm" => Ok(Self::Arm),
            "disarm" => Ok(Self::Disarm),
            "where" => Ok(Self::Where),
            "journal" => Ok(Self::Journal),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(SessionError::UnknownCommand(other.to_owned())),
        }
    }
}

pub struct Session<W: Write + 'static> {
    out: Rc<RefCell<W>>,
    guard: NavigationGuard<MemoryHistory>,
    handle: Option<GuardHandle<MemoryHistory>>,
    title: Option<String>,
    message: Option<String>,
}

impl<W: Write + 'static> Session<W> {
    /// Open an editor at `start_path` with the guard armed.
    ///
    /// # Errors
    ///
    /// Returns an error if the guard cannot be armed.
    pub fn new(start_path: &str, config: GuardConfig, out: Rc<RefCell<W>>) -> Result<Self, GuardError> {
        let history = Rc::new(RefCell::new(MemoryHistory::new(start_path)));
        let prompt = TerminalPrompt::new(Rc::clone(&out));
        let guard = NavigationGuard::new(history, Box::new(prompt), config);
        let handle = guard.arm(None, None)?;
        Ok(Self { out, guard, handle: Some(handle), title: None, message: None })
    }

    #[must_use]
    pub fn guard(&self) -> &NavigationGuard<MemoryHistory> {
        &self.guard
    }

    /// Process input until `quit` or end of input, then tear the guard down.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a guard integration error.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), SessionError> {
        for line in input.lines() {
            let line = line?;
            if self.guard.pending().is_some() {
                self.answer(PromptChoice::from_answer(&line))?;
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(e @ (SessionError::UnknownCommand(_) | SessionError::MissingArgument(_) | SessionError::InvalidOffset(_))) => {
                    self.say(format_args!("error: {e}"))?;
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(handle) = self.handle.take() {
            self.guard.disarm(&handle);
        }
        Ok(())
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a guard integration error.
    pub fn execute(&mut self, command: Command) -> Result<(), SessionError> {
        debug!(?command, "session command");
        match command {
            Command::Navigate(intent) => {
                let outcome = self.guard.controller().borrow_mut().navigate(intent);
                match outcome {
                    NavigationOutcome::Applied => self.report_location()?,
                    NavigationOutcome::Blocked => {}
                    NavigationOutcome::OutOfRange => self.say("nothing there")?,
                }
            }
            Command::Title(title) => {
                self.title = Some(title);
                self.refresh_prompt()?;
            }
            Command::Message(message) => {
                self.message = Some(message);
                self.refresh_prompt()?;
            }
            Command::Arm => {
                if self.guard.is_armed() {
                    self.say("guard already armed")?;
                } else {
                    self.handle = None;
                    self.handle = Some(self.guard.arm(self.message.as_deref(), self.title.as_deref())?);
                    self.say("guard armed")?;
                }
            }
            Command::Disarm => {
                if let Some(handle) = self.handle.take() {
                    self.guard.disarm(&handle);
                }
                self.say("guard disarmed")?;
            }
            Command::Where => {
                let listing = {
                    let history = self.guard.controller().borrow();
                    history
                        .entries()
                        .iter()
                        .enumerate()
                        .map(|(i, path)| if i == history.cursor() { format!("> {path}") } else { format!("  {path}") })
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                self.say(listing)?;
            }
            Command::Journal => {
                let json = serde_json::to_string_pretty(self.guard.controller().borrow().journal())?;
                self.say(json)?;
            }
            Command::Help => self.say(HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn answer(&mut self, choice: PromptChoice) -> Result<(), SessionError> {
        match self.guard.resolve(choice)? {
            Resolution::Committed { outcome: NavigationOutcome::Applied, .. } => self.report_location()?,
            Resolution::Committed { .. } => self.say("nothing there")?,
            Resolution::Discarded(_) => self.say("staying here")?,
            Resolution::NothingPending => {}
        }
        Ok(())
    }

    fn refresh_prompt(&mut self) -> Result<(), SessionError> {
        if self.guard.update(self.message.as_deref(), self.title.as_deref())? {
            self.say("prompt updated")?;
        }
        Ok(())
    }

    fn report_location(&self) -> io::Result<()> {
        let current = self.guard.controller().borrow().current().to_owned();
        self.say(format_args!("at {current}"))
    }

    fn say(&self, text: impl std::fmt::Display) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "{text}")?;
        out.flush()
    }
}
