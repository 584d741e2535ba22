//! Guard configuration from environment variables or a JSON document.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::intent::ReplayPolicy;
use crate::prompt::PromptText;
use crate::state::PendingPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Prompt text used when `arm`/`update` omit a part.
    pub text: PromptText,
    pub pending: PendingPolicy,
    pub replay: ReplayPolicy,
}

impl GuardConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `ROUTEGUARD_TITLE`: default prompt title
    /// - `ROUTEGUARD_MESSAGE`: default prompt message
    /// - `ROUTEGUARD_PENDING_POLICY`: `reject` (default) or `supersede`
    /// - `ROUTEGUARD_REPLAY_POLICY`: `step_forward` (default) or `preserve_offset`
    ///
    /// # Errors
    ///
    /// Returns an error if a policy variable holds an unknown value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let text = PromptText::default()
            .with_overrides(env_value("ROUTEGUARD_MESSAGE").as_deref(), env_value("ROUTEGUARD_TITLE").as_deref());
        let pending = parse_pending(env_value("ROUTEGUARD_PENDING_POLICY").as_deref())?;
        let replay = parse_replay(env_value("ROUTEGUARD_REPLAY_POLICY").as_deref())?;
        Ok(Self { text, pending, replay })
    }

    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this shape.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_pending(raw: Option<&str>) -> Result<PendingPolicy, ConfigError> {
    match raw.unwrap_or("reject") {
        "reject" => Ok(PendingPolicy::Reject),
        "supersede" => Ok(PendingPolicy::Supersede),
        other => Err(ConfigError::Parse(format!(
            "unknown ROUTEGUARD_PENDING_POLICY '{other}' (expected 'reject' or 'supersede')"
        ))),
    }
}

fn parse_replay(raw: Option<&str>) -> Result<ReplayPolicy, ConfigError> {
    match raw.unwrap_or("step_forward") {
        "step_forward" => Ok(ReplayPolicy::StepForward),
        "preserve_offset" => Ok(ReplayPolicy::PreserveOffset),
        other => Err(ConfigError::Parse(format!(
            "unknown ROUTEGUARD_REPLAY_POLICY '{other}' (expected 'step_forward' or 'preserve_offset')"
        ))),
    }
}
