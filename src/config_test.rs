use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `lock_env()` so no other test touches the environment.
unsafe fn clear_guard_env() {
    unsafe {
        std::env::remove_var("ROUTEGUARD_TITLE");
        std::env::remove_var("ROUTEGUARD_MESSAGE");
        std::env::remove_var("ROUTEGUARD_PENDING_POLICY");
        std::env::remove_var("ROUTEGUARD_REPLAY_POLICY");
    }
}

// =============================================================
// from_env
// =============================================================

#[test]
fn from_env_uses_defaults_when_unset() {
    let _env = lock_env();
    unsafe { clear_guard_env() };

    let cfg = GuardConfig::from_env().unwrap();
    assert_eq!(cfg, GuardConfig::default());
    assert_eq!(cfg.text, PromptText::default());
    assert_eq!(cfg.pending, PendingPolicy::Reject);
    assert_eq!(cfg.replay, ReplayPolicy::StepForward);
}

#[test]
fn from_env_parses_overrides() {
    let _env = lock_env();
    unsafe {
        clear_guard_env();
        std::env::set_var("ROUTEGUARD_TITLE", "保存提示");
        std::env::set_var("ROUTEGUARD_MESSAGE", "草稿还没保存");
        std::env::set_var("ROUTEGUARD_PENDING_POLICY", "supersede");
        std::env::set_var("ROUTEGUARD_REPLAY_POLICY", "preserve_offset");
    }

    let cfg = GuardConfig::from_env().unwrap();
    assert_eq!(cfg.text.title, "保存提示");
    assert_eq!(cfg.text.message, "草稿还没保存");
    assert_eq!(cfg.pending, PendingPolicy::Supersede);
    assert_eq!(cfg.replay, ReplayPolicy::PreserveOffset);

    unsafe { clear_guard_env() };
}

#[test]
fn from_env_ignores_blank_text() {
    let _env = lock_env();
    unsafe {
        clear_guard_env();
        std::env::set_var("ROUTEGUARD_TITLE", "   ");
    }

    let cfg = GuardConfig::from_env().unwrap();
    assert_eq!(cfg.text.title, crate::prompt::DEFAULT_TITLE);

    unsafe { clear_guard_env() };
}

// =============================================================
// Policy parsing
// =============================================================

#[test]
fn parse_pending_rejects_unknown_value() {
    let err = parse_pending(Some("queue")).unwrap_err();
    assert!(err.to_string().contains("queue"));
}

#[test]
fn parse_replay_rejects_unknown_value() {
    let err = parse_replay(Some("go_back")).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn parse_policies_default_when_absent() {
    assert_eq!(parse_pending(None).unwrap(), PendingPolicy::Reject);
    assert_eq!(parse_replay(None).unwrap(), ReplayPolicy::StepForward);
}

// =============================================================
// from_json
// =============================================================

#[test]
fn from_json_fills_missing_fields() {
    let cfg = GuardConfig::from_json(r#"{ "text": { "title": "保存提示" } }"#).unwrap();
    assert_eq!(cfg.text.title, "保存提示");
    assert_eq!(cfg.text.message, crate::prompt::DEFAULT_MESSAGE);
    assert_eq!(cfg.pending, PendingPolicy::Reject);
}

#[test]
fn from_json_parses_policies() {
    let cfg = GuardConfig::from_json(r#"{ "pending": "supersede", "replay": "preserve_offset" }"#).unwrap();
    assert_eq!(cfg.pending, PendingPolicy::Supersede);
    assert_eq!(cfg.replay, ReplayPolicy::PreserveOffset);
}

#[test]
fn from_json_rejects_unknown_policy() {
    let err = GuardConfig::from_json(r#"{ "pending": "queue" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}
