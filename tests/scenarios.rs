//! End-to-end leave-confirmation scenarios against the public API.

use std::cell::RefCell;
use std::rc::Rc;

use routeguard::prompt::RecordingPrompt;
use routeguard::{
    GuardConfig, MemoryHistory, NavigationController, NavigationGuard, NavigationIntent, NavigationMode,
    NavigationOutcome, PromptChoice, PromptText,
};

fn editor(path: &str) -> (Rc<RefCell<MemoryHistory>>, NavigationGuard<MemoryHistory>, RecordingPrompt) {
    let history = Rc::new(RefCell::new(MemoryHistory::new(path)));
    let prompt = RecordingPrompt::default();
    let guard = NavigationGuard::new(Rc::clone(&history), Box::new(prompt.clone()), GuardConfig::default());
    (history, guard, prompt)
}

#[test]
fn default_prompt_confirm_push_navigates_exactly_once() {
    let (history, guard, prompt) = editor("/admin/article/add");
    let _handle = guard.arm(None, None).unwrap();

    assert_eq!(history.borrow_mut().navigate(NavigationIntent::push("/home")), NavigationOutcome::Blocked);
    let shown = prompt.last().unwrap();
    assert_eq!(shown.title, "提示");
    assert_eq!(shown.content, "确定要离开当前页面吗？请确认数据已保存。");

    guard.resolve(PromptChoice::Confirm).unwrap();
    assert_eq!(history.borrow().journal(), [NavigationIntent::push("/home")]);

    history.borrow_mut().navigate(NavigationIntent::push("/elsewhere"));
    assert_eq!(prompt.shown_count(), 1);
}

#[test]
fn custom_title_cancel_then_retry_prompts_again() {
    let (history, guard, prompt) = editor("/admin/config");
    let _handle = guard.arm(None, Some("保存提示")).unwrap();

    history.borrow_mut().navigate(NavigationIntent::replace("/list"));
    guard.resolve(PromptChoice::Cancel).unwrap();
    assert!(history.borrow().journal().is_empty());
    assert_eq!(history.borrow().current(), "/admin/config");
    assert!(guard.is_armed());

    assert_eq!(history.borrow_mut().navigate(NavigationIntent::push("/other")), NavigationOutcome::Blocked);
    assert_eq!(prompt.shown_count(), 2);
    assert_eq!(prompt.last().unwrap().title, "保存提示");
}

#[test]
fn prompt_always_reflects_latest_text() {
    let (history, guard, prompt) = editor("/admin/article/add");
    let _handle = guard.arm(None, None).unwrap();

    let pairs = [("标题一", "内容一"), ("标题二", "内容二"), ("标题二", "内容三")];
    for (title, message) in pairs {
        guard.update(Some(message), Some(title)).unwrap();
        history.borrow_mut().navigate(NavigationIntent::push("/home"));
        assert_eq!(prompt.last().unwrap().title, title);
        assert_eq!(prompt.last().unwrap().content, message);
        guard.resolve(PromptChoice::Cancel).unwrap();
    }
    assert_eq!(guard.text(), PromptText { title: "标题二".into(), message: "内容三".into() });
}

#[test]
fn any_relative_move_commits_as_single_step_forward() {
    for offset in [-1, 1] {
        let (history, guard, _) = editor("/a");
        {
            let mut history = history.borrow_mut();
            history.navigate(NavigationIntent::push("/b"));
            history.navigate(NavigationIntent::push("/c"));
            history.navigate(NavigationIntent::go(-1));
        }
        let applied_before = history.borrow().journal().len();
        let _handle = guard.arm(None, None).unwrap();

        history.borrow_mut().navigate(NavigationIntent::go(offset));
        guard.resolve(PromptChoice::Confirm).unwrap();

        let history = history.borrow();
        assert_eq!(history.journal().len(), applied_before + 1);
        assert_eq!(history.journal().last().unwrap().mode, NavigationMode::Go(1));
        assert_eq!(history.current(), "/c");
    }
}

#[test]
fn teardown_lets_transitions_through() {
    let (history, guard, prompt) = editor("/admin/moment/edit");
    let handle = guard.arm(None, None).unwrap();
    assert!(guard.disarm(&handle));
    assert!(!guard.disarm(&handle));
    drop(handle);

    assert_eq!(history.borrow_mut().navigate(NavigationIntent::push("/home")), NavigationOutcome::Applied);
    assert_eq!(prompt.shown_count(), 0);
    assert!(!history.borrow().is_intercepted());
}
