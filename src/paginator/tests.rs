//! Tests for paginator module

use super::*;
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::events::{FetchEvent, MemorySink, NullSink};
use crate::retry::RetryLadder;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;
use tokio::time::Instant;

/// Scripted batch source; once the script runs out every call fails with a
/// connection error
struct Script {
    responses: Mutex<VecDeque<Result<Page<&'static str>>>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl Script {
    fn new(responses: Vec<Result<Page<&'static str>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    async fn fetch(&self, cursor: Option<String>) -> Result<Page<&'static str>> {
        self.cursors.lock().unwrap().push(cursor);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::connection("refused")))
    }

    fn calls(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }

    fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

fn page(items: &[&'static str], token: &str) -> Result<Page<&'static str>> {
    Ok(Page::new(items.to_vec(), PageToken::token(token)))
}

fn paginator() -> Paginator {
    Paginator::new(RetryLadder::default()).with_sink(Arc::new(NullSink))
}

// ============================================================================
// Token and Termination Tests
// ============================================================================

#[test_case("-end-", true ; "plain marker")]
#[test_case("%22-end-%22", true ; "percent escaped marker")]
#[test_case("\"-end-\"", true ; "quoted marker")]
#[test_case("Y2JVSG81V2sxcmNH", false ; "opaque bookmark")]
#[test_case("", true ; "empty bookmark")]
#[test_case("%22%22", true ; "quoted empty bookmark")]
#[test_case("  ", true ; "blank bookmark")]
fn test_end_marker_rule(token: &str, expected: bool) {
    let rule = Termination::end_marker();
    assert_eq!(rule.is_end(&PageToken::token(token)), expected);
}

#[test_case(PageToken::token("abc"), false ; "present token")]
#[test_case(PageToken::token(""), true ; "empty token")]
#[test_case(PageToken::Absent, true ; "null token")]
#[test_case(PageToken::Missing, true ; "missing token")]
fn test_absent_token_rule(token: PageToken, expected: bool) {
    assert_eq!(Termination::AbsentToken.is_end(&token), expected);
}

#[test_case(PageToken::token("abc"), false ; "present bookmark")]
#[test_case(PageToken::token(""), true ; "empty bookmark")]
#[test_case(PageToken::token("-end-"), true ; "end marker bookmark")]
#[test_case(PageToken::Absent, true ; "null bookmark")]
#[test_case(PageToken::Missing, true ; "missing bookmark")]
fn test_missing_field_rule(token: PageToken, expected: bool) {
    assert_eq!(Termination::MissingField.is_end(&token), expected);
}

#[test]
fn test_page_token_from_value() {
    assert_eq!(PageToken::from_value(None), PageToken::Missing);
    assert_eq!(PageToken::from_value(Some(&json!(null))), PageToken::Absent);
    assert_eq!(
        PageToken::from_value(Some(&json!("abc"))),
        PageToken::token("abc")
    );
    assert_eq!(PageToken::from_value(Some(&json!(12))), PageToken::token("12"));
}

#[test]
fn test_canonical_token() {
    assert_eq!(canonical_token("%22-end-%22"), "-end-");
    assert_eq!(canonical_token("\"-end-\""), "-end-");
    assert_eq!(canonical_token("-end-"), "-end-");
    assert_eq!(canonical_token("%22abc"), "%22abc");
}

#[test]
fn test_termination_serde() {
    let rule: Termination = serde_json::from_value(json!({"type": "absent_token"})).unwrap();
    assert_eq!(rule, Termination::AbsentToken);

    let rule: Termination =
        serde_json::from_value(json!({"type": "end_marker", "marker": "-end-"})).unwrap();
    assert_eq!(rule, Termination::end_marker());
}

// ============================================================================
// State Tests
// ============================================================================

#[test]
fn test_state_advance_with_dedupe() {
    let mut state = PaginationState::new();
    assert_eq!(state.cursor(), None);

    let added = state.advance(
        Page::new(vec!["a", "b"], PageToken::token("t1")),
        |s: &&str| Some(s.to_string()),
    );
    assert_eq!(added, 2);
    assert_eq!(state.cursor(), Some("t1"));

    let added = state.advance(
        Page::new(vec!["b", "c"], PageToken::Absent),
        |s: &&str| Some(s.to_string()),
    );
    assert_eq!(added, 1);
    assert_eq!(state.items, vec!["a", "b", "c"]);
    assert_eq!(state.pages, 2);
    assert_eq!(state.cursor(), None);
}

#[test]
fn test_state_keeps_duplicates_without_key() {
    let mut state = PaginationState::new();
    state.advance(Page::new(vec!["a"], PageToken::token("t")), |_| None);
    state.advance(Page::new(vec!["a"], PageToken::token("t")), |_| None);
    assert_eq!(state.items, vec!["a", "a"]);
}

#[test]
fn test_outcome_map() {
    let outcome = RunOutcome {
        items: vec![1, 2],
        status: RunStatus::Completed,
        pages: 1,
        error: None,
    };
    let mapped = outcome.map(|n| n * 10);
    assert_eq!(mapped.items, vec![10, 20]);
    assert!(mapped.is_complete());
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_concatenates_batches_until_end_marker() {
    let script = Script::new(vec![
        page(&["a", "b"], "t1"),
        page(&["c"], "t2"),
        page(&[], "-end-"),
    ]);

    let outcome = paginator()
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b", "c"]);
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.pages, 3);
    assert!(outcome.error.is_none());
    assert_eq!(script.calls(), 3);
    assert_eq!(
        script.cursors(),
        vec![None, Some("t1".to_string()), Some("t2".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_end_marker_with_final_batch() {
    let script = Script::new(vec![page(&["a", "b"], "t1"), page(&["c"], "%22-end-%22")]);

    let outcome = paginator()
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b", "c"]);
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(script.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch_continues() {
    let script = Script::new(vec![page(&[], "t1"), page(&["x"], "-end-")]);

    let outcome = paginator()
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["x"]);
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(script.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_absent_token_terminates() {
    let script = Script::new(vec![
        page(&["a"], "cursor-1"),
        Ok(Page::new(vec!["b"], PageToken::Absent)),
    ]);

    let outcome = paginator()
        .run("pin 9", &Termination::AbsentToken, |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b"]);
    assert!(outcome.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_missing_field_terminates() {
    let script = Script::new(vec![
        page(&["a"], "bm"),
        Ok(Page::new(vec!["b"], PageToken::Missing)),
    ]);

    let outcome = paginator()
        .run("search cats", &Termination::MissingField, |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b"]);
    assert!(outcome.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_keep_partial_items() {
    let sink = Arc::new(MemorySink::new());
    let script = Script::new(vec![page(&["a"], "t1")]);
    let start = Instant::now();

    let outcome = Paginator::new(RetryLadder::default())
        .with_sink(sink.clone())
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a"]);
    assert_eq!(outcome.status, RunStatus::PartialAborted);
    assert!(matches!(
        outcome.error,
        Some(Error::RetryExhausted { attempts: 5, .. })
    ));
    // one successful call, then the full ladder on call 2
    assert_eq!(script.calls(), 6);
    assert_eq!(start.elapsed(), Duration::from_secs(135));

    assert_eq!(sink.count(FetchEvent::is_retry), 4);
    assert_eq!(
        sink.count(|e| matches!(e, FetchEvent::FetchFailed { total: 1, .. })),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_failure_on_kth_call_stops_further_calls() {
    let script = Script::new(vec![
        page(&["a"], "t1"),
        page(&["b"], "t2"),
        Err(Error::parse("resource_response.data", "missing")),
        page(&["never"], "-end-"),
    ]);

    let outcome = paginator()
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b"]);
    assert_eq!(outcome.status, RunStatus::PartialAborted);
    assert!(matches!(outcome.error, Some(Error::Parse { .. })));
    assert_eq!(script.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start() {
    let cancel = Cancellation::new();
    cancel.cancel();
    let script = Script::new(vec![page(&["a"], "-end-")]);

    let outcome = paginator()
        .with_cancellation(cancel)
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert_eq!(script.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_during_backoff_returns_partial() {
    let cancel = Cancellation::new().with_timeout(Duration::from_secs(60));
    let script = Script::new(vec![page(&["a"], "t1")]);

    let outcome = paginator()
        .with_cancellation(cancel)
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a"]);
    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert!(outcome.error.as_ref().is_some_and(Error::is_cancelled));
}

#[tokio::test(start_paused = true)]
async fn test_empty_bookmark_ends_run_without_repeat() {
    let script = Script::new(vec![page(&["a"], "t1"), page(&["b"], ""), page(&["b"], "")]);

    let outcome = paginator()
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b"]);
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(script.calls(), 2);
    assert_eq!(script.cursors(), vec![None, Some("t1".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_max_pages_guard() {
    let script = Script::new(vec![
        page(&["a"], "t1"),
        page(&["b"], "t2"),
        page(&["c"], "t3"),
    ]);

    let outcome = paginator()
        .with_max_pages(2)
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    assert_eq!(outcome.items, vec!["a", "b"]);
    assert_eq!(outcome.status, RunStatus::PartialAborted);
    assert!(matches!(
        outcome.error,
        Some(Error::PageLimit { max_pages: 2, .. })
    ));
    assert_eq!(script.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_run_events_sequence() {
    let sink = Arc::new(MemorySink::new());
    let script = Script::new(vec![page(&["a"], "-end-")]);

    Paginator::default()
        .with_sink(sink.clone())
        .run("board 1", &Termination::end_marker(), |c| script.fetch(c))
        .await;

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], FetchEvent::RunStarted { .. }));
    assert!(matches!(
        events[1],
        FetchEvent::PageFetched {
            page: 1,
            batch_len: 1,
            total: 1,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        FetchEvent::RunFinished {
            status: RunStatus::Completed,
            ..
        }
    ));
}
