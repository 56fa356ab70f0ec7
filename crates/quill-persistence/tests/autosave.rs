//! Integration tests for debounced autosave.
//!
//! Timing tests run on a paused tokio clock, so sleeps advance virtual time
//! deterministically.

use std::sync::Arc;
use std::time::Duration;

use quill_model::{Document, DocumentId};
use quill_persistence::{AutoSaveConfig, AutoSaver, FailurePolicy, PersistenceError};
use quill_store::{InMemoryDocumentStore, StoreCall, StoreError};

fn setup(config: AutoSaveConfig) -> (Arc<InMemoryDocumentStore>, DocumentId, AutoSaver) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let doc = Document::new("Autosave");
    let id = doc.id;
    store.insert(doc);
    let saver = AutoSaver::new(id, store.clone(), config);
    (store, id, saver)
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn offline() -> StoreError {
    StoreError::Unavailable {
        reason: "offline".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_changes_coalesce_into_one_save() {
    let (store, id, saver) = setup(AutoSaveConfig::default());

    for content in ["h", "he", "hel", "hell", "hello"] {
        saver.on_change(content);
        sleep_ms(100).await;
    }
    sleep_ms(1000).await;

    assert_eq!(
        store.call_log().calls(),
        vec![StoreCall::Update {
            id,
            content: "hello".into()
        }]
    );
    let stats = saver.stats();
    assert_eq!(stats.scheduled, 5);
    assert_eq!(stats.cancelled, 4);
    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.succeeded, 1);
    assert!(!saver.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_identical_content_arms_no_extra_timer() {
    let (store, _id, saver) = setup(AutoSaveConfig::default());

    saver.on_change("same");
    saver.on_change("same");
    assert_eq!(saver.stats().scheduled, 1);
    assert_eq!(saver.stats().duplicates, 1);

    sleep_ms(900).await;
    assert_eq!(saver.last_dispatched().as_deref(), Some("same"));

    // Already dispatched: still a no-op.
    saver.on_change("same");
    assert!(!saver.has_pending());
    sleep_ms(900).await;

    assert_eq!(saver.stats().scheduled, 1);
    assert_eq!(saver.stats().duplicates, 2);
    assert_eq!(store.call_log().update_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_save_fires_one_quiet_period_after_last_change() {
    let (store, id, saver) = setup(AutoSaveConfig::default());

    saver.on_change("a");
    sleep_ms(500).await;
    saver.on_change("b");

    sleep_ms(799).await;
    assert!(store.call_log().is_empty());
    assert!(saver.has_pending());

    sleep_ms(2).await;
    let calls = store.call_log().timed_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, 1300);
    assert_eq!(
        calls[0].1,
        StoreCall::Update {
            id,
            content: "b".into()
        }
    );
    assert_eq!(store.snapshot(id).unwrap().content.as_deref(), Some("b"));
}

#[tokio::test(start_paused = true)]
async fn test_custom_quiet_period() {
    let config = AutoSaveConfig::default().with_quiet_period(Duration::from_millis(2000));
    let (store, _id, saver) = setup(config);

    saver.on_change("slow");
    sleep_ms(1500).await;
    assert!(store.call_log().is_empty());
    sleep_ms(600).await;
    assert_eq!(store.call_log().update_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_is_forgotten_by_default() {
    let (store, id, saver) = setup(AutoSaveConfig::default());
    store.fail_next_update(offline());

    saver.on_change("lost");
    sleep_ms(900).await;

    let stats = saver.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(saver.last_dispatched().as_deref(), Some("lost"));
    assert!(saver.is_dirty());
    assert!(store.snapshot(id).unwrap().content.is_none());

    // Same content again is treated as already saved.
    saver.on_change("lost");
    sleep_ms(900).await;
    assert_eq!(store.call_log().update_count(), 1);

    // A distinct edit gets a new attempt.
    saver.on_change("found");
    sleep_ms(900).await;
    assert_eq!(store.call_log().update_count(), 2);
    assert_eq!(store.snapshot(id).unwrap().content.as_deref(), Some("found"));
    assert!(!saver.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_policy_retries_transient_failure() {
    let config = AutoSaveConfig::default().with_failure_policy(FailurePolicy::Rearm);
    let (store, id, saver) = setup(config);
    store.fail_next_update(offline());

    saver.on_change("retry me");
    sleep_ms(900).await;
    assert_eq!(saver.stats().failed, 1);
    assert!(saver.has_pending());
    assert!(saver.last_dispatched().is_none());

    sleep_ms(900).await;
    assert_eq!(store.call_log().update_count(), 2);
    assert_eq!(
        store.snapshot(id).unwrap().content.as_deref(),
        Some("retry me")
    );
    assert!(!saver.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_policy_ignores_permanent_failure() {
    let config = AutoSaveConfig::default().with_failure_policy(FailurePolicy::Rearm);
    let (store, _id, saver) = setup(config);
    store.fail_next_update(StoreError::Rejected {
        operation: "update",
        reason: "too large".into(),
    });

    saver.on_change("huge");
    sleep_ms(3000).await;

    assert_eq!(store.call_log().update_count(), 1);
    assert!(!saver.has_pending());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_yields_to_newer_edit() {
    let config = AutoSaveConfig::default().with_failure_policy(FailurePolicy::Rearm);
    let store = Arc::new(InMemoryDocumentStore::new().with_latency(Duration::from_millis(300)));
    let doc = Document::new("Race");
    let id = doc.id;
    store.insert(doc);
    let saver = AutoSaver::new(id, store.clone(), config);
    store.fail_next_update(offline());

    saver.on_change("old");
    sleep_ms(900).await; // "old" in flight until 1100
    saver.on_change("new");
    sleep_ms(2000).await;

    let contents: Vec<String> = store
        .call_log()
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            StoreCall::Update { content, .. } => Some(content),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec!["old".to_string(), "new".to_string()]);
    assert_eq!(store.snapshot(id).unwrap().content.as_deref(), Some("new"));
}

#[tokio::test(start_paused = true)]
async fn test_change_matching_dispatched_content_keeps_waiting_save() {
    let (store, id, saver) = setup(AutoSaveConfig::default());

    saver.on_change("v1");
    sleep_ms(900).await;
    saver.on_change("v2");
    saver.on_change("v1");
    assert!(saver.has_pending());
    assert!(saver.is_dirty());
    assert_eq!(saver.stats().duplicates, 1);
    assert_eq!(saver.stats().cancelled, 0);

    sleep_ms(900).await;
    let contents: Vec<String> = store
        .call_log()
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            StoreCall::Update { content, .. } => Some(content),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec!["v1".to_string(), "v2".to_string()]);
    assert_eq!(store.snapshot(id).unwrap().content.as_deref(), Some("v2"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_restarts_max_wait_window() {
    let config = AutoSaveConfig::default().with_max_wait(Duration::from_millis(2000));
    let (store, _id, saver) = setup(config);
    store.fail_next_update(offline());

    saver.on_change("a");
    sleep_ms(5000).await;
    assert_eq!(saver.stats().failed, 1);

    saver.on_change("ab");
    sleep_ms(1).await;
    saver.on_change("abc");
    sleep_ms(1).await;
    saver.on_change("abcd");
    sleep_ms(1000).await;

    let calls = store.call_log().timed_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, 800);
    assert_eq!(calls[1].0, 5802);
    assert!(matches!(&calls[1].1, StoreCall::Update { content, .. } if content == "abcd"));
}

#[tokio::test(start_paused = true)]
async fn test_flush_saves_immediately_and_disarms_timer() {
    let (store, id, saver) = setup(AutoSaveConfig::default());

    saver.on_change("now");
    assert!(saver.flush().await.unwrap());
    assert_eq!(store.snapshot(id).unwrap().content.as_deref(), Some("now"));

    sleep_ms(1000).await;
    assert_eq!(store.call_log().update_count(), 1);
    assert!(!saver.flush().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_flush_reports_store_failure() {
    let (store, id, saver) = setup(AutoSaveConfig::default());
    store.fail_next_update(offline());

    saver.on_change("doomed");
    let err = saver.flush().await.unwrap_err();

    match err {
        PersistenceError::Save { id: failed, source } => {
            assert_eq!(failed, id);
            assert!(source.is_transient());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(saver.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_pending_content() {
    let (store, _id, saver) = setup(AutoSaveConfig::default());

    saver.on_change("draft");
    assert_eq!(saver.cancel().as_deref(), Some("draft"));
    sleep_ms(1000).await;

    assert!(store.call_log().is_empty());
    assert!(!saver.is_dirty());
    assert_eq!(saver.stats().cancelled, 1);
    assert!(saver.cancel().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_autosave_waits_for_flush() {
    let (store, _id, saver) = setup(AutoSaveConfig::disabled());

    saver.on_change("manual");
    sleep_ms(5000).await;
    assert!(store.call_log().is_empty());
    assert!(saver.has_pending());
    assert_eq!(saver.stats().scheduled, 0);

    assert!(saver.flush().await.unwrap());
    assert_eq!(store.call_log().update_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_max_wait_interrupts_continuous_typing() {
    let config = AutoSaveConfig::default().with_max_wait(Duration::from_millis(1900));
    let (store, _id, saver) = setup(config);

    for i in 0..5 {
        saver.on_change(format!("edit-{i}"));
        sleep_ms(400).await;
    }

    let calls = store.call_log().timed_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, 1900);
    assert!(matches!(&calls[0].1, StoreCall::Update { content, .. } if content == "edit-4"));
}

#[tokio::test(start_paused = true)]
async fn test_without_max_wait_continuous_typing_defers_save() {
    let (store, _id, saver) = setup(AutoSaveConfig::default());

    for i in 0..5 {
        saver.on_change(format!("edit-{i}"));
        sleep_ms(400).await;
    }

    assert!(store.call_log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_edits_during_in_flight_save_are_saved_next() {
    let store = Arc::new(InMemoryDocumentStore::new().with_latency(Duration::from_millis(500)));
    let doc = Document::new("Slow store");
    let id = doc.id;
    store.insert(doc);
    let saver = AutoSaver::new(id, store.clone(), AutoSaveConfig::default());

    saver.on_change("first");
    sleep_ms(900).await;
    assert!(saver.is_saving());

    saver.on_change("second");
    sleep_ms(1500).await;

    assert_eq!(store.call_log().update_count(), 2);
    assert_eq!(store.snapshot(id).unwrap().content.as_deref(), Some("second"));
    assert!(!saver.is_saving());
    assert!(!saver.is_dirty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_coalescing_on_multi_thread_runtime() {
    let config = AutoSaveConfig::default().with_quiet_period(Duration::from_millis(50));
    let (store, id, saver) = setup(config);

    saver.on_change("x");
    saver.on_change("xy");
    saver.on_change("xyz");
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(
        store.call_log().calls(),
        vec![StoreCall::Update {
            id,
            content: "xyz".into()
        }]
    );
}
