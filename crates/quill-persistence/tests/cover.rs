//! Integration tests for cover image removal.

use std::sync::Arc;

use quill_model::{Document, DocumentId};
use quill_persistence::{CoverController, PersistenceError};
use quill_store::{CallLog, InMemoryDocumentStore, InMemoryFileStorage, StoreCall, StoreError};

const COVER_URL: &str = "https://x/y.png";

struct Fixture {
    log: CallLog,
    store: Arc<InMemoryDocumentStore>,
    files: Arc<InMemoryFileStorage>,
    id: DocumentId,
    controller: CoverController,
}

fn fixture(cover: Option<&str>) -> Fixture {
    let log = CallLog::new();
    let store = Arc::new(InMemoryDocumentStore::new().with_call_log(log.clone()));
    let files = Arc::new(InMemoryFileStorage::new().with_call_log(log.clone()));

    let mut doc = Document::new("Covered");
    if let Some(url) = cover {
        doc = doc.with_cover_image(url);
        files.put(url);
    }
    let id = doc.id;
    store.insert(doc);

    let controller = CoverController::new(id, store.clone(), files.clone());
    Fixture {
        log,
        store,
        files,
        id,
        controller,
    }
}

#[tokio::test]
async fn test_remove_deletes_file_then_clears_association() {
    let f = fixture(Some(COVER_URL));

    f.controller.remove(Some(COVER_URL)).await.unwrap();

    assert_eq!(
        f.log.calls(),
        vec![
            StoreCall::DeleteFile {
                url: COVER_URL.into()
            },
            StoreCall::RemoveCoverImage { id: f.id },
        ]
    );
    assert!(!f.files.contains(COVER_URL));
    assert!(!f.store.snapshot(f.id).unwrap().has_cover());
}

#[tokio::test]
async fn test_remove_without_url_skips_file_storage() {
    let f = fixture(None);

    f.controller.remove(None).await.unwrap();

    assert_eq!(f.log.calls(), vec![StoreCall::RemoveCoverImage { id: f.id }]);
    assert!(f.files.call_log().calls().iter().all(|c| c.operation() != "delete"));
}

#[tokio::test]
async fn test_failed_delete_stops_before_mutation() {
    let f = fixture(Some(COVER_URL));
    f.files.fail_next_delete(StoreError::Unavailable {
        reason: "storage down".into(),
    });

    let err = f.controller.remove(Some(COVER_URL)).await.unwrap_err();

    assert!(matches!(err, PersistenceError::DeleteCover { ref url, .. } if url == COVER_URL));
    assert_eq!(f.log.len(), 1);
    assert!(f.store.snapshot(f.id).unwrap().has_cover());
    assert!(f.files.contains(COVER_URL));
}

#[tokio::test]
async fn test_already_deleted_object_still_clears_association() {
    let f = fixture(Some(COVER_URL));
    f.files.fail_next_delete(StoreError::ObjectNotFound {
        url: COVER_URL.into(),
    });

    f.controller.remove(Some(COVER_URL)).await.unwrap();

    assert_eq!(f.log.len(), 2);
    assert!(!f.store.snapshot(f.id).unwrap().has_cover());
}

#[tokio::test]
async fn test_failed_mutation_is_reported() {
    let f = fixture(Some(COVER_URL));
    f.store.fail_next_remove_cover(StoreError::Rejected {
        operation: "removeCoverImage",
        reason: "forbidden".into(),
    });

    let err = f.controller.remove(Some(COVER_URL)).await.unwrap_err();

    assert!(matches!(err, PersistenceError::RemoveCover { id, .. } if id == f.id));
    // The object is gone but the record still points at it.
    assert!(!f.files.contains(COVER_URL));
    assert_eq!(
        f.store.snapshot(f.id).unwrap().cover_image.as_deref(),
        Some(COVER_URL)
    );
}
