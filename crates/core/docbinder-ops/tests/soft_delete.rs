//! Soft delete and restore through the operations layer.

use docbinder_extract::ExtractionError;
use docbinder_index::{DeletedFilter, SearchQuery};
use docbinder_ops::OpsError;
use docbinder_store::{BlobStore, DocumentFilter, DocumentStore};
use docbinder_test_utils::{create_test_env, file_input, hyperlink_input};
use docbinder_types::DocumentState;
use docbinder_valid::DocumentInput;

#[tokio::test]
async fn test_delete_then_restore_visibility() {
    let mut env = create_test_env();
    let john = env.fixtures.john.clone();
    let admin = env.fixtures.admin.clone();
    let doc = env
        .ops
        .create_document(
            &john,
            hyperlink_input(env.fixtures.report(), "Budget 2012", "http://example.org/b"),
        )
        .await
        .unwrap();

    let active = || SearchQuery::new("Budget");
    let deleted_only = || SearchQuery::new("Budget").with_deleted(DeletedFilter::Deleted);

    // 1. Delete
    let deleted = env.ops.delete_document(&admin, doc.id).await.unwrap();
    assert_eq!(deleted.state, DocumentState::Deleted);
    assert!(env.ops.search(&admin, active()).unwrap().is_empty());
    let hits = env.ops.search(&admin, deleted_only()).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].deleted);
    assert_eq!(env.ops.index.count_entries(doc.id).unwrap(), 1);

    // The row is still there
    let stored = env.ops.state.documents.load(doc.id).unwrap().unwrap();
    assert!(stored.deleted());

    // 2. Restore by editing the flag
    let mut edit = DocumentInput::from_document(&stored);
    edit.deleted = Some(false);
    let restored = env.ops.update_document(&admin, doc.id, edit).await.unwrap();
    assert_eq!(restored.state, DocumentState::Active);
    assert_eq!(env.ops.search(&admin, active()).unwrap().len(), 1);
    assert!(env.ops.search(&admin, deleted_only()).unwrap().is_empty());
    assert_eq!(env.ops.index.count_entries(doc.id).unwrap(), 1);
}

#[tokio::test]
async fn test_delete_twice_is_invalid_transition() {
    let mut env = create_test_env();
    let john = env.fixtures.john.clone();
    let doc = env
        .ops
        .create_document(
            &john,
            hyperlink_input(env.fixtures.report(), "Once", "http://example.org/once"),
        )
        .await
        .unwrap();

    env.ops.delete_document(&john, doc.id).await.unwrap();
    let err = env.ops.delete_document(&john, doc.id).await.unwrap_err();
    assert!(matches!(err, OpsError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_delete_keeps_file_and_runs_hooks() {
    let mut env = create_test_env();
    let john = env.fixtures.john.clone();
    let doc = env
        .ops
        .create_document(&john, file_input(env.fixtures.report(), "memo.txt", b"memo"))
        .await
        .unwrap();
    let file = doc.file.clone().unwrap();
    env.extractor.reset_calls();

    // a save that fails validation leaves the document active
    env.extractor
        .set_fail_all(Some(ExtractionError::conversion("text", "unreadable")));
    let err = env.ops.delete_document(&john, doc.id).await.unwrap_err();
    assert!(err.is_validation());
    assert!(!env.ops.state.documents.load(doc.id).unwrap().unwrap().deleted());

    env.extractor.set_fail_all(None);
    let deleted = env.ops.delete_document(&john, doc.id).await.unwrap();
    assert!(deleted.deleted());
    assert_eq!(deleted.file, Some(file.clone()));
    assert!(env.ops.state.blobs.exists(&file));
    assert_eq!(env.extractor.calls(), vec!["memo.txt", "memo.txt"]);
}

#[tokio::test]
async fn test_deleted_documents_leave_active_listing() {
    let mut env = create_test_env();
    let john = env.fixtures.john.clone();
    let report = env.fixtures.report().clone();
    let keep = env
        .ops
        .create_document(&john, hyperlink_input(&report, "Keep", "http://example.org/k"))
        .await
        .unwrap();
    let gone = env
        .ops
        .create_document(&john, hyperlink_input(&report, "Gone", "http://example.org/g"))
        .await
        .unwrap();
    env.ops.delete_document(&john, gone.id).await.unwrap();

    let active = env.ops.list_documents(&john, DocumentFilter::active()).unwrap();
    assert_eq!(active.iter().map(|d| d.id).collect::<Vec<_>>(), vec![keep.id]);

    let all = env.ops.list_documents(&john, DocumentFilter::new()).unwrap();
    assert_eq!(all.len(), 2);
}
