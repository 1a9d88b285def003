//! Uploader notifications on modify and delete.

use chrono::Utc;
use docbinder_ops::NotificationKind;
use docbinder_store::DocumentStore;
use docbinder_test_utils::{create_test_env, hyperlink_input, TestEnv};
use docbinder_types::{Document, DocumentId, DocumentState, User};
use docbinder_valid::DocumentInput;

async fn johns_document(env: &mut TestEnv) -> Document {
    let john = env.fixtures.john.clone();
    env.ops
        .create_document(
            &john,
            hyperlink_input(env.fixtures.report(), "Annual report", "http://example.org/ar"),
        )
        .await
        .unwrap()
}

async fn edit_notes(env: &mut TestEnv, actor: &User, doc: &Document, notes: &str) -> Document {
    let mut edit = DocumentInput::from_document(doc);
    edit.notes = notes.to_string();
    env.ops.update_document(actor, doc.id, edit).await.unwrap()
}

#[tokio::test]
async fn test_modified_by_other_user_notifies_uploader_once() {
    let mut env = create_test_env();
    let doc = johns_document(&mut env).await;
    assert!(env.mailer.is_empty());

    let ringo = env.fixtures.ringo.clone();
    edit_notes(&mut env, &ringo, &doc, "typo fixed").await;

    let sent = env.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Modified);
    assert_eq!(sent[0].to, "john@example.com");
    assert_eq!(sent[0].actor, "ringo");
    assert_eq!(sent[0].document_id, doc.id);
    assert_eq!(sent[0].history_url, env.ops.history_url(doc.id));
    assert!(sent[0].subject.starts_with("[Test Intranet]"));
}

#[tokio::test]
async fn test_modified_by_uploader_sends_nothing() {
    let mut env = create_test_env();
    let doc = johns_document(&mut env).await;
    let john = env.fixtures.john.clone();

    edit_notes(&mut env, &john, &doc, "my own change").await;
    assert!(env.mailer.is_empty());
}

#[tokio::test]
async fn test_deleted_by_other_user_notifies_uploader() {
    let mut env = create_test_env();
    let doc = johns_document(&mut env).await;
    let admin = env.fixtures.admin.clone();

    env.ops.delete_document(&admin, doc.id).await.unwrap();

    let sent = env.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Deleted);
    assert!(sent[0].subject.contains("deleted"));
}

#[tokio::test]
async fn test_deleted_by_uploader_sends_nothing() {
    let mut env = create_test_env();
    let doc = johns_document(&mut env).await;
    let john = env.fixtures.john.clone();

    env.ops.delete_document(&john, doc.id).await.unwrap();
    assert!(env.mailer.is_empty());
}

#[tokio::test]
async fn test_document_without_uploader_sends_nothing() {
    let mut env = create_test_env();
    let orphan = Document {
        id: DocumentId(0),
        title: "Imported".into(),
        document_type: env.fixtures.report().id,
        programs: vec![],
        file: None,
        hyperlink: Some("http://example.org/imported".into()),
        notes: String::new(),
        authors: vec![env.fixtures.john.id],
        external_authors: String::new(),
        uploader: None,
        created: Utc::now(),
        confidential: false,
        state: DocumentState::Active,
    };
    let orphan = env.ops.state.documents.insert(&orphan).unwrap();

    for actor in [env.fixtures.john.clone(), env.fixtures.admin.clone()] {
        edit_notes(&mut env, &actor, &orphan, "touched").await;
    }
    let admin = env.fixtures.admin.clone();
    env.ops.delete_document(&admin, orphan.id).await.unwrap();

    assert!(env.mailer.is_empty());
}

#[tokio::test]
async fn test_disabled_notifications() {
    let mut env = create_test_env();
    env.ops.config.notifications_enabled = false;
    let doc = johns_document(&mut env).await;
    let ringo = env.fixtures.ringo.clone();

    edit_notes(&mut env, &ringo, &doc, "quiet").await;
    assert!(env.mailer.is_empty());
}
