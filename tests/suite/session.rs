//! Session lifecycle tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use sage_engine::{
    Command, Document, DocumentId, EditorContext, Position, Session, SessionError, SharedPresenter,
};

use crate::common::{RecordingPresenter, StubClient, test_settings};

fn shared_presenter() -> (Arc<Mutex<RecordingPresenter>>, SharedPresenter) {
    let presenter = Arc::new(Mutex::new(RecordingPresenter::default()));
    let shared: SharedPresenter = presenter.clone();
    (presenter, shared)
}

#[tokio::test]
async fn commands_run_through_the_session() {
    let client = Arc::new(StubClient::responding("Adds two numbers."));
    let (presenter, shared) = shared_presenter();
    let session = Session::start(test_settings(), client, shared);

    let editor = EditorContext::whole_document(Document::new(
        DocumentId::new(1),
        "function add(a,b){return a+b}",
    ));
    session
        .run(Command::GenerateDocs, Some(&editor))
        .await
        .unwrap();

    let presenter = presenter.lock().await;
    assert!(presenter.errors.is_empty());
    session.stop();
}

#[tokio::test]
async fn operations_after_stop_are_rejected() {
    let client = Arc::new(StubClient::responding("unused"));
    let (_presenter, shared) = shared_presenter();
    let session = Session::start(test_settings(), client.clone(), shared);

    session.stop();
    session.stop(); // stop is idempotent

    let result = session.run(Command::AnalyzeBugs, None).await;
    assert!(matches!(result, Err(SessionError::Stopped)));

    let result = session.document_changed(DocumentId::new(1), "text");
    assert!(matches!(result, Err(SessionError::Stopped)));

    let document = Document::new(DocumentId::new(1), "items.");
    let result = session.complete(&document, Position::new(0, 6)).await;
    assert!(matches!(result, Err(SessionError::Stopped)));

    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn debounced_change_publishes_empty_diagnostics() {
    let client = Arc::new(StubClient::responding("looks fine"));
    let (presenter, shared) = shared_presenter();
    let session = Session::start(
        test_settings().with_debounce(Duration::from_millis(10)),
        client.clone(),
        shared,
    );

    let doc = DocumentId::new(9);
    session.document_changed(doc, "fn main() {}").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(client.call_count(), 1);
    let presenter = presenter.lock().await;
    assert_eq!(presenter.diagnostics.len(), 1);
    assert_eq!(presenter.diagnostics[0].0, doc);
    assert!(
        presenter.diagnostics[0].1.is_empty(),
        "analysis text is never parsed into diagnostic entries"
    );
}

#[tokio::test]
async fn stop_cancels_pending_analysis() {
    let client = Arc::new(StubClient::responding("unused"));
    let (presenter, shared) = shared_presenter();
    let session = Session::start(
        test_settings().with_debounce(Duration::from_millis(50)),
        client.clone(),
        shared,
    );

    session.document_changed(DocumentId::new(1), "text").unwrap();
    session.stop();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(client.call_count(), 0);
    assert!(presenter.lock().await.diagnostics.is_empty());
}
