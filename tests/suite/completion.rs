//! Completion provider tests.

use std::sync::Arc;

use sage_engine::{CompletionProvider, Document, DocumentId, Position};

use crate::common::StubClient;

const CONTEXT_LINES: usize = 10;

fn doc(text: &str) -> Document {
    Document::new(DocumentId::new(1), text)
}

fn end_of(document: &Document) -> Position {
    let line = document.text().lines().count().saturating_sub(1);
    let column = document
        .text()
        .lines()
        .next_back()
        .map_or(0, |last| last.chars().count());
    Position::new(line, column)
}

#[tokio::test]
async fn splits_response_lines_and_drops_blanks() {
    let client = Arc::new(StubClient::responding("foo\n\nbar\n"));
    let provider = CompletionProvider::new(client.clone(), CONTEXT_LINES);
    let document = doc("items.");

    let items = provider.complete(&document, end_of(&document)).await;

    let labels: Vec<&str> = items.iter().map(|item| item.label()).collect();
    assert_eq!(labels, ["foo", "bar"]);
    assert!(items.iter().all(|item| item.detail() == "AI suggestion"));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn does_not_fire_without_the_trigger_character() {
    let client = Arc::new(StubClient::responding("unused"));
    let provider = CompletionProvider::new(client.clone(), CONTEXT_LINES);
    let document = doc("items");

    let items = provider.complete(&document, end_of(&document)).await;

    assert!(items.is_empty());
    assert_eq!(client.call_count(), 0, "no call without trigger");
}

#[tokio::test]
async fn failure_yields_an_empty_list() {
    let client = Arc::new(StubClient::failing(500));
    let provider = CompletionProvider::new(client.clone(), CONTEXT_LINES);
    let document = doc("items.");

    let items = provider.complete(&document, end_of(&document)).await;

    assert!(items.is_empty());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn prompt_carries_the_trailing_window_only() {
    let client = Arc::new(StubClient::responding("push()"));
    let provider = CompletionProvider::new(client.clone(), 2);

    let document = doc("alpha\nbeta\ngamma\ndelta\nlist.");
    let items = provider.complete(&document, end_of(&document)).await;

    assert_eq!(items.len(), 1);
    let prompt = &client.prompts()[0];
    assert!(prompt.ends_with("gamma\ndelta\nlist."));
    assert!(!prompt.contains("alpha"));
}
