//! Command handler tests: guards, error surfacing, and presentation.

use std::sync::Arc;

use sage_engine::{Assistant, Document, DocumentId, EditorContext, Position, Selection};
use sage_types::ScanLevel;

use crate::common::{RecordingPresenter, StubClient, test_settings};

fn editor_for(text: &str) -> EditorContext {
    EditorContext::whole_document(Document::new(DocumentId::new(1), text))
}

#[tokio::test]
async fn commands_without_editor_show_info_and_make_no_calls() {
    let client = Arc::new(StubClient::responding("unused"));
    let assistant = Assistant::new(client.clone(), test_settings());

    let mut presenter = RecordingPresenter::default();
    assistant.generate_docs(None, &mut presenter).await;
    assistant.analyze_bugs(None, &mut presenter).await;
    assistant.get_suggestions(None, &mut presenter).await;
    assistant.refactor_code(None, &mut presenter).await;
    assistant.optimize_performance(None, &mut presenter).await;
    assistant.scan_security(None, &mut presenter).await;

    assert_eq!(presenter.infos.len(), 6);
    assert!(presenter.infos.iter().all(|m| m == "No active editor"));
    assert!(presenter.errors.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn each_failing_command_surfaces_exactly_one_error() {
    // Exercise each handler separately so per-command counts are visible.
    let cases: Vec<(&str, u8)> = vec![
        ("docs", 0),
        ("bugs", 1),
        ("suggest", 2),
        ("refactor", 3),
        ("optimize", 4),
        ("security", 5),
        ("snippet", 6),
    ];

    for (name, index) in cases {
        let client = Arc::new(StubClient::failing(500));
        let assistant = Assistant::new(client.clone(), test_settings());
        let editor = editor_for("fn broken() {}");
        let mut presenter = RecordingPresenter::default();

        match index {
            0 => assistant.generate_docs(Some(&editor), &mut presenter).await,
            1 => assistant.analyze_bugs(Some(&editor), &mut presenter).await,
            2 => {
                assistant
                    .get_suggestions(Some(&editor), &mut presenter)
                    .await;
            }
            3 => assistant.refactor_code(Some(&editor), &mut presenter).await,
            4 => {
                assistant
                    .optimize_performance(Some(&editor), &mut presenter)
                    .await;
            }
            5 => assistant.scan_security(Some(&editor), &mut presenter).await,
            _ => {
                assistant
                    .generate_snippet("python", "a sorting function", &mut presenter)
                    .await;
            }
        }

        assert_eq!(presenter.errors.len(), 1, "{name}: one error message");
        assert!(presenter.infos.is_empty(), "{name}: no info message");
        assert!(presenter.panels.is_empty(), "{name}: no panel");
        assert_eq!(client.call_count(), 1, "{name}: exactly one call, no retry");
    }
}

#[tokio::test]
async fn generate_docs_inserts_block_comment_at_selection_start() {
    let source = "function add(a,b){return a+b}";
    let doc_id = DocumentId::new(1);
    let client = Arc::new(StubClient::responding("Adds two numbers."));
    let assistant = Assistant::new(client.clone(), test_settings());
    let editor = editor_for(source);
    let mut presenter = RecordingPresenter::with_buffer(doc_id, source);

    assistant.generate_docs(Some(&editor), &mut presenter).await;

    assert_eq!(
        presenter.buffer(doc_id),
        "/**\n * Adds two numbers.\n */\nfunction add(a,b){return a+b}"
    );
    assert_eq!(client.call_count(), 1, "no trailing side-effect calls");
    assert!(presenter.errors.is_empty());
    assert!(presenter.infos.is_empty());
}

#[tokio::test]
async fn generate_docs_sends_only_the_selection() {
    let client = Arc::new(StubClient::responding("docs"));
    let assistant = Assistant::new(client.clone(), test_settings());
    let document = Document::new(DocumentId::new(1), "prefix SELECTED suffix");
    let editor = EditorContext {
        selection: Selection::new(7, 15),
        cursor: Position::new(0, 15),
        document,
    };
    let mut presenter = RecordingPresenter::default();

    assistant.generate_docs(Some(&editor), &mut presenter).await;

    let prompts = client.prompts();
    assert!(prompts[0].ends_with("SELECTED"));
    assert!(!prompts[0].contains("suffix"));
}

#[tokio::test]
async fn analyze_bugs_renders_escaped_panel() {
    let client = Arc::new(StubClient::responding("<script>alert(1)</script>\nline two"));
    let assistant = Assistant::new(client, test_settings());
    let editor = editor_for("let x = 1;");
    let mut presenter = RecordingPresenter::default();

    assistant.analyze_bugs(Some(&editor), &mut presenter).await;

    assert_eq!(presenter.panels.len(), 1);
    let panel = &presenter.panels[0];
    assert_eq!(panel.title(), "Bug Analysis");
    assert!(panel.html().contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!panel.html().contains("<script>alert(1)"));
    assert!(panel.html().contains("<p>line two</p>"));
}

#[tokio::test]
async fn suggestions_use_the_context_window_and_show_info() {
    let client = Arc::new(StubClient::responding("use a map here"));
    let assistant = Assistant::new(client.clone(), test_settings());

    // 15 lines; the default window is 10 lines before the cursor.
    let text: String = (0..15).map(|i| format!("line{i}\n")).collect();
    let editor = editor_for(text.trim_end());
    let mut presenter = RecordingPresenter::default();

    assistant
        .get_suggestions(Some(&editor), &mut presenter)
        .await;

    assert_eq!(presenter.infos, ["use a map here"]);
    let prompt = &client.prompts()[0];
    assert!(prompt.contains("line14"));
    assert!(prompt.contains("line4"));
    assert!(!prompt.contains("line3\n"), "window excludes older lines");
}

#[tokio::test]
async fn refactor_and_optimize_render_named_panels() {
    let client = Arc::new(StubClient::responding("advice"));
    let assistant = Assistant::new(client, test_settings());
    let editor = editor_for("let x = 1;");
    let mut presenter = RecordingPresenter::default();

    assistant.refactor_code(Some(&editor), &mut presenter).await;
    assistant
        .optimize_performance(Some(&editor), &mut presenter)
        .await;

    let titles: Vec<&str> = presenter.panels.iter().map(|p| p.title()).collect();
    assert_eq!(
        titles,
        [
            "Refactoring Suggestions",
            "Performance Optimization Suggestions"
        ]
    );
}

#[tokio::test]
async fn snippet_opens_a_document_in_the_requested_language() {
    let client = Arc::new(StubClient::responding("def quicksort(xs): ..."));
    let assistant = Assistant::new(client.clone(), test_settings());
    let mut presenter = RecordingPresenter::default();

    assistant
        .generate_snippet("python", "a function that sorts an array using quicksort", &mut presenter)
        .await;

    assert_eq!(
        presenter.opened_documents,
        [("python".to_string(), "def quicksort(xs): ...".to_string())]
    );
    let prompt = &client.prompts()[0];
    assert!(prompt.contains("code snippet in python"));
    assert!(prompt.contains("quicksort"));
}

#[tokio::test]
async fn snippet_without_description_makes_no_call() {
    let client = Arc::new(StubClient::responding("unused"));
    let assistant = Assistant::new(client.clone(), test_settings());
    let mut presenter = RecordingPresenter::default();

    assistant.generate_snippet("python", "   ", &mut presenter).await;

    assert_eq!(presenter.infos.len(), 1);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn security_scan_interpolates_the_configured_level() {
    let client = Arc::new(StubClient::responding("no issues found"));
    let settings = test_settings().with_scan_level(ScanLevel::new("deep"));
    let assistant = Assistant::new(client.clone(), settings);
    let editor = editor_for("eval(input)");
    let mut presenter = RecordingPresenter::default();

    assistant.scan_security(Some(&editor), &mut presenter).await;

    assert!(client.prompts()[0].contains("deep-level security vulnerability scan"));
    let panel = &presenter.panels[0];
    assert_eq!(panel.title(), "Security Scan Results");
    assert!(panel.html().contains("Scan Level: deep"));
    assert!(panel.html().contains("<p>no issues found</p>"));
}

#[tokio::test]
async fn empty_selection_still_issues_a_call() {
    // The prompt builder is total; suppressing trivial calls is the
    // caller's responsibility.
    let client = Arc::new(StubClient::responding("nothing to document"));
    let assistant = Assistant::new(client.clone(), test_settings());
    let document = Document::new(DocumentId::new(1), "fn main() {}");
    let editor = EditorContext {
        selection: Selection::new(0, 0),
        cursor: Position::new(0, 0),
        document,
    };
    let mut presenter = RecordingPresenter::default();

    assistant.generate_docs(Some(&editor), &mut presenter).await;

    assert_eq!(client.call_count(), 1);
}
