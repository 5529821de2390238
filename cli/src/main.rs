//! Sage CLI - a minimal terminal host for the assistant engine.
//!
//! Runs one command per invocation against a file, acting as the
//! presenter the engine renders into:
//!
//! ```text
//! sage docs <file>                  document the file, print the comment
//! sage bugs <file>                  bug analysis panel
//! sage suggest <file>               suggestions for the end of the file
//! sage refactor <file>              refactoring panel
//! sage optimize <file>              performance panel
//! sage snippet <language> <desc..>  generate a snippet
//! sage security <file>              security scan panel
//! sage complete <file>              completion candidates at end of file
//! ```
//!
//! Configuration comes from `~/.sage/config.toml` or `GEMINI_API_KEY`.

use std::io::stderr;
use std::sync::Arc;
use std::{env, fs, process::ExitCode};

use anyhow::{Context, Result, bail};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use sage_engine::{
    Command, Diagnostic, Document, DocumentId, EditorContext, GeminiClient, Panel, Presenter,
    SageConfig, Session, Settings, SharedPresenter,
};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .init();
}

fn usage() {
    eprintln!(
        "usage: sage <command> [args]\n\
         \n\
         commands:\n\
         \x20 docs <file>                  insert documentation for the file\n\
         \x20 bugs <file>                  analyze the file for bugs\n\
         \x20 suggest <file>               suggestions for the end of the file\n\
         \x20 refactor <file>              refactoring suggestions\n\
         \x20 optimize <file>              performance suggestions\n\
         \x20 snippet <language> <desc..>  generate a snippet\n\
         \x20 security <file>              security vulnerability scan\n\
         \x20 complete <file>              completion candidates at end of file"
    );
}

/// Presenter that renders everything to the terminal.
struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show_info(&mut self, message: &str) {
        println!("{message}");
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn insert_text(&mut self, _document: DocumentId, offset: usize, text: &str) {
        println!("--- insert at byte {offset} ---");
        print!("{text}");
    }

    fn show_panel(&mut self, panel: Panel) {
        println!("--- {} ---", panel.title());
        println!("{}", panel.html());
    }

    fn open_document(&mut self, language: &str, content: &str) {
        println!("--- new {language} document ---");
        println!("{content}");
    }

    fn publish_diagnostics(&mut self, document: DocumentId, diagnostics: Vec<Diagnostic>) {
        println!(
            "--- diagnostics for document {document}: {} entries ---",
            diagnostics.len()
        );
    }
}

fn editor_from_file(path: &str) -> Result<EditorContext> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read file: {path}"))?;
    let document = Document::new(DocumentId::new(1), text);
    Ok(EditorContext::whole_document(document))
}

async fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        usage();
        bail!("missing command");
    };

    let config = SageConfig::load().unwrap_or_default();
    let settings = Settings::resolve(&config)?;
    tracing::debug!(model = settings.model(), "configuration resolved");

    let mut client = GeminiClient::new(settings.api_key().clone(), settings.model())
        .with_max_output_tokens(settings.max_output_tokens());
    if let Some(base_url) = settings.base_url() {
        client = client.with_base_url(base_url);
    }

    let presenter: SharedPresenter = Arc::new(Mutex::new(TerminalPresenter));
    let session = Session::start(settings, Arc::new(client), Arc::clone(&presenter));

    match command.as_str() {
        "docs" | "bugs" | "suggest" | "refactor" | "optimize" | "security" => {
            let Some(path) = args.get(1) else {
                usage();
                bail!("{command} requires a file argument");
            };
            let editor = editor_from_file(path)?;
            let command = match command.as_str() {
                "docs" => Command::GenerateDocs,
                "bugs" => Command::AnalyzeBugs,
                "suggest" => Command::GetSuggestions,
                "refactor" => Command::RefactorCode,
                "optimize" => Command::OptimizePerformance,
                _ => Command::ScanSecurity,
            };
            session.run(command, Some(&editor)).await?;
        }
        "snippet" => {
            let Some(language) = args.get(1) else {
                usage();
                bail!("snippet requires a language argument");
            };
            if !session
                .settings()
                .snippet_languages()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(language))
            {
                bail!(
                    "unknown snippet language '{language}'; configured: {}",
                    session.settings().snippet_languages().join(", ")
                );
            }
            let description = args[2..].join(" ");
            session
                .run(
                    Command::GenerateSnippet {
                        language: language.clone(),
                        description,
                    },
                    None,
                )
                .await?;
        }
        "complete" => {
            let Some(path) = args.get(1) else {
                usage();
                bail!("complete requires a file argument");
            };
            let editor = editor_from_file(path)?;
            let items = session.complete(&editor.document, editor.cursor).await?;
            if items.is_empty() {
                println!("(no candidates)");
            }
            for item in items {
                println!("{}\t{}", item.label(), item.detail());
            }
        }
        other => {
            usage();
            bail!("unknown command: {other}");
        }
    }

    session.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sage: {err:#}");
            ExitCode::FAILURE
        }
    }
}
