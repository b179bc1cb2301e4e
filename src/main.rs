//! Redraft CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use redraft::cli::{Cli, Command, CopyFormat, ShowFormat};
use redraft::client::{CorrectionClient, HttpCorrectionApi};
use redraft::config::Config;
use redraft::format::{self, SystemClipboard};
use redraft::repl::ReplSession;
use redraft::session::{GenerateStatus, TransformationSession};
use redraft::store::{FileStorage, SessionStore};

fn setup_logging(verbose: bool) -> Result<()> {
    // Log to a file so command output stays clean
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("redraft")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("redraft.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Service URL: {}", config.service.url);

    let api = HttpCorrectionApi::from_config(&config.service).context("Failed to create correction client")?;
    let client = CorrectionClient::new(Arc::new(api));
    let store = SessionStore::new(Box::new(FileStorage::new(config.storage.state_dir.clone())));
    let mut session = TransformationSession::new(client, store, config.service.temperature);

    match cli.command {
        Some(Command::Correct { text, instruction }) => cmd_correct(&mut session, text, instruction).await,
        Some(Command::Paste) => cmd_paste(&mut session),
        Some(Command::Copy { format }) => cmd_copy(&session, format),
        Some(Command::Show { format }) => cmd_show(&session, format),
        Some(Command::Toggle { key }) => cmd_toggle(&mut session, &key),
        Some(Command::Directives) => cmd_directives(&session),
        Some(Command::Clear) => {
            session.handle_clear();
            println!("Session cleared.");
            Ok(())
        }
        Some(Command::Swap) => {
            if session.raw_output().trim().is_empty() {
                println!("No result to move.");
            } else {
                session.move_result_to_input();
                println!("Result moved to input.");
            }
            Ok(())
        }
        Some(Command::Repl) | None => {
            let mut repl = ReplSession::new(session, Box::new(SystemClipboard::new()));
            repl.run().await
        }
    }
}

/// Run one correction round trip
async fn cmd_correct(
    session: &mut TransformationSession,
    text: Option<String>,
    instruction: Option<String>,
) -> Result<()> {
    if let Some(text) = text {
        session.set_input_text(text);
    }
    if let Some(instruction) = instruction {
        session.set_custom_instruction(instruction);
    }

    if session.input_text().trim().is_empty() {
        println!("Nothing to correct. Pass text, or run `redraft paste` first.");
        return Ok(());
    }

    match session.handle_generate().await {
        GenerateStatus::Updated => {
            println!("{}", session.raw_output());
            Ok(())
        }
        GenerateStatus::NoOutput => {
            println!("No usable output from the service; previous result kept.");
            Ok(())
        }
        GenerateStatus::Failed => {
            let message = session.last_error().unwrap_or("unknown error");
            eprintln!("✗ {}", message);
            std::process::exit(1);
        }
        GenerateStatus::Skipped => {
            println!("Request skipped (already busy or empty input).");
            Ok(())
        }
    }
}

/// Replace the session input from the clipboard
fn cmd_paste(session: &mut TransformationSession) -> Result<()> {
    let mut clipboard = SystemClipboard::new();
    session.handle_paste(&mut clipboard);

    if session.input_text().is_empty() {
        println!("Clipboard empty or unavailable; input unchanged.");
    } else {
        println!("{}", session.input_text());
    }
    Ok(())
}

/// Export the last result to the clipboard
fn cmd_copy(session: &TransformationSession, format: CopyFormat) -> Result<()> {
    let mut clipboard = SystemClipboard::new();
    let written = match format {
        CopyFormat::Text => session.copy_as_text(&mut clipboard),
        CopyFormat::Html => session.copy_as_html(&mut clipboard),
    };

    if written {
        println!("Copied as {}.", format);
    } else {
        println!("Clipboard unavailable; nothing copied.");
    }
    Ok(())
}

/// Print the last result
fn cmd_show(session: &TransformationSession, format: ShowFormat) -> Result<()> {
    match format {
        ShowFormat::Raw => println!("{}", session.raw_output()),
        ShowFormat::Html => println!("{}", session.preview_html()),
        ShowFormat::Doc => println!("{}", format::wrap_as_document(&session.preview_html())),
    }
    Ok(())
}

/// Flip one directive
fn cmd_toggle(session: &mut TransformationSession, key: &str) -> Result<()> {
    session.toggle_directive(key);
    cmd_directives(session)
}

/// List the directive catalog with selection marks
fn cmd_directives(session: &TransformationSession) -> Result<()> {
    println!("Directives:");
    for option in session.directives().list_options() {
        let mark = if option.active { "[x]" } else { "[ ]" };
        println!("  {} {:<14} {}", mark, option.key, option.label);
    }
    Ok(())
}
