//! # Giftbox - a birthday surprise in four steps
//!
//! The guest scans a code, answers a short quiz to reveal a padlock PIN,
//! confirms the gift is open, and lands on the celebration page.
//!
//! ## Flow
//! ```text
//! Scan ──(secret)──→ Quiz ──(all correct)──→ Confirm ──(opened)──→ Celebrate
//!                      ↓
//!               Store (questions + PIN)
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod flow;
mod qr;
mod quiz;
mod scan;
mod settings;
mod state;
mod store;
mod terminal;

use config::AppConfig;
use giftbox_common::constants::{DEFAULT_CONFIG_PATH, qr as qr_consts};
use scan::{CommandScanner, ReplayScanner, ScanCapability};
use settings::{QuestionField, SettingsEditor};
use state::AppState;
use store::MemoryStore;

/// Giftbox - scan, quiz, unwrap, celebrate
#[derive(Parser, Debug)]
#[command(name = "giftbox")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Store file (overrides config)
    #[arg(long, env = "GIFTBOX_STORE")]
    store: Option<PathBuf>,

    /// Scan secret (overrides config)
    #[arg(long, env = "GIFTBOX_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Keep settings in memory only; nothing is read from or written to disk
    #[arg(long)]
    ephemeral: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Walk through the surprise (default)
    Run {
        /// Replay these codes instead of using the camera
        #[arg(long = "code")]
        codes: Vec<String>,
    },
    /// Inspect or edit the quiz questions and unlock PIN
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Print the scan code and a printable QR link
    Qr {
        /// Encode this text instead of the configured secret
        #[arg(long)]
        code: Option<String>,

        /// Also download the QR image to this file
        #[arg(
            short,
            long,
            num_args = 0..=1,
            default_missing_value = qr_consts::DEFAULT_DOWNLOAD_FILE
        )]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum SettingsCommand {
    /// List questions and the PIN
    Show,
    /// Append a question
    Add {
        #[arg(long)]
        question: String,
        #[arg(long, default_value = "")]
        hint: String,
        #[arg(long)]
        answer: String,
    },
    /// Change fields of a question
    Edit {
        id: u64,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        hint: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },
    /// Remove a question (the last one cannot be removed)
    Remove { id: u64 },
    /// Set the unlock PIN
    Pin { pin: String },
    /// Restore the built-in questions and PIN
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("🎁 Starting Giftbox v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!("📋 Configuration loaded from {}", args.config);
    let state = if args.ephemeral {
        AppState::with_store(config, Arc::new(MemoryStore::new()))
    } else {
        AppState::new(config)?
    };

    let command = args
        .command
        .clone()
        .unwrap_or(Command::Run { codes: Vec::new() });

    match command {
        Command::Run { codes } => run_flow(&state, codes).await,
        Command::Settings { command } => run_settings(&state, command),
        Command::Qr { code, output } => {
            let code = code.unwrap_or_else(|| state.verifier.secret().to_string());
            println!("Scan code:    {code}");
            println!("Printable QR: {}", qr::generator_url(&state.config.qr, &code));

            if let Some(path) = output {
                qr::download(&state.config.qr, &code, &path).await?;
                println!("Saved:        {}", path.display());
            }
            Ok(())
        }
    }
}

async fn run_flow(state: &AppState, codes: Vec<String>) -> Result<()> {
    let scanner: Box<dyn ScanCapability> = if codes.is_empty() {
        Box::new(CommandScanner::new(
            state.config.scanner.command.clone(),
            state.config.scanner.args.clone(),
        ))
    } else {
        Box::new(ReplayScanner::new(
            codes,
            Duration::from_millis(state.config.scanner.replay_interval_ms),
        ))
    };

    let controller = state.flow_controller();
    let input = terminal::spawn_input_reader();
    let messages = &state.config.celebration.messages;
    let mut stdout = std::io::stdout();

    tokio::select! {
        result = terminal::run(&controller, scanner, input, messages, &mut stdout) => {
            let end = result?;
            info!(state = ?end, "🎉 Session finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Interrupted, leaving the flow");
        }
    }

    Ok(())
}

fn run_settings(state: &AppState, command: SettingsCommand) -> Result<()> {
    let mut editor = SettingsEditor::load(&state.quiz_config);

    match command {
        SettingsCommand::Show => {
            print_settings(&editor);
            return Ok(());
        }
        SettingsCommand::Add {
            question,
            hint,
            answer,
        } => {
            let id = editor.add_question(question, hint, answer);
            println!("Added question {id}");
        }
        SettingsCommand::Edit {
            id,
            question,
            hint,
            answer,
        } => {
            for (field, value) in [
                (QuestionField::Question, question),
                (QuestionField::Hint, hint),
                (QuestionField::Answer, answer),
            ] {
                if let Some(value) = value {
                    editor.update_question(id, field, value)?;
                }
            }
        }
        SettingsCommand::Remove { id } => {
            let removed = editor.remove_question(id)?;
            println!("Removed question {}: {}", removed.id, removed.question);
        }
        SettingsCommand::Pin { pin } => editor.set_unlock_pin(pin),
        SettingsCommand::Reset => editor.reset_to_defaults(),
    }

    editor
        .save(&state.quiz_config)
        .context("Failed to save settings")?;
    println!("Settings saved.");
    print_settings(&editor);

    Ok(())
}

fn print_settings(editor: &SettingsEditor) {
    let config = editor.config();
    println!("Unlock PIN: {}", config.unlock_pin);
    for (index, q) in config.questions.iter().enumerate() {
        println!();
        println!("#{} (id {})  {}", index + 1, q.id, q.question);
        if !q.hint.is_empty() {
            println!("    hint:   {}", q.hint);
        }
        println!("    answer: {}", q.answer);
    }
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Views go to stdout; keep logs on stderr
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_output_defaults_to_invitation_file() {
        let args = Args::parse_from(["giftbox", "qr", "--output"]);
        match args.command {
            Some(Command::Qr { code, output }) => {
                assert_eq!(code, None);
                assert_eq!(output, Some(PathBuf::from("birthday-invitation-qr.png")));
            }
            other => panic!("expected qr, got {other:?}"),
        }

        let args = Args::parse_from(["giftbox", "qr", "--code", "hi", "-o", "out/hi.png"]);
        assert!(matches!(
            args.command,
            Some(Command::Qr { output: Some(ref p), .. }) if p == &PathBuf::from("out/hi.png")
        ));
    }
}
