//! `ui-builder` — command-line shell over the UI agent.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ui_builder::history::Version;
use ui_builder::{ChatBackend, Config, UiAgent, VersionHistory};

#[derive(Parser, Debug)]
#[command(name = "ui-builder", version, about = "Generate React UI components from plain-language descriptions")]
struct Cli {
    /// YAML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OpenRouter API key (defaults to OPENROUTER_API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Version history file (overrides the config).
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan, generate and explain a new component.
    Generate {
        /// What to build, e.g. "a dashboard with a navbar and table".
        request: String,
        /// Write the code here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Change existing component code.
    Modify {
        /// What to change.
        instruction: String,
        /// Code to modify (defaults to the current version).
        #[arg(long)]
        code: Option<PathBuf>,
        /// Write the code here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect or edit the version history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List versions, oldest first.
    List,
    /// Print a version's code.
    Show { id: u64 },
    /// Make a version current and print its code.
    Rollback { id: u64 },
    /// Delete a version.
    Delete { id: u64 },
    /// Delete every version.
    Clear,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,ui_builder=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let mut history = match cli.history.as_ref().or(config.history.path.as_ref()) {
        Some(path) => VersionHistory::open(path, config.history.capacity),
        None => VersionHistory::in_memory(config.history.capacity),
    };

    match cli.command {
        Command::Generate { request, out } => {
            let agent = build_agent(&config, cli.api_key)?;
            generate(agent, &request, out.as_deref(), &mut history).await
        }
        Command::Modify {
            instruction,
            code,
            out,
        } => {
            let mut agent = build_agent(&config, cli.api_key)?;
            modify(&mut agent, &instruction, code.as_deref(), out.as_deref(), &mut history).await
        }
        Command::History { action } => history_command(action, &mut history),
    }
}

fn build_agent(config: &Config, api_key: Option<String>) -> Result<UiAgent> {
    let backend = match api_key {
        Some(key) => ChatBackend::new(key, &config.llm),
        None => ChatBackend::from_env(&config.llm)?,
    };
    Ok(UiAgent::new(Arc::new(backend)))
}

async fn generate(
    agent: UiAgent,
    request: &str,
    out: Option<&Path>,
    history: &mut VersionHistory,
) -> Result<()> {
    let (mut events, handle) = agent.spawn_generate(request);
    while let Some(event) = events.next().await {
        eprintln!("[{}] {}", event.stage.as_str(), event.message);
    }

    let (_agent, result) = handle.await.context("generation task panicked")?;
    let result = result?;

    emit_code(&result.code, out)?;
    eprintln!("\n{}", result.explanation.trim());

    let version = history.add_version(&result.code, &result.plan, request);
    eprintln!("saved as version {}", version.id);
    Ok(())
}

async fn modify(
    agent: &mut UiAgent,
    instruction: &str,
    code_path: Option<&Path>,
    out: Option<&Path>,
    history: &mut VersionHistory,
) -> Result<()> {
    let current_code = match code_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => match history.current() {
            Some(v) => v.code.clone(),
            None => bail!("no current version to modify; pass --code or run `generate` first"),
        },
    };

    eprintln!("[generating] Applying modification...");
    let output = agent.modify_code(&current_code, instruction).await?;
    emit_code(&output.code, out)?;

    let prompt = modification_prompt(instruction);
    let version = history.add_version(&output.code, &Value::Null, &prompt);
    eprintln!("saved as version {}", version.id);
    Ok(())
}

fn history_command(action: HistoryAction, history: &mut VersionHistory) -> Result<()> {
    match action {
        HistoryAction::List => {
            let current = history.current_id();
            for v in history.versions() {
                let marker = if Some(v.id) == current { "*" } else { " " };
                println!("{marker} {}  {}", v.id, summarize(v));
            }
        }
        HistoryAction::Show { id } => match history.get(id) {
            Some(v) => println!("{}", v.code),
            None => bail!("no version {id}"),
        },
        HistoryAction::Rollback { id } => match history.rollback_to(id) {
            Some(v) => println!("{}", v.code),
            None => bail!("no version {id}"),
        },
        HistoryAction::Delete { id } => {
            if !history.delete_version(id) {
                bail!("no version {id}");
            }
        }
        HistoryAction::Clear => history.clear(),
    }
    Ok(())
}

fn emit_code(code: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, code)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{code}");
            Ok(())
        }
    }
}

/// Modifications are recorded without a plan, tagged so `history list`
/// tells them apart from fresh generations.
fn modification_prompt(instruction: &str) -> String {
    format!("Modify: {instruction}")
}

fn summarize(version: &Version) -> String {
    const MAX: usize = 60;
    let prompt = version.prompt.replace('\n', " ");
    if prompt.chars().count() <= MAX {
        prompt
    } else {
        let cut: String = prompt.chars().take(MAX).collect();
        format!("{cut}...")
    }
}
