// src/main.rs — Tiller CLI

use std::io::{self, Write};
use std::time::Duration;

use clap::{Parser, Subcommand};

use tiller::core::orchestrator::{Orchestrator, TeamConfig};
use tiller::core::types::ProgressEvent;
use tiller::infra::config::Config;
use tiller::infra::{logger, paths};
use tiller::responder::command::CommandResponder;
use tiller::responder::data::DataResponder;
use tiller::responder::lookup::LookupResponder;
use tiller::responder::report::ReportResponder;
use tiller::session::SessionLog;

#[derive(Parser)]
#[command(
    name = "tiller",
    version,
    about = "Routes each question across a data-analysis responder team and logs every exchange to a session notebook"
)]
struct Cli {
    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Suppress the per-responder progress lines on stderr.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat loop (the default).
    Chat,
    /// Answer a single question and exit.
    Ask { question: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logging(&cli.log_level);
    paths::ensure_dirs().await?;

    let config = Config::load()?;
    let mut orchestrator = build_team(&config)?;
    if !cli.quiet {
        orchestrator = orchestrator.with_progress(print_progress);
    }

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&mut orchestrator).await,
        Commands::Ask { question } => {
            let report = orchestrator.run(&question).await;
            println!("{}", report.summary);
        }
    }

    orchestrator.shutdown().await;
    Ok(())
}

/// Wire the four team roles from config. The data responder reads SQLite
/// directly; lookup and chart are external processes; the report compiler
/// is in-process.
fn build_team(config: &Config) -> anyhow::Result<Orchestrator> {
    let db_path = config
        .responders
        .database
        .as_ref()
        .map(Into::into)
        .unwrap_or_else(paths::db_path);
    let reports_dir = config
        .session
        .reports_dir
        .as_ref()
        .map(Into::into)
        .unwrap_or_else(paths::reports_dir);

    let session = SessionLog::new(reports_dir)?;
    let team_config = TeamConfig {
        responder_timeout: Duration::from_secs(config.responders.timeout_seconds),
    };

    Ok(Orchestrator::new(
        Box::new(DataResponder::open(db_path)?),
        Box::new(LookupResponder::new(config.responders.lookup_command.clone())),
        Box::new(CommandResponder::new(
            "chart_maker",
            config.responders.chart_command.clone(),
            vec![],
        )),
        Box::new(ReportResponder::default()),
        session,
        team_config,
    ))
}

fn print_progress(event: ProgressEvent) {
    match event {
        ProgressEvent::ResponderStart { name } => eprintln!("  … {name} working"),
        ProgressEvent::ResponderDone { name, chars } => {
            eprintln!("  ✓ {name} replied ({chars} chars)")
        }
        ProgressEvent::LookupTriggered { topics } => {
            eprintln!("  → knowledge lookup triggered ({topics} topics)")
        }
        ProgressEvent::ArtifactsFound { count } => eprintln!("  → {count} chart(s) referenced"),
        ProgressEvent::RecordAppended { interactions } => {
            eprintln!("  → session notebook updated ({interactions} interactions)")
        }
    }
}

async fn run_chat(orchestrator: &mut Orchestrator) {
    eprintln!(
        "tiller v{} | session {} | notebook {}",
        env!("CARGO_PKG_VERSION"),
        orchestrator.session().session_id(),
        orchestrator.session().notebook_path().display(),
    );
    eprintln!("Ask a question; 'quit' or 'exit' to leave.\n");

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if matches!(trimmed, "quit" | "exit" | "bye" | "q") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let report = orchestrator.run(trimmed).await;
        println!("{}\n", report.summary);
    }

    eprintln!(
        "Session notebook saved: {}",
        orchestrator.session().notebook_path().display()
    );
}

fn read_input() -> Option<String> {
    eprint!("you> ");
    let _ = io::stderr().flush();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}
