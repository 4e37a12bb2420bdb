mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use taskboard_core::AppConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        // stdout carries the JSON responses
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "taskboard", &mut std::io::stdout());
        return Ok(());
    }

    let config = AppConfig::load();
    let Some(file_path) = cli.file.or_else(|| config.data_file.clone()) else {
        output::output_error("--file is required (or set TASKBOARD_FILE)");
    };

    let ctx = match CliContext::load(&file_path, config).await {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&e.to_string()),
    };

    if let Err(e) = run(&ctx, cli.command).await {
        output::output_error(&format!("{:#}", e));
    }
    Ok(())
}

async fn run(ctx: &CliContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Board(board_cmd) => handlers::board::handle(ctx, board_cmd.action).await,
        Commands::List(list_cmd) => handlers::list::handle(ctx, list_cmd.action).await,
        Commands::Card(card_cmd) => handlers::card::handle(ctx, card_cmd.action).await,
        Commands::Drag(args) => handlers::drag::handle(ctx, args).await,
        Commands::Reminders(reminders_cmd) => {
            handlers::reminders::handle(ctx, reminders_cmd.action).await
        }
        // Handled before the data file is opened.
        Commands::Completions { .. } => Ok(()),
    }
}
