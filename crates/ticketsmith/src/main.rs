//! Command-line shell around the ticket generation pipeline.
//!
//! Supplies (prefix, start, end) plus optional config overrides, prints a
//! progress line per ticket, and reports the final first → last summary.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ticket_engine::{BatchRequest, TicketConfig, run_batch};

#[derive(Parser, Debug)]
#[command(name = "ticketsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a numbered range of tickets.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Ticket prefix, e.g. "SOV-".
    #[arg(long)]
    prefix: String,

    /// First ticket number (inclusive).
    #[arg(long)]
    start: u64,

    /// Last ticket number (inclusive).
    #[arg(long)]
    end: u64,

    /// JSON config file with layout and path overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the template image path.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the CSV log path.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let config = TicketConfig::from_json_file(path)
                .with_context(|| format!("load config '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "Loaded config overrides");
            config
        }
        None => TicketConfig::default(),
    };
    if let Some(template) = args.template {
        config.template_path = template;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(log) = args.log {
        config.log_path = log;
    }

    let request = BatchRequest {
        prefix: args.prefix.trim().to_string(),
        start: args.start,
        end: args.end,
    };

    let summary = run_batch(&config, &request, |p| {
        eprintln!("[{}/{}] generated {}", p.index, p.total, p.ticket_id);
    })?;

    eprintln!(
        "Tickets generated: {} → {}",
        summary.first_id, summary.last_id
    );
    Ok(())
}
