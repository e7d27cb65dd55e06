//! Command-line interface for text-autolink
//!
//! Provides `markup` and `refs` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod markup;
mod refs;
mod utils;

/// Turn issue references, emails, URLs and revisions in comments into links
#[derive(Parser)]
#[command(name = "text-autolink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve references in a batch of comments and render the marked-up text
    Markup(Box<markup::MarkupArgs>),

    /// List the references each link component finds, without resolving them
    Refs(refs::RefsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Markup(args) => markup::run(*args),
        Commands::Refs(args) => refs::run(args),
    }
}
