//! Refs command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use text_autolink::config::load_config;
use text_autolink::resolve::collect_references;
use text_autolink::Registry;

use super::utils::{config_anchor, read_comments};

#[derive(Args)]
pub struct RefsArgs {
    /// Comments file: a JSON array of {"content": ...} or plain text
    #[arg(value_name = "COMMENTS")]
    pub comments: PathBuf,

    /// Project assumed for references that name none
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Path to config file (autolink.toml or autolink.yml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: RefsArgs) -> Result<()> {
    let config = load_config(&config_anchor(&args.comments), args.config.as_deref())?;
    let project = args.project.or(config.default_project.clone());
    let registry = Registry::from_config(&config).context("Failed building link patterns")?;

    let comments = read_comments(&args.comments)?;
    let collected: Vec<_> = collect_references(&registry, &comments, project.as_deref())
        .into_iter()
        .filter(|component| !component.references.is_empty())
        .collect();

    println!("{}", serde_json::to_string_pretty(&collected)?);
    Ok(())
}
