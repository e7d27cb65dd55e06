//! Markup command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use text_autolink::config::{load_config, merge_cli_with_config, CliOverrides};
use text_autolink::render::{render_html, render_json, render_jsonl, OutputFormat};
use text_autolink::{Autolinker, ReferenceResolver, StaticLookup, TextRun};

use super::utils::{config_anchor, parse_csv, read_comments};

#[derive(Args)]
pub struct MarkupArgs {
    /// Comments file: a JSON array of {"content": ...} or plain text
    #[arg(value_name = "COMMENTS")]
    pub comments: PathBuf,

    /// Known issues and users (JSON, TOML or YAML); without it nothing resolves
    #[arg(short, long, value_name = "FILE")]
    pub artifacts: Option<PathBuf>,

    /// Project assumed for references that name none
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Path to config file (autolink.toml or autolink.yml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Short-link hosts (comma-separated), e.g. "go,who"
    #[arg(long, value_name = "HOSTS")]
    pub shorthand_hosts: Option<String>,

    /// Hosts linked only with a numeric path (comma-separated), e.g. "b,cl"
    #[arg(long, value_name = "HOSTS")]
    pub numeric_hosts: Option<String>,

    /// Revision link format; {revnum} is replaced by the revision
    #[arg(long, value_name = "FORMAT")]
    pub revision_url: Option<String>,

    /// Skip autolinking when the comments add up to more than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_total_length: Option<usize>,
}

pub fn run(args: MarkupArgs) -> Result<()> {
    let file_config = load_config(&config_anchor(&args.comments), args.config.as_deref())?;
    let config = merge_cli_with_config(
        file_config,
        CliOverrides {
            default_project: args.project.clone(),
            shorthand_hosts: parse_csv(&args.shorthand_hosts),
            numeric_shorthand_hosts: parse_csv(&args.numeric_hosts),
            revision_url_format: args.revision_url.clone(),
            max_total_length: args.max_total_length,
        },
    );

    let comments = read_comments(&args.comments)?;
    let lookup = match args.artifacts.as_deref() {
        Some(path) => StaticLookup::from_path(path)?,
        None => StaticLookup::new(),
    };
    let lookup = Arc::new(lookup);

    let autolinker = Autolinker::from_config(&config).context("Failed building link patterns")?;
    let resolver =
        ReferenceResolver::new(autolinker.shared_registry(), lookup.clone(), lookup)
            .with_max_total_length(config.max_total_length);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed starting async runtime")?;
    let resolved = runtime
        .block_on(resolver.get_referenced_artifacts(&comments, autolinker.default_project()))
        .context("Failed resolving references")?;

    let marked: Vec<Vec<TextRun>> =
        comments.iter().map(|comment| autolinker.markup(&comment.content, &resolved)).collect();

    let output = match args.format {
        OutputFormat::Html => {
            let mut html = String::new();
            for runs in &marked {
                html.push_str("<div class=\"comment\">");
                html.push_str(&render_html(runs));
                html.push_str("</div>\n");
            }
            html
        }
        OutputFormat::Json => render_json(&marked),
        OutputFormat::Jsonl => render_jsonl(&marked),
    };
    print!("{output}");
    Ok(())
}
