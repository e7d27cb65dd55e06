//! Output rendering (HTML, JSON, JSONL)

pub mod html;
pub mod jsonl;

pub use html::render_html;
pub use jsonl::{render_json, render_jsonl};

use clap::ValueEnum;

/// Output formats supported by `markup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
    Jsonl,
}
