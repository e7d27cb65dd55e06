//! JSON and JSONL rendering of marked-up comments

use crate::domain::TextRun;
use serde_json::Value;
use std::collections::BTreeMap;

fn comment_entry(index: usize, runs: &[TextRun]) -> BTreeMap<&'static str, Value> {
    // BTreeMap keeps keys in a stable, alphabetical order.
    let mut entry = BTreeMap::new();
    entry.insert("comment", Value::Number(index.into()));
    entry.insert("runs", serde_json::to_value(runs).expect("text runs serialize to JSON"));
    entry
}

/// One JSON object per line, one line per comment.
pub fn render_jsonl(comments: &[Vec<TextRun>]) -> String {
    let mut lines = Vec::with_capacity(comments.len());
    for (index, runs) in comments.iter().enumerate() {
        if let Ok(line) = serde_json::to_string(&comment_entry(index, runs)) {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// A single pretty-printed JSON array of comments.
pub fn render_json(comments: &[Vec<TextRun>]) -> String {
    let entries: Vec<_> =
        comments.iter().enumerate().map(|(index, runs)| comment_entry(index, runs)).collect();
    match serde_json::to_string_pretty(&entries) {
        Ok(json) => format!("{json}\n"),
        Err(_) => String::from("[]\n"),
    }
}
