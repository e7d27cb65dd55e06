//! Shared CLI utilities.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use text_autolink::Comment;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

/// Read a batch of comments.
///
/// A file holding a JSON array of `{"content": ...}` objects (or plain strings)
/// is one comment per element; anything else is a single comment.
pub fn read_comments(path: &Path) -> Result<Vec<Comment>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading comments file: {}", path.display()))?;

    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&content) else {
        return Ok(vec![Comment::new(content)]);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(text) => Ok(Comment::new(text)),
            other => serde_json::from_value::<Comment>(other).with_context(|| {
                format!("Comment {} in {} has no string 'content'", index, path.display())
            }),
        })
        .collect()
}

/// Directory searched for an autolink config: the comments file's own directory.
pub fn config_anchor(comments_path: &Path) -> PathBuf {
    match comments_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_csv_trims_and_drops_empty() {
        assert_eq!(
            parse_csv(&Some(" go, ,who ".to_string())),
            Some(vec!["go".to_string(), "who".to_string()])
        );
        assert_eq!(parse_csv(&None), None);
    }

    #[test]
    fn json_array_is_one_comment_per_element() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("comments.json");
        fs::write(&path, r#"[{"content": "issue 1"}, "crbug.com/2"]"#).expect("write");

        let comments = read_comments(&path).expect("comments");
        assert_eq!(comments, vec![Comment::new("issue 1"), Comment::new("crbug.com/2")]);
    }

    #[test]
    fn plain_text_is_a_single_comment() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("comment.txt");
        fs::write(&path, "Fixed in r12345.\nSee go/notes").expect("write");

        let comments = read_comments(&path).expect("comments");
        assert_eq!(comments, vec![Comment::new("Fixed in r12345.\nSee go/notes")]);
    }

    #[test]
    fn array_entry_without_content_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("comments.json");
        fs::write(&path, r#"[{"body": "x"}]"#).expect("write");

        let err = read_comments(&path).expect_err("missing content");
        assert!(format!("{err:#}").contains("has no string 'content'"));
    }

    #[test]
    fn anchor_defaults_to_current_dir() {
        assert_eq!(config_anchor(Path::new("comments.json")), PathBuf::from("."));
        assert_eq!(config_anchor(Path::new("a/comments.json")), PathBuf::from("a"));
    }
}
