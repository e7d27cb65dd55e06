//! Core data types shared across the crate

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CSS class applied to links that point at closed issues.
pub const STRIKE_THROUGH: &str = "strike-through";

/// One annotated or plain segment of output text.
///
/// Runs are created fresh by every markup pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum TextRun {
    Plain {
        content: String,
    },
    Bold {
        content: String,
    },
    LineBreak,
    Link {
        content: String,
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        css: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        TextRun::Plain { content: content.into() }
    }

    pub fn bold(content: impl Into<String>) -> Self {
        TextRun::Bold { content: content.into() }
    }

    pub fn link(content: impl Into<String>, href: impl Into<String>) -> Self {
        TextRun::Link { content: content.into(), href: href.into(), css: None, title: None }
    }

    /// Displayed text. Line breaks have none.
    pub fn content(&self) -> &str {
        match self {
            TextRun::Plain { content } | TextRun::Bold { content } => content,
            TextRun::Link { content, .. } => content,
            TextRun::LineBreak => "",
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, TextRun::Plain { .. })
    }
}

/// Rebuild the text a run sequence displays, with `\n` for every line break.
pub fn runs_to_text(runs: &[TextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        match run {
            TextRun::LineBreak => out.push('\n'),
            other => out.push_str(other.content()),
        }
    }
    out
}

/// A candidate issue reference pulled out of comment text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRef {
    pub project_name: String,
    pub local_id: String,
}

impl IssueRef {
    pub fn new(project_name: impl Into<String>, local_id: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), local_id: local_id.into() }
    }
}

/// An issue confirmed to exist by the issue lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIssue {
    pub project_name: String,
    pub local_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ResolvedIssue {
    pub fn new(project_name: impl Into<String>, local_id: impl Into<String>) -> Self {
        Self { project_name: project_name.into(), local_id: local_id.into(), summary: None }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// A user confirmed to exist by the user lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUser {
    pub email: String,
}

/// A structured reference extracted from one pattern match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Reference {
    Issue(IssueRef),
    Email { email: String },
    Revision { revnum: String },
    Comment { number: String },
}

/// Confirmation data for one link component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExistingRefs {
    // Users first: every field of `Issues` is optional, so it would accept any object.
    Users {
        users: Vec<ResolvedUser>,
    },
    #[serde(rename_all = "camelCase")]
    Issues {
        #[serde(default)]
        open_refs: Vec<ResolvedIssue>,
        #[serde(default)]
        closed_refs: Vec<ResolvedIssue>,
    },
}

/// Resolution results for one batch of comments, keyed by component.
///
/// A component with no entry is treated as having confirmed nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedReferences {
    by_component: HashMap<String, ExistingRefs>,
    skipped: bool,
}

impl ResolvedReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker for a batch too large to autolink; markup only splits chunks.
    pub fn skip_autolinking() -> Self {
        Self { by_component: HashMap::new(), skipped: true }
    }

    pub fn insert(&mut self, component: impl Into<String>, refs: ExistingRefs) {
        self.by_component.insert(component.into(), refs);
    }

    pub fn get(&self, component: &str) -> Option<&ExistingRefs> {
        self.by_component.get(component)
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.by_component.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_component.is_empty()
    }
}

/// A comment to be autolinked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

/// Engine configuration, loaded from `autolink.toml` / `autolink.yaml` and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project assumed for references such as `issue 12` that name none.
    pub default_project: Option<String>,
    /// Hosts linked as `host/anything`, e.g. `go/monorail`.
    #[serde(deserialize_with = "string_or_list")]
    pub shorthand_hosts: Vec<String>,
    /// Hosts linked only as `host/<digits>`, e.g. `b/1234`.
    #[serde(deserialize_with = "string_or_list")]
    pub numeric_shorthand_hosts: Vec<String>,
    /// Revision link target; `{revnum}` is replaced by the hash or number.
    pub revision_url_format: String,
    /// Batches of comments longer than this (in bytes) are not autolinked.
    pub max_total_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_project: None,
            shorthand_hosts: ["go", "g", "shortn", "who", "teams"].map(String::from).to_vec(),
            numeric_shorthand_hosts: ["b", "t", "o", "omg", "cl", "cr"]
                .map(String::from)
                .to_vec(),
            revision_url_format: "https://crrev.com/{revnum}".to_string(),
            max_total_length: 50 * 1024,
        }
    }
}

/// Accept either a list of strings or one comma-separated string.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let parts = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        StringOrList::Many(items) => items,
    };
    Ok(parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_to_text_reinserts_line_breaks() {
        let runs = vec![
            TextRun::plain("a"),
            TextRun::LineBreak,
            TextRun::bold("b"),
            TextRun::link("c", "/c"),
        ];
        assert_eq!(runs_to_text(&runs), "a\nbc");
    }

    #[test]
    fn link_run_serializes_without_empty_fields() {
        let run = TextRun::link("go/x", "http://go/x");
        let value = serde_json::to_value(&run).expect("json");
        assert_eq!(value["tag"], "link");
        assert_eq!(value["href"], "http://go/x");
        assert!(value.get("css").is_none());
        assert!(value.get("title").is_none());
    }

    #[test]
    fn existing_refs_deserialize_issue_and_user_shapes() {
        let issues: ExistingRefs = serde_json::from_str(
            r#"{"openRefs": [{"projectName": "chromium", "localId": "1"}], "closedRefs": []}"#,
        )
        .expect("issues");
        assert!(matches!(issues, ExistingRefs::Issues { ref open_refs, .. } if open_refs.len() == 1));

        let users: ExistingRefs =
            serde_json::from_str(r#"{"users": [{"email": "a@example.com"}]}"#).expect("users");
        assert!(matches!(users, ExistingRefs::Users { ref users } if users.len() == 1));
    }

    #[test]
    fn skipped_references_report_skip() {
        assert!(ResolvedReferences::skip_autolinking().is_skipped());
        assert!(!ResolvedReferences::new().is_skipped());
    }
}
