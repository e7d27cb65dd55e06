//! File-backed lookup services
//!
//! Serves issue and user lookups from a static artifacts file, so the CLI can
//! mark up comments without a live tracker behind it.

use super::{IssueLookup, IssueLookupResponse, UserLookup, UserLookupResponse};
use crate::domain::{IssueRef, ResolvedIssue, ResolvedUser};
use crate::error::LookupFailure;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Known issues and users, as read from an artifacts file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaticLookup {
    pub open_issues: Vec<ResolvedIssue>,
    pub closed_issues: Vec<ResolvedIssue>,
    pub users: Vec<ResolvedUser>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `.json`, `.toml`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed reading artifacts file: {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

        let lookup = match ext.as_str() {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON artifacts: {}", path.display()))?,
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML artifacts: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML artifacts: {}", path.display()))?,
            other => anyhow::bail!(
                "Unsupported artifacts extension '.{}' for file {}",
                other,
                path.display()
            ),
        };
        tracing::debug!("Loaded artifacts from {}", path.display());
        Ok(lookup)
    }

    pub fn with_open_issue(mut self, issue: ResolvedIssue) -> Self {
        self.open_issues.push(issue);
        self
    }

    pub fn with_closed_issue(mut self, issue: ResolvedIssue) -> Self {
        self.closed_issues.push(issue);
        self
    }

    pub fn with_user(mut self, email: impl Into<String>) -> Self {
        self.users.push(ResolvedUser { email: email.into() });
        self
    }
}

fn same_issue(issue: &ResolvedIssue, requested: &IssueRef) -> bool {
    requested.project_name.eq_ignore_ascii_case(&issue.project_name)
        && requested.local_id.trim_start_matches('0') == issue.local_id.trim_start_matches('0')
}

/// Known issues that were asked for, reported under the project name as requested.
fn matching(issues: &[ResolvedIssue], refs: &[IssueRef]) -> Vec<ResolvedIssue> {
    issues
        .iter()
        .filter_map(|issue| {
            let requested = refs.iter().find(|r| same_issue(issue, r))?;
            Some(ResolvedIssue { project_name: requested.project_name.clone(), ..issue.clone() })
        })
        .collect()
}

#[async_trait]
impl IssueLookup for StaticLookup {
    async fn lookup_issues(
        &self,
        refs: &[IssueRef],
    ) -> std::result::Result<IssueLookupResponse, LookupFailure> {
        Ok(IssueLookupResponse {
            open_refs: matching(&self.open_issues, refs),
            closed_refs: matching(&self.closed_issues, refs),
        })
    }
}

#[async_trait]
impl UserLookup for StaticLookup {
    async fn lookup_users(
        &self,
        emails: &[String],
    ) -> std::result::Result<UserLookupResponse, LookupFailure> {
        let users = self
            .users
            .iter()
            .filter(|user| emails.iter().any(|e| e.eq_ignore_ascii_case(&user.email)))
            .cloned()
            .collect();
        Ok(UserLookupResponse { users })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Autolinker;
    use crate::domain::{Comment, TextRun};
    use crate::registry::Registry;
    use crate::resolve::ReferenceResolver;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn fixture() -> StaticLookup {
        StaticLookup::new()
            .with_open_issue(ResolvedIssue::new("monorail", "123").with_summary("Fix login"))
            .with_closed_issue(ResolvedIssue::new("chromium", "456"))
            .with_user("user@example.com")
    }

    #[tokio::test]
    async fn only_requested_issues_are_returned() {
        let response = fixture()
            .lookup_issues(&[IssueRef::new("Monorail", "0123"), IssueRef::new("v8", "456")])
            .await
            .expect("lookup");
        assert_eq!(
            response.open_refs,
            vec![ResolvedIssue::new("Monorail", "123").with_summary("Fix login")]
        );
        assert!(response.closed_refs.is_empty());
    }

    #[tokio::test]
    async fn open_issue_links_when_project_case_differs() {
        let lookup =
            Arc::new(StaticLookup::new().with_open_issue(ResolvedIssue::new("Monorail", "5")));
        let autolinker = Autolinker::new(Registry::standard().expect("registry"))
            .with_default_project("monorail");
        let resolver = ReferenceResolver::new(autolinker.shared_registry(), lookup.clone(), lookup);

        let comments = vec![Comment::new("see issue 5")];
        let resolved = resolver
            .get_referenced_artifacts(&comments, autolinker.default_project())
            .await
            .expect("resolved");

        assert_eq!(
            autolinker.markup(&comments[0].content, &resolved),
            vec![
                TextRun::plain("see "),
                TextRun::plain("issue "),
                TextRun::link("5", "/p/monorail/issues/detail?id=5"),
            ]
        );
    }

    #[tokio::test]
    async fn users_match_case_insensitively() {
        let response = fixture()
            .lookup_users(&["USER@example.com".to_string(), "other@example.com".to_string()])
            .await
            .expect("lookup");
        assert_eq!(response.users, vec![ResolvedUser { email: "user@example.com".to_string() }]);
    }

    #[test]
    fn loads_json_artifacts() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("artifacts.json");
        fs::write(
            &path,
            r#"{
                "open_issues": [{"projectName": "monorail", "localId": "1", "summary": "s"}],
                "users": [{"email": "a@example.com"}]
            }"#,
        )
        .expect("write");

        let lookup = StaticLookup::from_path(&path).expect("load");
        assert_eq!(lookup.open_issues, vec![ResolvedIssue::new("monorail", "1").with_summary("s")]);
        assert!(lookup.closed_issues.is_empty());
        assert_eq!(lookup.users.len(), 1);
    }

    #[test]
    fn loads_yaml_and_toml_artifacts() {
        let tmp = TempDir::new().expect("tmp");

        let yaml = tmp.path().join("artifacts.yaml");
        fs::write(&yaml, "closed_issues:\n  - projectName: chromium\n    localId: \"9\"\n")
            .expect("write");
        let lookup = StaticLookup::from_path(&yaml).expect("yaml");
        assert_eq!(lookup.closed_issues, vec![ResolvedIssue::new("chromium", "9")]);

        let toml_path = tmp.path().join("artifacts.toml");
        fs::write(&toml_path, "[[users]]\nemail = \"b@example.com\"\n").expect("write");
        let lookup = StaticLookup::from_path(&toml_path).expect("toml");
        assert_eq!(lookup.users, vec![ResolvedUser { email: "b@example.com".to_string() }]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("artifacts.txt");
        fs::write(&path, "{}").expect("write");
        let err = StaticLookup::from_path(&path).expect_err("unsupported");
        assert!(err.to_string().contains("Unsupported artifacts extension"));
    }
}
