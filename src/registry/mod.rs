//! Link component registry
//!
//! ORDER MATTERS: components are applied first to last, and a span claimed by
//! an earlier component is never re-scanned. `crbug.com/123` must be seen by
//! the crbug component before the generic link component can treat it as an
//! implied `.com` domain.

pub mod patterns;

use crate::domain::Config;
use crate::error::Result;
use serde::Serialize;
use patterns::{
    numeric_short_link_re, short_link_re, Pattern, PatternRole, COMMENT_REF_RE, CRBUG_ISSUE_RE,
    EMAIL_RE, FULL_URL_RE, GIT_HASH_RE, IMPLIED_URL_RE, SVN_REVISION_RE, TRACKER_ISSUE_RE,
};

pub const TRACKER_CRBUG: &str = "tracker-crbug";
pub const TRACKER_REGULAR: &str = "tracker-regular";
pub const USER_EMAILS: &str = "user-emails";
pub const LINKS: &str = "links";
pub const VERSION_CONTROL: &str = "versioncontrol";
pub const COMMENT_REFS: &str = "comment-refs";

/// Which external service confirms a component's references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Issues,
    Users,
}

/// One category of inline reference: its patterns, in the order they are tried.
#[derive(Debug, Clone)]
pub struct LinkComponent {
    pub key: &'static str,
    pub lookup: Option<LookupKind>,
    pub patterns: Vec<Pattern>,
}

impl LinkComponent {
    fn new(key: &'static str, lookup: Option<LookupKind>, patterns: Vec<Pattern>) -> Self {
        Self { key, lookup, patterns }
    }
}

/// The ordered, immutable set of link components.
///
/// Built once at startup and shared read-only (it is `Send + Sync`).
#[derive(Debug, Clone)]
pub struct Registry {
    components: Vec<LinkComponent>,
}

impl Registry {
    pub fn from_config(config: &Config) -> Result<Self> {
        let crbug = LinkComponent::new(
            TRACKER_CRBUG,
            Some(LookupKind::Issues),
            vec![Pattern::new("crbug_issue", CRBUG_ISSUE_RE, PatternRole::CrbugIssue)?],
        );

        let tracker = LinkComponent::new(
            TRACKER_REGULAR,
            Some(LookupKind::Issues),
            vec![Pattern::new("tracker_issue", TRACKER_ISSUE_RE, PatternRole::TrackerIssue)?],
        );

        let emails = LinkComponent::new(
            USER_EMAILS,
            Some(LookupKind::Users),
            vec![Pattern::new("email", EMAIL_RE, PatternRole::Email)?],
        );

        let mut link_patterns = vec![Pattern::new(
            "full_url",
            FULL_URL_RE,
            PatternRole::Url { default_scheme: "https://" },
        )?];
        if let Some(source) = short_link_re(&config.shorthand_hosts) {
            link_patterns.push(Pattern::new(
                "short_link",
                &source,
                PatternRole::Url { default_scheme: "http://" },
            )?);
        }
        if let Some(source) = numeric_short_link_re(&config.numeric_shorthand_hosts) {
            link_patterns.push(Pattern::new(
                "numeric_short_link",
                &source,
                PatternRole::Url { default_scheme: "http://" },
            )?);
        }
        link_patterns.push(Pattern::new(
            "implied_url",
            IMPLIED_URL_RE,
            PatternRole::Url { default_scheme: "https://" },
        )?);
        let links = LinkComponent::new(LINKS, None, link_patterns);

        let revision_role = PatternRole::Revision { url_format: config.revision_url_format.clone() };
        let version_control = LinkComponent::new(
            VERSION_CONTROL,
            None,
            vec![
                Pattern::new("git_hash", GIT_HASH_RE, revision_role.clone())?,
                Pattern::new("svn_revision", SVN_REVISION_RE, revision_role)?,
            ],
        );

        let comments = LinkComponent::new(
            COMMENT_REFS,
            None,
            vec![Pattern::new("comment_ref", COMMENT_REF_RE, PatternRole::CommentRef)?],
        );

        Ok(Self { components: vec![crbug, tracker, emails, links, version_control, comments] })
    }

    /// The registry for the default configuration.
    pub fn standard() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    pub fn components(&self) -> &[LinkComponent] {
        &self.components
    }

    pub fn get(&self, key: &str) -> Option<&LinkComponent> {
        self.components.iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_is_ordered() {
        let registry = Registry::standard().expect("registry");
        let keys: Vec<&str> = registry.components().iter().map(|c| c.key).collect();
        assert_eq!(
            keys,
            vec![TRACKER_CRBUG, TRACKER_REGULAR, USER_EMAILS, LINKS, VERSION_CONTROL, COMMENT_REFS]
        );
    }

    #[test]
    fn only_issue_and_email_components_need_lookups() {
        let registry = Registry::standard().expect("registry");
        let with_lookup: Vec<(&str, LookupKind)> = registry
            .components()
            .iter()
            .filter_map(|c| c.lookup.map(|kind| (c.key, kind)))
            .collect();
        assert_eq!(
            with_lookup,
            vec![
                (TRACKER_CRBUG, LookupKind::Issues),
                (TRACKER_REGULAR, LookupKind::Issues),
                (USER_EMAILS, LookupKind::Users),
            ]
        );
    }

    #[test]
    fn link_patterns_try_full_urls_first() {
        let registry = Registry::standard().expect("registry");
        let names: Vec<&str> =
            registry.get(LINKS).expect("links").patterns.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["full_url", "short_link", "numeric_short_link", "implied_url"]);
    }

    #[test]
    fn empty_host_lists_drop_shorthand_patterns() {
        let config = Config {
            shorthand_hosts: Vec::new(),
            numeric_shorthand_hosts: Vec::new(),
            ..Config::default()
        };
        let registry = Registry::from_config(&config).expect("registry");
        let names: Vec<&str> =
            registry.get(LINKS).expect("links").patterns.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["full_url", "implied_url"]);
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
