//! Recognition patterns
//!
//! ORDER MATTERS within a component: full scheme URLs are tried before
//! shorthand hosts and implied domains, so `https://website.net/who/me` is a
//! single link and never a `who/me` shorthand inside a URL.
//!
//! Patterns that must not fire inside a larger dotted or slashed token carry a
//! one-character negative lookbehind, which is why these are `fancy_regex`
//! rather than plain `regex` patterns.

use crate::error::{AutolinkError, Result};
use fancy_regex::{Captures, Regex};
use once_cell::sync::Lazy;

/// Schemes linkified as-is. Anything else gets a default scheme prepended.
pub const LINKIFY_SCHEMES: &str = r"https?://|ftp://|mailto:";

pub(crate) const CRBUG_ISSUE_RE: &str = r"(?i)\b(?:https?://)?crbug\.com/(?:(?P<project>[-a-z0-9]+)/)?(?P<local_id>\d+)\b(?P<anchor>#c[0-9]+)?";

/// `issue 12`, `bugs = 1, proj:2 and #3`. A separator after the keyword is
/// required so `bug123` and `bug-123` stay plain.
pub(crate) const TRACKER_ISSUE_RE: &str = r"(?i)(?<![-/._:])\b(?P<prefix>(?:issues?|bugs?)(?:[ \t]*[:=][ \t]*|[ \t]+))(?:(?:[-a-z0-9]+[:#])?#?\d+\b(?:[ \t]*(?:,|\band\b|\bor\b)?[ \t]*))+";

pub(crate) const EMAIL_RE: &str = r"(?i)(?<![-/._:+])\b[a-z](?:[-.]?[a-z0-9])+@[a-z](?:[-.]?[a-z0-9])+\.(?:com|net|org|edu)\b";

pub(crate) const FULL_URL_RE: &str = r"(?i)\b(?:https?://|ftp://|mailto:)[^\s<]+";

pub(crate) const IMPLIED_URL_RE: &str = r"(?i)(?<![-/._])\b[a-z](?:[-.]?[a-z0-9])+\.(?:com|net|org|edu)\b(?:/[^\s<]*)?";

pub(crate) const GIT_HASH_RE: &str = r"(?i)\b(?P<prefix>r(?:evision\s+#?)?)?(?P<revnum>[a-f0-9]{40})\b";

/// SVN revisions and git commit positions; the `r`/`revision` prefix is required.
pub(crate) const SVN_REVISION_RE: &str = r"(?i)\b(?P<prefix>r(?:evision\s+#?)?)(?P<revnum>[0-9]{4,7})\b";

pub(crate) const COMMENT_REF_RE: &str = r"(?i)\bcomment\s*[:=]?\s*#?(?P<number>\d+)\b|(?<![\w#])#c(?P<anchor_number>\d+)\b";

/// A scheme that starts a full URL token.
static URL_SCHEME_RE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"(?i)\b(?:https?://|ftp://|mailto:)").expect("valid url scheme regex")
});

/// True when `start` falls inside a whitespace-delimited token that a full
/// URL match would cover, e.g. the email in `https://x.com/?u=bob@example.com`.
pub(crate) fn inside_url(text: &str, start: usize) -> bool {
    let token = text[..start].rsplit(|c: char| c.is_whitespace() || c == '<').next().unwrap_or("");
    URL_SCHEME_RE.is_match(token)
}

/// What a pattern's matches turn into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternRole {
    /// `crbug.com/<project>/<id>`; always resolved against project `chromium` when unnamed.
    CrbugIssue,
    /// Keyword-prefixed issue lists resolved against the caller's default project.
    TrackerIssue,
    Email,
    /// A URL-like token; `default_scheme` is prepended when the text has none.
    Url { default_scheme: &'static str },
    Revision { url_format: String },
    CommentRef,
}

impl PatternRole {
    /// Roles tried before the link component; they must leave URL tokens whole.
    fn yields_to_urls(&self) -> bool {
        matches!(self, PatternRole::TrackerIssue | PatternRole::Email)
    }
}

/// One compiled recognition rule.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: &'static str,
    pub role: PatternRole,
    regex: Regex,
}

impl Pattern {
    pub fn new(name: &'static str, source: &str, role: PatternRole) -> Result<Self> {
        let regex = Regex::new(source)
            .map_err(|e| AutolinkError::Pattern { name, source: Box::new(e) })?;
        Ok(Self { name, role, regex })
    }

    /// All non-overlapping matches in `text`, left to right.
    ///
    /// A fresh iterator is built per call, so no match state survives between
    /// calls. If the backtracking engine gives up part way through, the
    /// remaining text is left unmatched. Issue and email matches inside a
    /// URL token are dropped so the URL is linked as a whole.
    pub fn captures<'t>(&self, text: &'t str) -> Vec<Captures<'t>> {
        let mut found = Vec::new();
        for caps in self.regex.captures_iter(text) {
            match caps {
                Ok(caps) => {
                    let in_url = self.role.yields_to_urls()
                        && caps.get(0).is_some_and(|m| inside_url(text, m.start()));
                    if !in_url {
                        found.push(caps);
                    }
                }
                Err(e) => {
                    tracing::warn!("pattern '{}' stopped matching: {}", self.name, e);
                    break;
                }
            }
        }
        found
    }
}

/// Join host names into an alternation, longest first so `go` wins over `g`.
fn host_alternation(hosts: &[String]) -> String {
    let mut hosts: Vec<&str> = hosts.iter().map(String::as_str).collect();
    hosts.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    hosts.dedup();
    hosts.iter().map(|h| regex::escape(h)).collect::<Vec<_>>().join("|")
}

/// `go/anything`; `None` when no hosts are configured.
pub(crate) fn short_link_re(hosts: &[String]) -> Option<String> {
    if hosts.is_empty() {
        return None;
    }
    Some(format!(
        r"(?i)(?<![-/._])\b(?:{})?(?:{})/[^\s<]+",
        LINKIFY_SCHEMES,
        host_alternation(hosts)
    ))
}

/// `b/1234`; digits only after the host.
pub(crate) fn numeric_short_link_re(hosts: &[String]) -> Option<String> {
    if hosts.is_empty() {
        return None;
    }
    Some(format!(
        r"(?i)(?<![-/._])\b(?:{})?(?:{})/[0-9]+",
        LINKIFY_SCHEMES,
        host_alternation(hosts)
    ))
}
