//! URL, email, revision and comment replacements

use crate::domain::{ExistingRefs, TextRun};
use fancy_regex::Captures;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters allowed inside links but trimmed from the end, tried in this
/// order. A closer is only trimmed when its opener is absent from the rest of
/// the link, so `http://example.com/foo(bar)` keeps its parenthesis.
const LINK_TRAILING_CHARS: [(Option<char>, char); 9] = [
    (None, ':'),
    (None, '.'),
    (None, ','),
    (Some('<'), '>'),
    (Some('\''), '\''),
    (Some('"'), '"'),
    (Some('('), ')'),
    (Some('['), ']'),
    (Some('{'), '}'),
];

/// A closing HTML tag glued to the end of a link, e.g. `go/x</b>`.
static CLOSING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</[a-z0-9]+>$").expect("valid closing tag regex"));

const KNOWN_SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "mailto:"];

/// Split a matched link into the part to link and the trailing text to leave plain.
pub(crate) fn split_trailing(matched: &str) -> (&str, &str) {
    let mut hyperlink = matched;
    for (open, close) in LINK_TRAILING_CHARS {
        if let Some(rest) = hyperlink.strip_suffix(close) {
            if open.map_or(true, |o| !rest.contains(o)) {
                hyperlink = rest;
            }
        }
    }
    if let Some(tag) = CLOSING_TAG_RE.find(hyperlink) {
        hyperlink = &hyperlink[..tag.start()];
    }
    (hyperlink, &matched[hyperlink.len()..])
}

fn has_known_scheme(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    KNOWN_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

pub(crate) fn build_url_runs(caps: &Captures<'_>, default_scheme: &str) -> Vec<TextRun> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    let (hyperlink, trailing) = split_trailing(whole.as_str());
    if hyperlink.is_empty() {
        return vec![TextRun::plain(whole.as_str())];
    }

    let href = if has_known_scheme(hyperlink) {
        hyperlink.to_string()
    } else {
        format!("{default_scheme}{hyperlink}")
    };

    let mut runs = vec![TextRun::link(hyperlink, href)];
    if !trailing.is_empty() {
        runs.push(TextRun::plain(trailing));
    }
    runs
}

/// Known users link to their profile page; anyone else gets a `mailto:`.
pub(crate) fn build_email_runs(caps: &Captures<'_>, existing: Option<&ExistingRefs>) -> Vec<TextRun> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    let email = whole.as_str();
    let known = match existing {
        Some(ExistingRefs::Users { users }) => {
            users.iter().any(|user| user.email.eq_ignore_ascii_case(email))
        }
        _ => false,
    };
    let href = if known { format!("/u/{email}") } else { format!("mailto:{email}") };
    vec![TextRun::link(email, href)]
}

pub(crate) fn revision_number<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("revnum").map(|m| m.as_str())
}

/// Revisions are linked without checking that they exist.
pub(crate) fn build_revision_runs(caps: &Captures<'_>, url_format: &str) -> Vec<TextRun> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    match revision_number(caps) {
        Some(revnum) => {
            vec![TextRun::link(whole.as_str(), url_format.replace("{revnum}", revnum))]
        }
        None => vec![TextRun::plain(whole.as_str())],
    }
}

pub(crate) fn comment_number<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("number").or_else(|| caps.name("anchor_number")).map(|m| m.as_str())
}

pub(crate) fn build_comment_runs(caps: &Captures<'_>) -> Vec<TextRun> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    match comment_number(caps) {
        Some(number) => vec![TextRun::link(whole.as_str(), format!("#c{number}"))],
        None => vec![TextRun::plain(whole.as_str())],
    }
}
