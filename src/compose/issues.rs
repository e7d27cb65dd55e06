//! Issue reference extraction and replacement

use crate::domain::{ExistingRefs, IssueRef, ResolvedIssue, TextRun, STRIKE_THROUGH};
use crate::registry::patterns::PatternRole;
use fancy_regex::Captures;
use once_cell::sync::Lazy;
use regex::Regex;

/// Project used for `crbug.com/<id>` links that name no project.
pub const CRBUG_DEFAULT_PROJECT: &str = "chromium";

/// Picks the individual `project:id` items out of a tracker match, after its keyword prefix.
static SINGLE_ISSUE_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:(?P<project>[-a-z0-9]+)[:#])?#?(?P<local_id>\d+)\b")
        .expect("valid single issue regex")
});

/// One issue reference located inside a match.
struct IssueSpan<'t> {
    start: usize,
    end: usize,
    content: &'t str,
    /// `None` when neither the text nor the caller supplied a project.
    project: Option<String>,
    local_id: &'t str,
    anchor: &'t str,
}

/// Break a match into issue spans plus the byte offset where spans begin.
fn issue_spans<'t>(
    role: &PatternRole,
    caps: &Captures<'t>,
    default_project: Option<&str>,
) -> (usize, Vec<IssueSpan<'t>>) {
    let Some(whole) = caps.get(0) else {
        return (0, Vec::new());
    };
    let text = whole.as_str();

    match role {
        PatternRole::CrbugIssue => {
            let Some(local_id) = caps.name("local_id") else {
                return (0, Vec::new());
            };
            let project = caps
                .name("project")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| CRBUG_DEFAULT_PROJECT.to_string());
            let span = IssueSpan {
                start: 0,
                end: text.len(),
                content: text,
                project: Some(project),
                local_id: local_id.as_str(),
                anchor: caps.name("anchor").map(|m| m.as_str()).unwrap_or(""),
            };
            (0, vec![span])
        }
        PatternRole::TrackerIssue => {
            let prefix_len = caps.name("prefix").map(|m| m.end() - whole.start()).unwrap_or(0);
            let items = &text[prefix_len..];
            // A project named in the text carries over to the numbers after it.
            let mut current_project = default_project.map(str::to_string);
            let mut spans = Vec::new();
            for item in SINGLE_ISSUE_REF_RE.captures_iter(items) {
                let (Some(m), Some(local_id)) = (item.get(0), item.name("local_id")) else {
                    continue;
                };
                if let Some(project) = item.name("project") {
                    current_project = Some(project.as_str().to_string());
                }
                spans.push(IssueSpan {
                    start: prefix_len + m.start(),
                    end: prefix_len + m.end(),
                    content: m.as_str(),
                    project: current_project.clone(),
                    local_id: local_id.as_str(),
                    anchor: "",
                });
            }
            (prefix_len, spans)
        }
        _ => (0, Vec::new()),
    }
}

pub(crate) fn extract_issue_refs(
    role: &PatternRole,
    caps: &Captures<'_>,
    default_project: Option<&str>,
) -> Vec<IssueRef> {
    let (_, spans) = issue_spans(role, caps, default_project);
    spans
        .into_iter()
        .filter_map(|span| {
            let project = span.project?;
            tracing::debug!("issue ref = {}:{}", project, span.local_id);
            Some(IssueRef::new(project, span.local_id))
        })
        .collect()
}

pub(crate) fn build_issue_runs(
    role: &PatternRole,
    caps: &Captures<'_>,
    existing: Option<&ExistingRefs>,
    default_project: Option<&str>,
) -> Vec<TextRun> {
    let Some(whole) = caps.get(0) else {
        return Vec::new();
    };
    let text = whole.as_str();
    let (prefix_len, spans) = issue_spans(role, caps, default_project);
    if spans.is_empty() {
        return vec![TextRun::plain(text)];
    }

    let (open_refs, closed_refs): (&[ResolvedIssue], &[ResolvedIssue]) = match existing {
        Some(ExistingRefs::Issues { open_refs, closed_refs }) => (open_refs, closed_refs),
        _ => (&[], &[]),
    };

    let mut runs = Vec::new();
    if prefix_len > 0 {
        runs.push(TextRun::plain(&text[..prefix_len]));
    }
    let mut pos = prefix_len;
    for span in spans {
        if span.start > pos {
            runs.push(TextRun::plain(&text[pos..span.start]));
        }
        runs.push(replace_single_issue(&span, open_refs, closed_refs));
        pos = span.end;
    }
    if pos < text.len() {
        runs.push(TextRun::plain(&text[pos..]));
    }
    runs
}

/// Link to an issue only when the lookup confirmed it; otherwise keep the text.
fn replace_single_issue(
    span: &IssueSpan<'_>,
    open_refs: &[ResolvedIssue],
    closed_refs: &[ResolvedIssue],
) -> TextRun {
    let Some(project) = span.project.as_deref() else {
        return TextRun::plain(span.content);
    };

    let open = open_refs
        .iter()
        .find(|issue| issue.project_name == project && same_local_id(&issue.local_id, span.local_id));
    let (issue, is_closed) = match open {
        Some(issue) => (issue, false),
        None => match closed_refs.iter().find(|issue| {
            issue.project_name.eq_ignore_ascii_case(project)
                && same_local_id(&issue.local_id, span.local_id)
        }) {
            Some(issue) => (issue, true),
            None => return TextRun::plain(span.content),
        },
    };

    TextRun::Link {
        content: span.content.to_string(),
        href: format!("/p/{}/issues/detail?id={}{}", project, span.local_id, span.anchor),
        css: is_closed.then(|| STRIKE_THROUGH.to_string()),
        title: issue.summary.clone(),
    }
}

/// Local ids are numbers written as text; `0123` and `123` name the same issue.
fn same_local_id(a: &str, b: &str) -> bool {
    a.trim_start_matches('0') == b.trim_start_matches('0')
}
