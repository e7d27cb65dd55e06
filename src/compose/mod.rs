//! Run composition
//!
//! Applies every registered pattern, in registry order, to the plain chunks
//! of one piece of text. Runs produced by a replacement are claimed: later
//! patterns only ever see the leftover text between earlier matches.

mod issues;
mod links;

pub use issues::CRBUG_DEFAULT_PROJECT;

use crate::chunk::split_chunks;
use crate::domain::{Config, ExistingRefs, Reference, ResolvedReferences, TextRun};
use crate::error::Result;
use crate::registry::patterns::{Pattern, PatternRole};
use crate::registry::{LinkComponent, Registry};
use fancy_regex::Captures;
use std::sync::Arc;

impl Pattern {
    /// Structured references named by one match.
    pub fn extract_references(
        &self,
        caps: &Captures<'_>,
        default_project: Option<&str>,
    ) -> Vec<Reference> {
        match &self.role {
            PatternRole::CrbugIssue | PatternRole::TrackerIssue => {
                issues::extract_issue_refs(&self.role, caps, default_project)
                    .into_iter()
                    .map(Reference::Issue)
                    .collect()
            }
            PatternRole::Email => caps
                .get(0)
                .map(|m| Reference::Email { email: m.as_str().to_string() })
                .into_iter()
                .collect(),
            PatternRole::Url { .. } => Vec::new(),
            PatternRole::Revision { .. } => links::revision_number(caps)
                .map(|revnum| Reference::Revision { revnum: revnum.to_string() })
                .into_iter()
                .collect(),
            PatternRole::CommentRef => links::comment_number(caps)
                .map(|number| Reference::Comment { number: number.to_string() })
                .into_iter()
                .collect(),
        }
    }

    /// Runs replacing one match. Their contents always concatenate back to the matched text.
    pub fn build_runs(
        &self,
        caps: &Captures<'_>,
        existing: Option<&ExistingRefs>,
        default_project: Option<&str>,
    ) -> Vec<TextRun> {
        match &self.role {
            PatternRole::CrbugIssue | PatternRole::TrackerIssue => {
                issues::build_issue_runs(&self.role, caps, existing, default_project)
            }
            PatternRole::Email => links::build_email_runs(caps, existing),
            PatternRole::Url { default_scheme } => links::build_url_runs(caps, default_scheme),
            PatternRole::Revision { url_format } => links::build_revision_runs(caps, url_format),
            PatternRole::CommentRef => links::build_comment_runs(caps),
        }
    }
}

impl LinkComponent {
    /// Every reference any of this component's patterns finds in `text`.
    pub fn extract_references(&self, text: &str, default_project: Option<&str>) -> Vec<Reference> {
        let mut refs = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.captures(text) {
                refs.extend(pattern.extract_references(&caps, default_project));
            }
        }
        refs
    }
}

/// A run under construction, remembering whether a replacement produced it.
struct WorkingRun {
    run: TextRun,
    claimed: bool,
}

impl WorkingRun {
    fn open(content: &str) -> Self {
        Self { run: TextRun::plain(content), claimed: false }
    }
}

/// Scan every unclaimed plain run for `pattern` and splice in its replacements.
fn apply_pattern(
    runs: Vec<WorkingRun>,
    pattern: &Pattern,
    existing: Option<&ExistingRefs>,
    default_project: Option<&str>,
) -> Vec<WorkingRun> {
    let mut result = Vec::with_capacity(runs.len());
    for working in runs {
        if working.claimed || !working.run.is_plain() {
            result.push(working);
            continue;
        }

        let content = working.run.content();
        let mut pos = 0usize;
        for caps in pattern.captures(content) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > pos {
                result.push(WorkingRun::open(&content[pos..whole.start()]));
            }
            result.extend(
                pattern
                    .build_runs(&caps, existing, default_project)
                    .into_iter()
                    .map(|run| WorkingRun { run, claimed: true }),
            );
            pos = whole.end();
        }

        if pos == 0 {
            result.push(working);
        } else if pos < content.len() {
            result.push(WorkingRun::open(&content[pos..]));
        }
    }
    result
}

/// Turn `text` into runs using references resolved earlier for its batch.
///
/// Pure and synchronous: the same inputs always give the same runs.
pub fn markup_autolinks(
    registry: &Registry,
    text: &str,
    resolved: &ResolvedReferences,
    default_project: Option<&str>,
) -> Vec<TextRun> {
    let chunks = split_chunks(text);
    if resolved.is_skipped() {
        return chunks;
    }

    let mut runs = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if !chunk.is_plain() {
            runs.push(chunk);
            continue;
        }

        let mut working = vec![WorkingRun { run: chunk, claimed: false }];
        for component in registry.components() {
            let existing = resolved.get(component.key);
            for pattern in &component.patterns {
                working = apply_pattern(working, pattern, existing, default_project);
            }
        }
        runs.extend(working.into_iter().map(|w| w.run));
    }
    runs
}

/// The autolink engine: an immutable registry plus the caller's default project.
///
/// Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Autolinker {
    registry: Arc<Registry>,
    default_project: Option<String>,
}

impl Autolinker {
    pub fn new(registry: Registry) -> Self {
        Self { registry: Arc::new(registry), default_project: None }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut autolinker = Self::new(Registry::from_config(config)?);
        autolinker.default_project = config.default_project.clone();
        Ok(autolinker)
    }

    pub fn with_default_project(mut self, project: impl Into<String>) -> Self {
        self.default_project = Some(project.into());
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn default_project(&self) -> Option<&str> {
        self.default_project.as_deref()
    }

    pub fn markup(&self, text: &str, resolved: &ResolvedReferences) -> Vec<TextRun> {
        markup_autolinks(&self.registry, text, resolved, self.default_project.as_deref())
    }
}
