//! Batched reference resolution
//!
//! Before a page of comments is marked up, every reference that needs
//! confirming is pulled out of all comments at once and sent to the matching
//! lookup service in a single call per component.

pub mod fixture;

use crate::domain::{
    Comment, ExistingRefs, IssueRef, Reference, ResolvedIssue, ResolvedReferences, ResolvedUser,
};
use crate::error::{AutolinkError, LookupFailure, Result};
use crate::registry::{LookupKind, Registry};
use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub use fixture::StaticLookup;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLookupResponse {
    #[serde(default)]
    pub open_refs: Vec<ResolvedIssue>,
    #[serde(default)]
    pub closed_refs: Vec<ResolvedIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLookupResponse {
    #[serde(default)]
    pub users: Vec<ResolvedUser>,
}

/// Confirms which referenced issues exist, split by open/closed state.
#[async_trait]
pub trait IssueLookup: Send + Sync {
    async fn lookup_issues(
        &self,
        refs: &[IssueRef],
    ) -> std::result::Result<IssueLookupResponse, LookupFailure>;
}

/// Confirms which referenced email addresses belong to known users.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn lookup_users(
        &self,
        emails: &[String],
    ) -> std::result::Result<UserLookupResponse, LookupFailure>;
}

/// References found in a batch for one component, deduplicated and sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReferences {
    pub component: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupKind>,
    pub references: Vec<Reference>,
}

/// Extract every component's references from a batch of comments, in registry order.
pub fn collect_references(
    registry: &Registry,
    comments: &[Comment],
    default_project: Option<&str>,
) -> Vec<ComponentReferences> {
    registry
        .components()
        .iter()
        .map(|component| {
            let mut refs = BTreeSet::new();
            for comment in comments {
                refs.extend(component.extract_references(&comment.content, default_project));
            }
            ComponentReferences {
                component: component.key,
                lookup: component.lookup,
                references: refs.into_iter().collect(),
            }
        })
        .collect()
}

/// Resolves a batch's references through the injected lookup services.
#[derive(Clone)]
pub struct ReferenceResolver {
    registry: Arc<Registry>,
    issues: Arc<dyn IssueLookup>,
    users: Arc<dyn UserLookup>,
    max_total_length: usize,
}

impl ReferenceResolver {
    pub fn new(
        registry: Arc<Registry>,
        issues: Arc<dyn IssueLookup>,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self { registry, issues, users, max_total_length: usize::MAX }
    }

    /// Batches whose comments add up to more than `max` bytes are not autolinked.
    pub fn with_max_total_length(mut self, max: usize) -> Self {
        self.max_total_length = max;
        self
    }

    /// Look up everything the batch references: one call per component that has
    /// references, all issued concurrently, none for components without any.
    ///
    /// The first failing lookup fails the whole batch; nothing is retried.
    pub async fn get_referenced_artifacts(
        &self,
        comments: &[Comment],
        default_project: Option<&str>,
    ) -> Result<ResolvedReferences> {
        let total_len: usize = comments.iter().map(|c| c.content.len()).sum();
        if total_len > self.max_total_length {
            tracing::info!(
                "skipping autolinking: {} bytes of comments exceeds limit of {}",
                total_len,
                self.max_total_length
            );
            return Ok(ResolvedReferences::skip_autolinking());
        }

        let pending = collect_references(&self.registry, comments, default_project)
            .into_iter()
            .filter_map(|batch| {
                let kind = batch.lookup?;
                if batch.references.is_empty() {
                    return None;
                }
                Some(self.lookup(batch.component, kind, batch.references))
            });

        let mut resolved = ResolvedReferences::new();
        for (component, existing) in try_join_all(pending).await? {
            resolved.insert(component, existing);
        }
        Ok(resolved)
    }

    async fn lookup(
        &self,
        component: &'static str,
        kind: LookupKind,
        references: Vec<Reference>,
    ) -> Result<(&'static str, ExistingRefs)> {
        let failed = |source| AutolinkError::Lookup { component: component.to_string(), source };

        match kind {
            LookupKind::Issues => {
                let refs: Vec<IssueRef> = references
                    .into_iter()
                    .filter_map(|r| match r {
                        Reference::Issue(issue) => Some(issue),
                        _ => None,
                    })
                    .collect();
                tracing::debug!("looking up {} issue refs for {}", refs.len(), component);
                let response = self.issues.lookup_issues(&refs).await.map_err(failed)?;
                tracing::debug!(
                    "{}: {} open, {} closed",
                    component,
                    response.open_refs.len(),
                    response.closed_refs.len()
                );
                Ok((
                    component,
                    ExistingRefs::Issues {
                        open_refs: response.open_refs,
                        closed_refs: response.closed_refs,
                    },
                ))
            }
            LookupKind::Users => {
                let emails: Vec<String> = references
                    .into_iter()
                    .filter_map(|r| match r {
                        Reference::Email { email } => Some(email),
                        _ => None,
                    })
                    .collect();
                tracing::debug!("looking up {} emails for {}", emails.len(), component);
                let response = self.users.lookup_users(&emails).await.map_err(failed)?;
                Ok((component, ExistingRefs::Users { users: response.users }))
            }
        }
    }
}
