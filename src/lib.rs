//! text-autolink: turn references in free-form comment text into links
//!
//! Comments are scanned for tracker issue references, email addresses, URLs,
//! short links and revision numbers. References that need confirming are
//! resolved in one batch per page, then each comment is marked up as a list of
//! typed [`TextRun`]s ready for a renderer.

pub mod chunk;
pub mod compose;
pub mod config;
pub mod domain;
pub mod error;
pub mod registry;
pub mod render;
pub mod resolve;

pub use compose::{markup_autolinks, Autolinker};
pub use domain::{
    Comment, Config, ExistingRefs, IssueRef, Reference, ResolvedIssue, ResolvedReferences,
    ResolvedUser, TextRun,
};
pub use error::{AutolinkError, Result};
pub use registry::Registry;
pub use resolve::{IssueLookup, ReferenceResolver, StaticLookup, UserLookup};
