//! Library error type

use thiserror::Error;

/// Boxed error returned by lookup service implementations.
pub type LookupFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum AutolinkError {
    /// A batched lookup for one component failed. Never retried here.
    #[error("reference lookup for component '{component}' failed")]
    Lookup {
        component: String,
        #[source]
        source: LookupFailure,
    },

    /// A recognition pattern (usually built from configured host names) did not compile.
    #[error("invalid autolink pattern '{name}'")]
    Pattern {
        name: &'static str,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

pub type Result<T> = std::result::Result<T, AutolinkError>;
