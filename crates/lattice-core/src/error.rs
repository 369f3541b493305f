//! Error type shared by every generator, kernel and config entry point.

use thiserror::Error;

/// Errors raised while constructing or querying a generator tree.
///
/// Every variant is a usage error; nothing here is transient, so callers
/// should fix the tree or the query rather than retry.
#[derive(Debug, Error)]
pub enum NoiseError {
    /// A constructor or query argument is outside its valid domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: String,
    },

    /// A seed-relative generator was queried without any seed fixed above it.
    #[error(
        "attempted to derive a seed that was never provided; \
         fix one with `with_seed` on this generator or on one containing it"
    )]
    MissingSeed,

    /// A JSON generator description could not be parsed.
    #[error("malformed generator config: {0}")]
    Config(#[from] serde_json::Error),
}

impl NoiseError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { name, reason: reason.into() }
    }
}

/// Crate-wide result alias.
pub type Result<T, E = NoiseError> = std::result::Result<T, E>;
