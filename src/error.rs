//! Error types for Groundwork.
//!
//! Loading and coercion are deliberately total: the loader degrades to
//! defaults and the coercion utility signals failure as absence. The
//! variants here cover the remaining surfaces that do fail hard, such as
//! strict source reads and credential validation.

use thiserror::Error;

use crate::config::SourceError;
use crate::providers::Provider;

/// Result type alias for Groundwork operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Groundwork.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// A configuration source failed during a strict read.
    #[error("Configuration source error: {0}")]
    Source(#[from] SourceError),

    // ========================================================================
    // Provider Errors
    // ========================================================================
    /// Provider name not recognized.
    #[error("Unknown provider '{0}' (expected one of: aws, azure, gcp, openstack, kubernetes)")]
    UnknownProvider(String),

    /// Required credential fields could not be resolved.
    #[error("Missing required credentials for provider '{provider}': {}", .fields.join(", "))]
    MissingCredentials {
        /// Provider the credentials were assembled for
        provider: Provider,
        /// Names of the unresolved required fields
        fields: Vec<&'static str>,
    },

    // ========================================================================
    // Type Errors
    // ========================================================================
    /// Type name not recognized by the coercion utility.
    #[error("Unknown type name '{0}'")]
    UnknownType(String),
}

impl Error {
    /// Creates a new missing credentials error.
    pub fn missing_credentials(provider: Provider, fields: Vec<&'static str>) -> Self {
        Self::MissingCredentials { provider, fields }
    }
}
