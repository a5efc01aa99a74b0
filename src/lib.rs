//! # Groundwork - Layered Stack Configuration for Provisioning
//!
//! Groundwork assembles the configuration a declarative provisioning run
//! starts from: built-in defaults, an external stack file, and environment
//! credentials, merged into one tree with predictable precedence. It also
//! carries the total type-coercion utility that turns loosely typed
//! configuration values into the types resource declarations expect.
//!
//! ## Core Concepts
//!
//! - **Configuration tree**: JSON/YAML-shaped [`ConfigValue`](value::ConfigValue)
//!   data with ordered mappings and date/decimal scalars
//! - **Sources**: keyed accessors ([`ConfigSource`](config::ConfigSource))
//!   the loader reads the external layer through
//! - **Loader**: defaults + stack configuration, deep-merged; never fails,
//!   degrades to defaults with a warning
//! - **Coercion**: total conversion against [`TypeDescriptor`](coerce::TypeDescriptor)s,
//!   where `None` is the only failure signal
//! - **Providers**: the aws/azure/gcp/openstack/kubernetes sections and
//!   their disabled-by-default blocks
//! - **Credentials**: per-provider bags resolved env-first, redacted
//!   everywhere they could leak
//!
//! ## Architecture Overview
//!
//! ```text
//!  built-in defaults ─────────────┐
//!                                 ▼
//!  stack.yaml ──► ConfigSource ──► deep_merge ──► StackConfig
//!                                                    │
//!                     ┌──────────────────────────────┤
//!                     ▼                              ▼
//!              coerce::convert                CredentialBag
//!              (typed values)              (env ≻ config, redacted)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use groundwork::prelude::*;
//!
//! let loader = ConfigLoader::new(FileSource::discover("stack.yaml"));
//! let config = loader.load_config();
//!
//! if config.provider_enabled(Provider::Aws) {
//!     let creds = CredentialBag::assemble(Provider::Aws, &config);
//!     creds.validate()?;
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and functions.

    // Configuration loading
    pub use crate::config::{
        deep_merge, load_defaults, ConfigLoader, ConfigSource, FileSource, MemorySource,
        SourceError, StackConfig,
    };

    // Value tree
    pub use crate::value::{ConfigValue, Mapping, Sequence};

    // Type coercion
    pub use crate::coerce::{convert, convert_map_types, PrimitiveKind, TypeDescriptor};

    // Providers and credentials
    pub use crate::credentials::{
        credential_fields, redact_tree, CredentialBag, CredentialField, CredentialSource,
        SecretString,
    };
    pub use crate::providers::Provider;

    // Naming helpers
    pub use crate::naming::{default_tags, merge_tags, resource_name, sanitize_name};

    // Error handling
    pub use crate::error::{Error, Result};
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases for Groundwork operations.
pub mod error;

/// The configuration value tree.
///
/// [`ConfigValue`](value::ConfigValue) is the loosely typed data every other
/// module operates on: scalars (including dates and decimals), sequences,
/// and insertion-ordered mappings.
pub mod value;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration loading, merging, and external sources.
///
/// The [`ConfigLoader`](config::ConfigLoader) layers an external stack
/// configuration over built-in defaults with [`deep_merge`](config::deep_merge);
/// loading never fails, it degrades.
pub mod config;

/// Total type coercion of configuration values.
///
/// [`convert`](coerce::convert) turns loosely typed values into declared
/// target types; `None` is the only failure signal.
pub mod coerce;

// ============================================================================
// Providers
// ============================================================================

/// The supported provider families and their default blocks.
pub mod providers;

/// Per-provider credential assembly and redaction.
///
/// Environment variables beat configuration values field by field; values
/// live in [`SecretString`](credentials::SecretString)s and never reach
/// logs or dumps.
pub mod credentials;

/// Resource naming conventions and tag merging.
pub mod naming;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of Groundwork.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns detailed version information including build metadata.
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        rust_version: option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown"),
        target: std::env::consts::ARCH,
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Detailed version information for the Groundwork build.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Semantic version string
    pub version: &'static str,
    /// Minimum Rust version required
    pub rust_version: &'static str,
    /// Target triple for the build
    pub target: &'static str,
    /// Build profile (debug or release)
    pub profile: &'static str,
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "groundwork {} ({}, {})",
            self.version, self.target, self.profile
        )
    }
}
