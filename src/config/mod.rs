//! Layered stack configuration.
//!
//! Configuration is assembled from two layers: the built-in defaults
//! ([`load_defaults`]) and the external stack configuration read through a
//! [`ConfigSource`]. The external layer wins key-by-key under the deep-merge
//! rule in [`merge`]. Loading never fails: a missing or malformed stack
//! source degrades to the defaults with a warning, so a bare `groundwork`
//! checkout always has a usable configuration.

pub mod defaults;
pub mod merge;
pub mod source;

pub use defaults::load_defaults;
pub use merge::deep_merge;
pub use source::{ConfigSource, FileSource, MemorySource, SourceError};

use tracing::{debug, warn};

use crate::coerce::{convert, TypeDescriptor};
use crate::providers::Provider;
use crate::value::{ConfigValue, Mapping};

/// Sections probed individually when a source cannot produce a whole tree.
pub const SECTIONS: [&str; 6] = [
    "project",
    "logging",
    "aws",
    "azure",
    "kubernetes",
    "providers",
];

// ============================================================================
// Loader
// ============================================================================

/// Assembles the merged configuration from defaults and an injected source.
///
/// The loader holds no state beyond the source; every [`load`](Self::load)
/// reflects the source's contents at call time.
pub struct ConfigLoader<S> {
    source: S,
}

impl<S: ConfigSource> ConfigLoader<S> {
    /// Creates a loader over the given source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The source this loader reads from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reads the external configuration layer.
    ///
    /// The root object is used verbatim when the source can produce one.
    /// When the root is absent, each section in [`SECTIONS`] is probed
    /// individually; sections that error are logged and skipped. A root
    /// read error is logged and yields the empty tree. Never fails.
    pub fn load_stack_config(&self) -> ConfigValue {
        match self.source.get_object("") {
            Ok(Some(tree)) => {
                debug!(origin = %self.source.origin(), "loaded stack configuration root");
                tree
            }
            Ok(None) => self.load_sections(),
            Err(err) => {
                warn!(
                    origin = %self.source.origin(),
                    error = %err,
                    "unable to read stack configuration, continuing with defaults"
                );
                ConfigValue::Mapping(Mapping::new())
            }
        }
    }

    fn load_sections(&self) -> ConfigValue {
        let mut tree = Mapping::new();
        for section in SECTIONS {
            match self.source.get_object(section) {
                Ok(Some(value)) => {
                    tree.insert(ConfigValue::from(section), value);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(section, error = %err, "skipping unreadable configuration section");
                }
            }
        }
        debug!(sections = tree.len(), "assembled stack configuration from sections");
        ConfigValue::Mapping(tree)
    }

    /// Produces the merged configuration tree.
    ///
    /// Equivalent to deep-merging [`load_defaults`] with
    /// [`load_stack_config`](Self::load_stack_config). Never fails; with an
    /// empty or broken source this is exactly the defaults.
    pub fn load(&self) -> ConfigValue {
        deep_merge(&load_defaults(), &self.load_stack_config())
    }

    /// Loads and wraps the merged tree in a [`StackConfig`].
    pub fn load_config(&self) -> StackConfig {
        StackConfig::new(self.load())
    }
}

// ============================================================================
// Merged configuration
// ============================================================================

/// A merged configuration tree with typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct StackConfig {
    tree: ConfigValue,
}

impl StackConfig {
    /// Wraps an already-merged tree.
    pub fn new(tree: ConfigValue) -> Self {
        Self { tree }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &ConfigValue {
        &self.tree
    }

    /// Consumes the wrapper, returning the tree.
    pub fn into_tree(self) -> ConfigValue {
        self.tree
    }

    /// Looks up a top-level key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.tree.get(key)
    }

    /// Looks up a dotted path, e.g. `"aws.region"`.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        self.tree.get_path(path)
    }

    /// The configured project name.
    pub fn project_name(&self) -> &str {
        self.get_path("project.name")
            .and_then(ConfigValue::as_str)
            .unwrap_or("unnamed")
    }

    /// The configured environment, e.g. `dev` or `prod`.
    pub fn environment(&self) -> &str {
        self.get_path("project.environment")
            .and_then(ConfigValue::as_str)
            .unwrap_or("dev")
    }

    /// The configured log level name.
    pub fn log_level(&self) -> &str {
        self.get_path("logging.level")
            .and_then(ConfigValue::as_str)
            .unwrap_or("info")
    }

    /// The configured log output format, `pretty` or `json`.
    pub fn log_format(&self) -> &str {
        self.get_path("logging.format")
            .and_then(ConfigValue::as_str)
            .unwrap_or("pretty")
    }

    /// A top-level section as a mapping, if present and mapping-shaped.
    pub fn section(&self, name: &str) -> Option<&Mapping> {
        self.get(name).and_then(ConfigValue::as_mapping)
    }

    /// A provider's configuration section.
    pub fn provider_block(&self, provider: Provider) -> Option<&Mapping> {
        self.section(provider.key())
    }

    /// Whether a provider is enabled.
    ///
    /// Reads `<provider>.enabled` through boolean coercion, so `"yes"` and
    /// `1` count. Absent or uncoercible means disabled.
    pub fn provider_enabled(&self, provider: Provider) -> bool {
        self.get_path(&format!("{}.enabled", provider.key()))
            .and_then(|value| convert(value, &TypeDescriptor::boolean()))
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

impl Default for StackConfig {
    /// The defaults-only configuration, as if no stack file existed.
    fn default() -> Self {
        Self::new(load_defaults())
    }
}
