//! Provider credential assembly.
//!
//! Credentials are assembled per provider from two places: environment
//! variables first, the provider's configuration block second. Every value
//! lands in a [`SecretString`] on the way in, and diagnostics mention field
//! names only, never values.

mod secret;

pub use secret::SecretString;

use std::env;
use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::StackConfig;
use crate::error::{Error, Result};
use crate::providers::Provider;
use crate::value::{ConfigValue, Mapping};

/// Replacement text for redacted values.
pub const REDACTED: &str = "[REDACTED]";

// ============================================================================
// Field tables
// ============================================================================

/// One named credential slot for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField {
    /// Field name inside the provider's configuration block.
    pub name: &'static str,
    /// Environment variable that overrides the configuration value.
    pub env_var: &'static str,
    /// Whether validation fails when this field is unresolved.
    pub required: bool,
}

impl CredentialField {
    const fn required(name: &'static str, env_var: &'static str) -> Self {
        Self {
            name,
            env_var,
            required: true,
        }
    }

    const fn optional(name: &'static str, env_var: &'static str) -> Self {
        Self {
            name,
            env_var,
            required: false,
        }
    }
}

const AWS_FIELDS: [CredentialField; 3] = [
    CredentialField::required("access_key_id", "AWS_ACCESS_KEY_ID"),
    CredentialField::required("secret_access_key", "AWS_SECRET_ACCESS_KEY"),
    CredentialField::optional("session_token", "AWS_SESSION_TOKEN"),
];

const AZURE_FIELDS: [CredentialField; 4] = [
    CredentialField::required("client_id", "AZURE_CLIENT_ID"),
    CredentialField::required("client_secret", "AZURE_CLIENT_SECRET"),
    CredentialField::required("tenant_id", "AZURE_TENANT_ID"),
    CredentialField::required("subscription_id", "AZURE_SUBSCRIPTION_ID"),
];

const GCP_FIELDS: [CredentialField; 2] = [
    CredentialField::required("credentials", "GOOGLE_CREDENTIALS"),
    CredentialField::optional("project", "GOOGLE_PROJECT"),
];

const OPENSTACK_FIELDS: [CredentialField; 5] = [
    CredentialField::required("auth_url", "OS_AUTH_URL"),
    CredentialField::required("username", "OS_USERNAME"),
    CredentialField::required("password", "OS_PASSWORD"),
    CredentialField::required("project_name", "OS_PROJECT_NAME"),
    CredentialField::optional("region_name", "OS_REGION_NAME"),
];

const KUBERNETES_FIELDS: [CredentialField; 2] = [
    CredentialField::optional("kubeconfig", "KUBECONFIG"),
    CredentialField::optional("context", "KUBE_CTX"),
];

/// The credential slots a provider understands, in display order.
pub fn credential_fields(provider: Provider) -> &'static [CredentialField] {
    match provider {
        Provider::Aws => &AWS_FIELDS,
        Provider::Azure => &AZURE_FIELDS,
        Provider::Gcp => &GCP_FIELDS,
        Provider::OpenStack => &OPENSTACK_FIELDS,
        Provider::Kubernetes => &KUBERNETES_FIELDS,
    }
}

// ============================================================================
// Credential bags
// ============================================================================

/// Where a resolved credential value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment variable.
    Env,
    /// Provider block in the stack configuration.
    Config,
}

#[derive(Clone)]
struct CredentialEntry {
    value: SecretString,
    source: CredentialSource,
}

/// Credentials assembled for one provider.
///
/// Rebuilt from the environment and the configuration on every
/// [`assemble`](Self::assemble); nothing is cached. `Debug` lists field
/// names only.
#[derive(Clone)]
pub struct CredentialBag {
    provider: Provider,
    entries: IndexMap<&'static str, CredentialEntry>,
}

impl CredentialBag {
    /// Resolves every credential slot of `provider`.
    ///
    /// A non-empty environment variable beats the configuration value for
    /// the same field. Unresolved fields are simply absent; call
    /// [`validate`](Self::validate) to turn missing required fields into an
    /// error.
    pub fn assemble(provider: Provider, config: &StackConfig) -> Self {
        let block = config.provider_block(provider);
        let mut entries = IndexMap::new();
        for field in credential_fields(provider) {
            if let Ok(value) = env::var(field.env_var) {
                if !value.is_empty() {
                    debug!(provider = %provider, field = field.name, "credential resolved from environment");
                    entries.insert(
                        field.name,
                        CredentialEntry {
                            value: SecretString::new(value),
                            source: CredentialSource::Env,
                        },
                    );
                    continue;
                }
            }
            let configured = block
                .and_then(|map| map.get(&ConfigValue::from(field.name)))
                .and_then(scalar_text);
            if let Some(value) = configured {
                debug!(provider = %provider, field = field.name, "credential resolved from configuration");
                entries.insert(
                    field.name,
                    CredentialEntry {
                        value: SecretString::new(value),
                        source: CredentialSource::Config,
                    },
                );
            }
        }
        Self { provider, entries }
    }

    /// The provider this bag was assembled for.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// The resolved value for a field, if any.
    pub fn get(&self, name: &str) -> Option<&SecretString> {
        self.entries.get(name).map(|entry| &entry.value)
    }

    /// Which source supplied a field, if it resolved at all.
    pub fn source(&self, name: &str) -> Option<CredentialSource> {
        self.entries.get(name).map(|entry| entry.source)
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of required fields that did not resolve.
    pub fn missing(&self) -> Vec<&'static str> {
        credential_fields(self.provider)
            .iter()
            .filter(|field| field.required && !self.entries.contains_key(field.name))
            .map(|field| field.name)
            .collect()
    }

    /// Fails when any required field is unresolved.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::missing_credentials(self.provider, missing))
        }
    }
}

impl fmt::Debug for CredentialBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBag")
            .field("provider", &self.provider.key())
            .field("fields", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Renders a scalar as credential text. Containers and null do not count
/// as credential material.
fn scalar_text(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Null | ConfigValue::Sequence(_) | ConfigValue::Mapping(_) => None,
        ConfigValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ============================================================================
// Redaction
// ============================================================================

/// Whether a key name looks like it holds credential material.
pub fn is_sensitive_key(name: &str) -> bool {
    const SENSITIVE_PATTERNS: [&str; 18] = [
        "password",
        "passwd",
        "pwd",
        "secret",
        "token",
        "api_key",
        "apikey",
        "api-key",
        "private_key",
        "privatekey",
        "private-key",
        "credential",
        "bearer",
        "access_key",
        "accesskey",
        "encryption_key",
        "ssh_key",
        "sshkey",
    ];

    let lower = name.to_lowercase();
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

/// Returns a copy of `tree` with values under sensitive-looking keys
/// replaced by [`REDACTED`], recursively.
///
/// Null stays null so redaction never invents values that were absent.
pub fn redact_tree(tree: &ConfigValue) -> ConfigValue {
    match tree {
        ConfigValue::Mapping(map) => {
            let mut redacted = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let sensitive = key.as_str().is_some_and(is_sensitive_key);
                let new_value = if sensitive && !value.is_null() {
                    ConfigValue::from(REDACTED)
                } else {
                    redact_tree(value)
                };
                redacted.insert(key.clone(), new_value);
            }
            ConfigValue::Mapping(redacted)
        }
        ConfigValue::Sequence(items) => {
            ConfigValue::Sequence(items.iter().map(redact_tree).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{deep_merge, load_defaults};
    use serial_test::serial;

    fn config_with(section: &str, entries: ConfigValue) -> StackConfig {
        let overlay = ConfigValue::mapping([(section, entries)]);
        StackConfig::new(deep_merge(&load_defaults(), &overlay))
    }

    fn clear_aws_env() {
        for field in credential_fields(Provider::Aws) {
            env::remove_var(field.env_var);
        }
    }

    #[test]
    #[serial]
    fn test_assemble_from_config_block() {
        clear_aws_env();
        let config = config_with(
            "aws",
            ConfigValue::mapping([
                ("access_key_id", "AKIACONFIG"),
                ("secret_access_key", "configsecret"),
            ]),
        );
        let bag = CredentialBag::assemble(Provider::Aws, &config);
        assert_eq!(bag.get("access_key_id").unwrap().expose(), "AKIACONFIG");
        assert_eq!(bag.source("access_key_id"), Some(CredentialSource::Config));
        assert!(bag.missing().is_empty());
        assert!(bag.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_beats_config() {
        clear_aws_env();
        env::set_var("AWS_ACCESS_KEY_ID", "AKIAENV");
        env::set_var("AWS_SECRET_ACCESS_KEY", "envsecret");
        let config = config_with(
            "aws",
            ConfigValue::mapping([
                ("access_key_id", "AKIACONFIG"),
                ("secret_access_key", "configsecret"),
            ]),
        );
        let bag = CredentialBag::assemble(Provider::Aws, &config);
        assert_eq!(bag.get("access_key_id").unwrap().expose(), "AKIAENV");
        assert_eq!(bag.source("access_key_id"), Some(CredentialSource::Env));
        clear_aws_env();
    }

    #[test]
    #[serial]
    fn test_empty_environment_variable_does_not_override() {
        clear_aws_env();
        env::set_var("AWS_ACCESS_KEY_ID", "");
        let config = config_with(
            "aws",
            ConfigValue::mapping([("access_key_id", "AKIACONFIG")]),
        );
        let bag = CredentialBag::assemble(Provider::Aws, &config);
        assert_eq!(bag.get("access_key_id").unwrap().expose(), "AKIACONFIG");
        clear_aws_env();
    }

    #[test]
    #[serial]
    fn test_missing_required_fields_fail_validation() {
        clear_aws_env();
        let config = StackConfig::default();
        let bag = CredentialBag::assemble(Provider::Aws, &config);
        assert_eq!(bag.missing(), vec!["access_key_id", "secret_access_key"]);
        let err = bag.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("access_key_id"));
        // the error names fields, never values
        assert!(!message.contains("AKIA"));
    }

    #[test]
    #[serial]
    fn test_optional_fields_do_not_block_validation() {
        let config = StackConfig::default();
        let bag = CredentialBag::assemble(Provider::Kubernetes, &config);
        assert!(bag.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_debug_lists_names_only() {
        clear_aws_env();
        let config = config_with(
            "aws",
            ConfigValue::mapping([("access_key_id", "AKIASENSITIVE")]),
        );
        let bag = CredentialBag::assemble(Provider::Aws, &config);
        let rendered = format!("{bag:?}");
        assert!(rendered.contains("access_key_id"));
        assert!(!rendered.contains("AKIASENSITIVE"));
    }

    #[test]
    fn test_non_scalar_config_values_are_ignored() {
        let config = config_with(
            "gcp",
            ConfigValue::mapping([(
                "credentials",
                ConfigValue::sequence(["not", "a", "scalar"]),
            )]),
        );
        let bag = CredentialBag::assemble(Provider::Gcp, &config);
        assert!(bag.get("credentials").is_none());
    }

    #[test]
    fn test_is_sensitive_key() {
        assert!(is_sensitive_key("secret_access_key"));
        assert!(is_sensitive_key("DB_PASSWORD"));
        assert!(is_sensitive_key("session_token"));
        assert!(is_sensitive_key("credentials"));
        assert!(!is_sensitive_key("region"));
        assert!(!is_sensitive_key("kubeconfig"));
    }

    #[test]
    fn test_redact_tree_masks_sensitive_leaves() {
        let tree = ConfigValue::mapping([
            (
                "aws",
                ConfigValue::mapping([
                    ("region", ConfigValue::from("us-west-2")),
                    ("secret_access_key", ConfigValue::from("hunter2")),
                ]),
            ),
            ("plain", ConfigValue::from(42i64)),
        ]);
        let redacted = redact_tree(&tree);
        assert_eq!(
            redacted.get_path("aws.secret_access_key"),
            Some(&ConfigValue::from(REDACTED))
        );
        assert_eq!(
            redacted.get_path("aws.region"),
            Some(&ConfigValue::from("us-west-2"))
        );
        assert_eq!(redacted.get("plain"), Some(&ConfigValue::from(42i64)));
    }

    #[test]
    fn test_redact_tree_leaves_null_alone() {
        let tree = ConfigValue::mapping([("password", ConfigValue::Null)]);
        let redacted = redact_tree(&tree);
        assert_eq!(redacted.get("password"), Some(&ConfigValue::Null));
    }
}
