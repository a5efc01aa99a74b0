//! Built-in configuration defaults.
//!
//! The defaults form the base layer of every load: project metadata, logging
//! settings, and one disabled block per supported provider. The external
//! stack configuration is merged over this tree.

use once_cell::sync::Lazy;

use crate::providers::Provider;
use crate::value::ConfigValue;

static DEFAULT_TREE: Lazy<ConfigValue> = Lazy::new(build_tree);

/// Returns the built-in default configuration tree.
///
/// Pure and infallible; callers receive their own copy and may mutate it
/// freely.
pub fn load_defaults() -> ConfigValue {
    DEFAULT_TREE.clone()
}

fn build_tree() -> ConfigValue {
    let mut root = vec![
        (
            "project",
            ConfigValue::mapping([("name", "unnamed"), ("environment", "dev")]),
        ),
        (
            "logging",
            ConfigValue::mapping([("level", "info"), ("format", "pretty")]),
        ),
    ];
    for provider in Provider::ALL {
        root.push((provider.key(), provider.default_block()));
    }
    ConfigValue::mapping(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_project_and_logging() {
        let defaults = load_defaults();
        assert_eq!(
            defaults.get_path("project.name"),
            Some(&ConfigValue::from("unnamed"))
        );
        assert_eq!(
            defaults.get_path("project.environment"),
            Some(&ConfigValue::from("dev"))
        );
        assert_eq!(
            defaults.get_path("logging.level"),
            Some(&ConfigValue::from("info"))
        );
        assert_eq!(
            defaults.get_path("logging.format"),
            Some(&ConfigValue::from("pretty"))
        );
    }

    #[test]
    fn test_every_provider_defaults_to_disabled() {
        let defaults = load_defaults();
        for provider in Provider::ALL {
            let enabled = defaults.get_path(&format!("{}.enabled", provider.key()));
            assert_eq!(enabled, Some(&ConfigValue::Bool(false)), "{provider}");
        }
        assert_eq!(
            defaults.get_path("aws.region"),
            Some(&ConfigValue::from("us-west-2"))
        );
        assert_eq!(
            defaults.get_path("kubernetes.context"),
            Some(&ConfigValue::from("default"))
        );
    }

    #[test]
    fn test_copies_are_independent() {
        let mut first = load_defaults();
        if let Some(map) = first.as_mapping_mut() {
            map.insert(ConfigValue::from("extra"), ConfigValue::Bool(true));
        }
        let second = load_defaults();
        assert_eq!(second.get("extra"), None);
    }
}
