//! Deep merge for configuration trees.

use crate::value::ConfigValue;

/// Recursively merges an overlay tree onto a base tree.
///
/// Merging recurses only where both sides hold mappings at the same key.
/// Every other collision is resolved by the overlay wholesale: sequences
/// are never merged element-wise, and a scalar on either side replaces
/// whatever the other side holds. Neither input is mutated; a new tree is
/// returned.
pub fn deep_merge(base: &ConfigValue, overlay: &ConfigValue) -> ConfigValue {
    match (base, overlay) {
        (ConfigValue::Mapping(base_map), ConfigValue::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if let Some(base_value) = base_map.get(key) {
                    merged.insert(key.clone(), deep_merge(base_value, value));
                } else {
                    merged.insert(key.clone(), value.clone());
                }
            }
            ConfigValue::Mapping(merged)
        }
        // For non-mappings, overlay wins
        (_, overlay) => overlay.clone(),
    }
}
