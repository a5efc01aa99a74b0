//! Serialization for configuration values.
//!
//! Coerced variants serialize as their canonical strings so that trees
//! containing them still round-trip through YAML and JSON dumps.

use serde::ser::{Serialize, Serializer};

use super::ConfigValue;

impl Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(f) => serializer.serialize_f64(*f),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Decimal(d) => serializer.collect_str(d),
            ConfigValue::Date(d) => serializer.collect_str(d),
            ConfigValue::DateTime(dt) => serializer.collect_str(&dt.to_rfc3339()),
            ConfigValue::Sequence(seq) => serializer.collect_seq(seq),
            ConfigValue::Mapping(map) => serializer.collect_map(map),
        }
    }
}
