//! Deserialization for configuration values.
//!
//! Decoding produces only the plain variants (`Null`, `Bool`, `Integer`,
//! `Float`, `String`, `Sequence`, `Mapping`). The coerced variants are
//! never parsed out of documents; they exist only as outputs of the
//! coercion utility.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use super::{ConfigValue, Mapping, Sequence};

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = ConfigValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a configuration value")
            }

            fn visit_bool<E>(self, b: bool) -> Result<Self::Value, E> {
                Ok(ConfigValue::Bool(b))
            }

            fn visit_i64<E>(self, i: i64) -> Result<Self::Value, E> {
                Ok(ConfigValue::Integer(i))
            }

            fn visit_u64<E>(self, u: u64) -> Result<Self::Value, E> {
                // Integers beyond i64 degrade to floats rather than failing
                match i64::try_from(u) {
                    Ok(i) => Ok(ConfigValue::Integer(i)),
                    Err(_) => Ok(ConfigValue::Float(u as f64)),
                }
            }

            fn visit_f64<E>(self, f: f64) -> Result<Self::Value, E> {
                Ok(ConfigValue::Float(f))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E> {
                Ok(ConfigValue::String(s.to_string()))
            }

            fn visit_string<E>(self, s: String) -> Result<Self::Value, E> {
                Ok(ConfigValue::String(s))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(ConfigValue::Null)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(ConfigValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                ConfigValue::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut seq = Sequence::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(item) = access.next_element()? {
                    seq.push(item);
                }
                Ok(ConfigValue::Sequence(seq))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = Mapping::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry()? {
                    map.insert(key, value);
                }
                Ok(ConfigValue::Mapping(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_yaml_document() {
        let tree: ConfigValue = serde_yaml::from_str(
            r#"
            project:
              name: demo
            aws:
              enabled: true
              max_size: 4
              weight: 1.5
            tags:
              - alpha
              - beta
            empty: null
            "#,
        )
        .unwrap();

        assert_eq!(
            tree.get_path("project.name").and_then(ConfigValue::as_str),
            Some("demo")
        );
        assert_eq!(
            tree.get_path("aws.enabled").and_then(ConfigValue::as_bool),
            Some(true)
        );
        assert_eq!(
            tree.get_path("aws.max_size").and_then(ConfigValue::as_i64),
            Some(4)
        );
        assert_eq!(
            tree.get_path("aws.weight").and_then(ConfigValue::as_f64),
            Some(1.5)
        );
        assert_eq!(
            tree.get_path("tags.0").and_then(ConfigValue::as_str),
            Some("alpha")
        );
        assert!(tree.get("empty").is_some_and(ConfigValue::is_null));
    }

    #[test]
    fn test_deserialize_json_document() {
        let tree: ConfigValue =
            serde_json::from_str(r#"{"kubernetes": {"context": "default", "replicas": 2}}"#)
                .unwrap();
        assert_eq!(
            tree.get_path("kubernetes.replicas")
                .and_then(ConfigValue::as_i64),
            Some(2)
        );
    }

    #[test]
    fn test_deserialize_non_string_keys() {
        let tree: ConfigValue = serde_yaml::from_str("80: http\n443: https\n").unwrap();
        let map = tree.as_mapping().unwrap();
        assert_eq!(
            map.get(&ConfigValue::Integer(443))
                .and_then(ConfigValue::as_str),
            Some("https")
        );
    }

    #[test]
    fn test_roundtrip_preserves_key_order() {
        let yaml = "zebra: 1\nalpha: 2\nmiddle: 3\n";
        let tree: ConfigValue = serde_yaml::from_str(yaml).unwrap();
        let dumped = serde_yaml::to_string(&tree).unwrap();
        assert_eq!(dumped, yaml);
    }
}
