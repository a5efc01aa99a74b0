//! Configuration tree values.
//!
//! [`ConfigValue`] is the loosely-typed value space every layered
//! configuration passes through: defaults, stack files, and merged trees
//! are all made of it. Decoding YAML or JSON produces only the plain
//! variants; `Decimal`, `Date`, and `DateTime` arise solely from type
//! coercion (see [`crate::coerce`]).
//!
//! Mapping keys are themselves values because YAML permits non-string keys
//! and dict coercion may produce integer keys. That forces the hand-written
//! `PartialEq`/`Eq`/`Hash` below, which treat `NaN` as equal to itself and
//! normalize signed zero so that keys behave sanely.

mod de;
mod ser;

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// An ordered sequence of configuration values.
pub type Sequence = Vec<ConfigValue>;

/// An insertion-ordered mapping from values to values.
pub type Mapping = IndexMap<ConfigValue, ConfigValue>;

/// A single node in a configuration tree.
#[derive(Clone, Debug)]
pub enum ConfigValue {
    /// Absent or explicitly null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed 64-bit integer scalar.
    Integer(i64),
    /// Double-precision float scalar.
    Float(f64),
    /// UTF-8 string scalar.
    String(String),
    /// Arbitrary-precision decimal, produced by coercion.
    Decimal(Decimal),
    /// Calendar date, produced by coercion.
    Date(NaiveDate),
    /// Timezone-aware instant, produced by coercion.
    DateTime(DateTime<Utc>),
    /// Ordered sequence of values.
    Sequence(Sequence),
    /// Insertion-ordered mapping of values to values.
    Mapping(Mapping),
}

impl Default for ConfigValue {
    fn default() -> Self {
        Self::Null
    }
}

// ============================================================================
// Construction helpers
// ============================================================================

impl ConfigValue {
    /// Builds a mapping value from key/value pairs.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<ConfigValue>,
        V: Into<ConfigValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a sequence value from items.
    pub fn sequence<T, I>(items: I) -> Self
    where
        T: Into<ConfigValue>,
        I: IntoIterator<Item = T>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl ConfigValue {
    /// Returns true for the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this value is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this value is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the decimal if this value is one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the date if this value is one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the datetime if this value is one.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the sequence if this value is one.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the mapping if this value is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the mapping mutably if this value is one.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a string key in a mapping value.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            Self::Mapping(map) => map.get(&ConfigValue::String(key.to_string())),
            _ => None,
        }
    }

    /// Resolves a dotted path (e.g. "aws.region" or "hosts.0.name").
    ///
    /// Path segments index mappings by string key and sequences by
    /// numeric position.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut current = self;

        for part in path.split('.') {
            match current {
                Self::Mapping(map) => {
                    current = map.get(&ConfigValue::String(part.to_string()))?;
                }
                Self::Sequence(seq) => {
                    let index: usize = part.parse().ok()?;
                    current = seq.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// Human-readable name of this value's variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Decimal(_) => "decimal",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

// ============================================================================
// Equality and hashing
// ============================================================================

/// Canonical bit pattern for float comparison and hashing.
///
/// All NaN payloads collapse to one value and -0.0 collapses to +0.0 so
/// that equality and hashing agree.
fn canonical_float_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => {
                canonical_float_bits(*a) == canonical_float_bits(*b)
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            // Variants never compare equal across kinds; coercion, not
            // equality, bridges numeric representations.
            _ => false,
        }
    }
}

impl Eq for ConfigValue {}

impl Hash for ConfigValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => canonical_float_bits(*f).hash(state),
            Self::String(s) => s.hash(state),
            Self::Decimal(d) => d.hash(state),
            Self::Date(d) => d.hash(state),
            Self::DateTime(dt) => dt.hash(state),
            Self::Sequence(seq) => seq.hash(state),
            Self::Mapping(map) => {
                // Entry-order-insensitive, consistent with mapping equality.
                let mut acc: u64 = 0;
                for (k, v) in map {
                    let mut entry_hasher = DefaultHasher::new();
                    k.hash(&mut entry_hasher);
                    v.hash(&mut entry_hasher);
                    acc ^= entry_hasher.finish();
                }
                acc.hash(state);
            }
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for ConfigValue {
    /// Renders scalars bare and containers as YAML.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Self::Sequence(_) | Self::Mapping(_) => {
                let rendered = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(rendered.trim_end())
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Decimal> for ConfigValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for ConfigValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<Utc>> for ConfigValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Sequence> for ConfigValue {
    fn from(seq: Sequence) -> Self {
        Self::Sequence(seq)
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}
