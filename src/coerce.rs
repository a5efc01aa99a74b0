//! Type coercion for configuration values.
//!
//! Stack files arrive loosely typed: flags spelled `"yes"`, counts quoted
//! as strings, prices that must become exact decimals. [`convert`] turns a
//! raw [`ConfigValue`] into the shape a declared [`TypeDescriptor`] asks
//! for, and it is total: bad input yields `None` (absence), never a panic
//! or an error. Callers decide whether absence means "skip the field" or
//! "keep the raw value" — [`convert_map_types`] implements the latter
//! policy for whole mappings.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexSet;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::value::{ConfigValue, Mapping};

// ============================================================================
// Type descriptors
// ============================================================================

/// A primitive target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Double-precision float.
    Float,
    /// Boolean.
    Boolean,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Calendar date.
    Date,
    /// Timezone-aware instant.
    DateTime,
}

impl PrimitiveKind {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "string" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Boolean),
            "decimal" => Ok(Self::Decimal),
            "date" => Ok(Self::Date),
            "datetime" | "timestamp" => Ok(Self::DateTime),
            other => Err(Error::UnknownType(other.to_string())),
        }
    }
}

/// A declared target type for a configuration value.
///
/// Container element types are optional: `None` means the elements pass
/// through unconverted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A primitive scalar type.
    Primitive(PrimitiveKind),
    /// An ordered sequence with an optional element type.
    List(Option<Box<TypeDescriptor>>),
    /// A mapping with optional key and value types.
    Dict(Option<Box<TypeDescriptor>>, Option<Box<TypeDescriptor>>),
    /// A de-duplicated collection with an optional element type.
    Set(Option<Box<TypeDescriptor>>),
    /// A type whose value may be absent.
    Optional(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// String primitive.
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    /// Integer primitive.
    pub fn integer() -> Self {
        Self::Primitive(PrimitiveKind::Integer)
    }

    /// Float primitive.
    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    /// Boolean primitive.
    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    /// Decimal primitive.
    pub fn decimal() -> Self {
        Self::Primitive(PrimitiveKind::Decimal)
    }

    /// Date primitive.
    pub fn date() -> Self {
        Self::Primitive(PrimitiveKind::Date)
    }

    /// DateTime primitive.
    pub fn datetime() -> Self {
        Self::Primitive(PrimitiveKind::DateTime)
    }

    /// List with a declared element type.
    pub fn list(elem: TypeDescriptor) -> Self {
        Self::List(Some(Box::new(elem)))
    }

    /// List whose elements pass through unconverted.
    pub fn untyped_list() -> Self {
        Self::List(None)
    }

    /// Dict with declared key and value types.
    pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Dict(Some(Box::new(key)), Some(Box::new(value)))
    }

    /// Dict whose keys and values pass through unconverted.
    pub fn untyped_dict() -> Self {
        Self::Dict(None, None)
    }

    /// Set with a declared element type.
    pub fn set(elem: TypeDescriptor) -> Self {
        Self::Set(Some(Box::new(elem)))
    }

    /// Set whose elements pass through unconverted.
    pub fn untyped_set() -> Self {
        Self::Set(None)
    }

    /// Wraps a type to accept absence.
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional(Box::new(inner))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn slot(t: &Option<Box<TypeDescriptor>>) -> String {
            t.as_ref().map_or_else(|| "any".to_string(), |t| t.to_string())
        }

        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::List(None) => f.write_str("list"),
            Self::List(Some(elem)) => write!(f, "list[{elem}]"),
            Self::Set(None) => f.write_str("set"),
            Self::Set(Some(elem)) => write!(f, "set[{elem}]"),
            Self::Dict(None, None) => f.write_str("dict"),
            Self::Dict(key, value) => write!(f, "dict[{}, {}]", slot(key), slot(value)),
            Self::Optional(inner) => write!(f, "optional[{inner}]"),
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts a value to a declared target type.
///
/// Total over all inputs: `None` means "no conversion possible" and is the
/// only failure signal. Contract highlights:
///
/// - `Null` input yields `None` regardless of the target.
/// - A value already inhabiting the target variant passes the identity path.
/// - Containers convert all-or-nothing: one failed element fails the whole
///   container.
/// - Blank or whitespace-only strings never become `0`, `0.0`, or an empty
///   date; they yield `None`.
/// - `Set` targets de-duplicate converted elements by equality, keeping the
///   first occurrence, and produce a `Sequence` (the value space has no set
///   variant).
pub fn convert(value: &ConfigValue, target: &TypeDescriptor) -> Option<ConfigValue> {
    if value.is_null() {
        return None;
    }

    match target {
        TypeDescriptor::Optional(inner) => convert(value, inner),
        TypeDescriptor::Primitive(kind) => convert_primitive(value, *kind),
        TypeDescriptor::List(elem) => {
            let items = value.as_sequence()?;
            convert_elements(items, elem.as_deref()).map(ConfigValue::Sequence)
        }
        TypeDescriptor::Set(elem) => {
            let items = value.as_sequence()?;
            let converted = convert_elements(items, elem.as_deref())?;
            let unique: IndexSet<ConfigValue> = converted.into_iter().collect();
            Some(ConfigValue::Sequence(unique.into_iter().collect()))
        }
        TypeDescriptor::Dict(key_type, value_type) => {
            let map = value.as_mapping()?;
            let mut converted = Mapping::with_capacity(map.len());
            for (key, val) in map {
                let new_key = match key_type.as_deref() {
                    Some(t) => convert(key, t)?,
                    None => key.clone(),
                };
                let new_val = match value_type.as_deref() {
                    Some(t) => convert(val, t)?,
                    None => val.clone(),
                };
                converted.insert(new_key, new_val);
            }
            Some(ConfigValue::Mapping(converted))
        }
    }
}

/// Applies declared types to a mapping, field by field.
///
/// Keys without a hint pass through unmodified. Keys whose coercion fails
/// retain their original raw value — a bad field is never dropped.
pub fn convert_map_types(
    data: &Mapping,
    hints: &HashMap<String, TypeDescriptor>,
) -> Mapping {
    let mut converted = Mapping::with_capacity(data.len());
    for (key, value) in data {
        let hint = key.as_str().and_then(|name| hints.get(name));
        let new_value = match hint {
            Some(descriptor) => convert(value, descriptor).unwrap_or_else(|| value.clone()),
            None => value.clone(),
        };
        converted.insert(key.clone(), new_value);
    }
    converted
}

fn convert_elements(
    items: &[ConfigValue],
    elem: Option<&TypeDescriptor>,
) -> Option<Vec<ConfigValue>> {
    match elem {
        Some(t) => items.iter().map(|item| convert(item, t)).collect(),
        None => Some(items.to_vec()),
    }
}

fn convert_primitive(value: &ConfigValue, kind: PrimitiveKind) -> Option<ConfigValue> {
    match kind {
        PrimitiveKind::String => Some(ConfigValue::String(value.to_string())),
        PrimitiveKind::Integer => to_integer(value).map(ConfigValue::Integer),
        PrimitiveKind::Float => to_float(value).map(ConfigValue::Float),
        PrimitiveKind::Boolean => to_boolean(value).map(ConfigValue::Bool),
        PrimitiveKind::Decimal => to_decimal(value).map(ConfigValue::Decimal),
        PrimitiveKind::Date => to_date(value).map(ConfigValue::Date),
        PrimitiveKind::DateTime => to_datetime(value).map(ConfigValue::DateTime),
    }
}

fn to_integer(value: &ConfigValue) -> Option<i64> {
    match value {
        ConfigValue::Integer(i) => Some(*i),
        // Truncation, saturating at the i64 range
        ConfigValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        ConfigValue::Bool(b) => Some(i64::from(*b)),
        ConfigValue::Decimal(d) => d.trunc().to_i64(),
        ConfigValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse().ok()
        }
        _ => None,
    }
}

fn to_float(value: &ConfigValue) -> Option<f64> {
    match value {
        ConfigValue::Float(f) => Some(*f),
        ConfigValue::Integer(i) => Some(*i as f64),
        ConfigValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        ConfigValue::Decimal(d) => d.to_f64(),
        ConfigValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse().ok()
        }
        _ => None,
    }
}

fn to_boolean(value: &ConfigValue) -> Option<bool> {
    match value {
        ConfigValue::Bool(b) => Some(*b),
        ConfigValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "y" => Some(true),
            "false" | "no" | "0" | "n" => Some(false),
            _ => None,
        },
        // Non-string sources use standard truthiness
        ConfigValue::Integer(i) => Some(*i != 0),
        ConfigValue::Float(f) => Some(*f != 0.0),
        ConfigValue::Decimal(d) => Some(!d.is_zero()),
        ConfigValue::Date(_) | ConfigValue::DateTime(_) => Some(true),
        ConfigValue::Sequence(seq) => Some(!seq.is_empty()),
        ConfigValue::Mapping(map) => Some(!map.is_empty()),
        ConfigValue::Null => None,
    }
}

fn to_decimal(value: &ConfigValue) -> Option<Decimal> {
    match value {
        ConfigValue::Decimal(d) => Some(*d),
        ConfigValue::Integer(i) => Some(Decimal::from(*i)),
        // The string representation avoids binary float artifacts
        ConfigValue::Float(f) if f.is_finite() => Decimal::from_str(&f.to_string()).ok(),
        ConfigValue::Bool(b) => Some(Decimal::from(i64::from(*b))),
        ConfigValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

fn to_date(value: &ConfigValue) -> Option<NaiveDate> {
    match value {
        ConfigValue::Date(d) => Some(*d),
        // A datetime narrows by dropping its time component
        ConfigValue::DateTime(dt) => Some(dt.date_naive()),
        ConfigValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_datetime(value: &ConfigValue) -> Option<DateTime<Utc>> {
    match value {
        ConfigValue::DateTime(dt) => Some(*dt),
        // A date widens to midnight UTC
        ConfigValue::Date(d) => Some(d.and_time(NaiveTime::MIN).and_utc()),
        ConfigValue::Integer(secs) => DateTime::from_timestamp(*secs, 0),
        ConfigValue::Float(epoch) if epoch.is_finite() => {
            let millis = (epoch * 1000.0).round();
            if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
                return None;
            }
            DateTime::from_timestamp_millis(millis as i64)
        }
        ConfigValue::String(s) => parse_datetime(s.trim()),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = s.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = s.parse::<NaiveDate>() {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    None
}
