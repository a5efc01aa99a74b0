//! Redacted-by-default secret values.

use std::fmt;

use super::REDACTED;

/// A string wrapper that keeps the value out of logs and output.
///
/// `Display`, `Debug`, and `Serialize` all emit `[REDACTED]` instead of the
/// value. Use [`expose`](Self::expose) at the point the secret is actually
/// consumed, such as handing it to a provider SDK.
#[derive(Clone)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Exposes the underlying value.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Consumes the wrapper and returns the underlying value.
    pub fn into_inner(self) -> String {
        self.value
    }

    /// Length of the underlying value.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the underlying value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({REDACTED})")
    }
}

// No Deref to String: access goes through expose() so reads are deliberate.

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SecretString {}

impl std::hash::Hash for SecretString {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl serde::Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialization never exposes the value.
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> serde::Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}
