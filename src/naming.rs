//! Resource naming and tag composition.
//!
//! Provisioned resources follow the `<project>-<environment>-<resource>`
//! convention, constrained to what every provider accepts: lowercase
//! alphanumerics and dashes, at most 63 characters (the strictest common
//! label rule).

use indexmap::IndexMap;

use crate::config::StackConfig;

/// Maximum length of a sanitized name.
pub const MAX_NAME_LEN: usize = 63;

/// Composes the conventional resource name for a stack.
///
/// Each part is sanitized before joining, so
/// `resource_name("My App", "Prod", "web server")` yields
/// `my-app-prod-web-server`.
pub fn resource_name(project: &str, environment: &str, resource: &str) -> String {
    let joined = format!(
        "{}-{}-{}",
        sanitize_name(project),
        sanitize_name(environment),
        sanitize_name(resource)
    );
    // joining can reintroduce length or edge dashes
    sanitize_name(&joined)
}

/// Normalizes a raw name to lowercase alphanumerics and dashes.
///
/// Runs of disallowed characters collapse to a single dash, leading and
/// trailing dashes are trimmed, and the result is clamped to
/// [`MAX_NAME_LEN`]. An all-invalid input yields the empty string; callers
/// that need a guaranteed non-empty name must supply one.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_NAME_LEN));
    let mut last_dash = true; // suppress leading dash
    for c in raw.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
        if out.len() == MAX_NAME_LEN {
            break;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Merges two tag maps, overrides winning on key collisions.
///
/// Base entries keep their insertion order; new override keys append after
/// them. Neither input is mutated.
pub fn merge_tags(
    base: &IndexMap<String, String>,
    overrides: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// The tags every provisioned resource carries.
pub fn default_tags(config: &StackConfig) -> IndexMap<String, String> {
    IndexMap::from([
        ("project".to_string(), config.project_name().to_string()),
        (
            "environment".to_string(),
            config.environment().to_string(),
        ),
        ("managed-by".to_string(), "groundwork".to_string()),
    ])
}
