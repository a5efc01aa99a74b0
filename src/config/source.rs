//! External configuration sources.
//!
//! A [`ConfigSource`] hands the loader pieces of the stack configuration by
//! key. The empty key addresses the whole tree. Sources report absence as
//! `Ok(None)` and reserve errors for data that exists but cannot be used,
//! so the loader can decide how far to degrade.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::value::ConfigValue;

/// Errors raised by configuration sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the unreadable store.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The backing store held syntactically invalid data.
    #[error("failed to parse {origin}: {message}")]
    Parse {
        /// Which source produced the data.
        origin: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The root or a section held something other than a mapping.
    #[error("{origin}: expected a mapping {}, found {found}",
        if .key.is_empty() { "at the root".to_string() } else { format!("at '{}'", .key) })]
    NotAMapping {
        /// Section key, empty for the root.
        key: String,
        /// Which source produced the data.
        origin: String,
        /// Type name of the offending value.
        found: &'static str,
    },
}

/// A keyed provider of configuration objects.
///
/// Implementations must be pure lookups: no caching between calls, no
/// mutation of returned trees.
pub trait ConfigSource {
    /// Fetch the object stored under `key`. The empty key addresses the
    /// whole tree; `Ok(None)` means nothing is stored there.
    fn get_object(&self, key: &str) -> Result<Option<ConfigValue>, SourceError>;

    /// Human-readable description of where this source reads from.
    fn origin(&self) -> String;
}

/// Extract a section from a parsed tree, enforcing the mapping shape.
///
/// An explicitly null root or section counts as absent: `aws:` with no body
/// parses to null and means "nothing configured", not an error.
fn section_of(
    tree: &ConfigValue,
    key: &str,
    origin: &str,
) -> Result<Option<ConfigValue>, SourceError> {
    if tree.is_null() {
        return Ok(None);
    }
    let Some(map) = tree.as_mapping() else {
        return Err(SourceError::NotAMapping {
            key: String::new(),
            origin: origin.to_string(),
            found: tree.type_name(),
        });
    };
    if key.is_empty() {
        return Ok(Some(tree.clone()));
    }
    match map.get(&ConfigValue::from(key)) {
        None => Ok(None),
        Some(section) if section.is_null() => Ok(None),
        Some(section) if section.as_mapping().is_some() => Ok(Some(section.clone())),
        Some(section) => Err(SourceError::NotAMapping {
            key: key.to_string(),
            origin: origin.to_string(),
            found: section.type_name(),
        }),
    }
}

/// Stack configuration read from a YAML or JSON file.
///
/// Each call re-reads the file, so a source observes edits made after it
/// was constructed. A missing file is absence, not an error.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a source for `preferred`, falling back to the same file name
    /// under the user configuration directory (`~/.config/groundwork/` on
    /// Linux) when `preferred` does not exist.
    pub fn discover(preferred: impl Into<PathBuf>) -> Self {
        let preferred = preferred.into();
        if !preferred.exists() {
            if let Some(fallback) = Self::user_fallback(&preferred) {
                if fallback.exists() {
                    debug!(path = %fallback.display(), "using user-level stack file");
                    return Self::new(fallback);
                }
            }
        }
        Self::new(preferred)
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn user_fallback(preferred: &Path) -> Option<PathBuf> {
        let name = preferred.file_name()?;
        Some(dirs::config_dir()?.join("groundwork").join(name))
    }

    /// Read and parse the whole file. `Ok(None)` when the file is missing
    /// or empty.
    fn read_tree(&self) -> Result<Option<ConfigValue>, SourceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(SourceError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };

        let is_json = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let tree = if is_json {
            serde_json::from_str::<ConfigValue>(&text).map_err(|err| SourceError::Parse {
                origin: self.origin(),
                message: err.to_string(),
            })?
        } else {
            serde_yaml::from_str::<ConfigValue>(&text).map_err(|err| SourceError::Parse {
                origin: self.origin(),
                message: err.to_string(),
            })?
        };

        Ok(Some(tree))
    }
}

impl ConfigSource for FileSource {
    fn get_object(&self, key: &str) -> Result<Option<ConfigValue>, SourceError> {
        match self.read_tree()? {
            Some(tree) => section_of(&tree, key, &self.origin()),
            None => Ok(None),
        }
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

/// Stack configuration held in memory. Used by tests and by embedders that
/// assemble the tree themselves.
#[derive(Debug, Clone)]
pub struct MemorySource {
    tree: ConfigValue,
}

impl MemorySource {
    /// Wrap an already-built tree.
    pub fn new(tree: ConfigValue) -> Self {
        Self { tree }
    }

    /// A source with nothing in it.
    pub fn empty() -> Self {
        Self {
            tree: ConfigValue::Null,
        }
    }
}

impl ConfigSource for MemorySource {
    fn get_object(&self, key: &str) -> Result<Option<ConfigValue>, SourceError> {
        section_of(&self.tree, key, &self.origin())
    }

    fn origin(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_stack(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn file_source_reads_yaml_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "project:\n  name: demo\naws:\n  enabled: true\n");

        let source = FileSource::new(&path);
        let root = source.get_object("").unwrap().unwrap();
        assert_eq!(
            root.get_path("project.name"),
            Some(&ConfigValue::from("demo"))
        );
        assert_eq!(root.get_path("aws.enabled"), Some(&ConfigValue::from(true)));
    }

    #[test]
    fn file_source_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.json", r#"{"project": {"name": "demo"}}"#);

        let source = FileSource::new(&path);
        let project = source.get_object("project").unwrap().unwrap();
        assert_eq!(project.get("name"), Some(&ConfigValue::from("demo")));
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.yaml"));
        assert!(source.get_object("").unwrap().is_none());
        assert!(source.get_object("aws").unwrap().is_none());
    }

    #[test]
    fn empty_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "");
        let source = FileSource::new(&path);
        assert!(source.get_object("").unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "project: [unclosed\n");
        let source = FileSource::new(&path);
        assert!(matches!(
            source.get_object(""),
            Err(SourceError::Parse { .. })
        ));
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "- a\n- b\n");
        let source = FileSource::new(&path);
        let err = source.get_object("").unwrap_err();
        assert!(matches!(err, SourceError::NotAMapping { ref key, .. } if key.is_empty()));
    }

    #[test]
    fn scalar_section_is_rejected_but_null_section_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "aws: 42\nazure:\n");
        let source = FileSource::new(&path);
        assert!(matches!(
            source.get_object("aws"),
            Err(SourceError::NotAMapping { ref key, found: "integer", .. }) if key == "aws"
        ));
        assert!(source.get_object("azure").unwrap().is_none());
        assert!(source.get_object("gcp").unwrap().is_none());
    }

    #[test]
    fn file_source_observes_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "project:\n  name: before\n");
        let source = FileSource::new(&path);
        assert_eq!(
            source.get_object("project").unwrap().unwrap().get("name"),
            Some(&ConfigValue::from("before"))
        );

        write_stack(&dir, "stack.yaml", "project:\n  name: after\n");
        assert_eq!(
            source.get_object("project").unwrap().unwrap().get("name"),
            Some(&ConfigValue::from("after"))
        );
    }

    #[test]
    fn discover_prefers_an_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stack(&dir, "stack.yaml", "project: {}\n");
        let source = FileSource::discover(&path);
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn memory_source_serves_sections() {
        let tree = ConfigValue::mapping([(
            ConfigValue::from("aws"),
            ConfigValue::mapping([(ConfigValue::from("enabled"), ConfigValue::from(true))]),
        )]);
        let source = MemorySource::new(tree.clone());
        assert_eq!(source.get_object("").unwrap(), Some(tree));
        assert!(source.get_object("azure").unwrap().is_none());
        assert_eq!(source.origin(), "memory");
    }

    #[test]
    fn empty_memory_source_is_absent() {
        let source = MemorySource::empty();
        assert!(source.get_object("").unwrap().is_none());
    }
}
