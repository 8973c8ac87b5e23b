//! # Document Loading
//!
//! Form snapshots and parse options are read from JSON or YAML files.
//! The format follows the extension: `.yaml`/`.yml` is YAML, anything
//! else is JSON.

use std::path::{Path, PathBuf};

use formkit::{HeadlessForm, ParseOptions};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error loading a document from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML, or not the expected shape.
    #[error("invalid {what} in '{}': {reason}", .path.display())]
    Yaml {
        /// Path that was parsed.
        path: PathBuf,
        /// What the document should have described.
        what: &'static str,
        /// Parser message.
        reason: String,
    },

    /// The file is not valid JSON, or not the expected shape.
    #[error("invalid {what} in '{}': {reason}", .path.display())]
    Json {
        /// Path that was parsed.
        path: PathBuf,
        /// What the document should have described.
        what: &'static str,
        /// Parser message.
        reason: String,
    },
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Read and deserialize a JSON or YAML document.
///
/// `what` names the document in error messages.
pub fn load_document<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml {
            path: path.to_path_buf(),
            what,
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            what,
            reason: e.to_string(),
        })
    }
}

/// Load parse options, or the defaults when no path is given.
pub fn load_options(path: Option<&Path>) -> Result<ParseOptions, ConfigError> {
    match path {
        Some(path) => {
            let options: ParseOptions = load_document(path, "parse options")?;
            tracing::debug!(
                path = %path.display(),
                types = options.types.len(),
                "loaded parse options"
            );
            Ok(options)
        }
        None => Ok(ParseOptions::default()),
    }
}

/// Load a headless form snapshot.
pub fn load_form(path: &Path) -> Result<HeadlessForm, ConfigError> {
    load_document(path, "form snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "options.yaml",
            r#"
draft: draft7
types:
  person:
    $schema:
      type: object
      properties:
        age: { type: integer }
"#,
        );
        let options = load_options(Some(&path)).unwrap();
        assert_eq!(options.draft, formkit::SchemaDraft::Draft7);
        assert!(options.schema_for("person").is_some());
        assert_eq!(options.record_type_attribute, "data-nopg-type");
    }

    #[test]
    fn test_load_json_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "form.json",
            r#"{"attributes": {"data-nopg-type": "person"},
                "elements": [{"attributes": {"name": "age"}, "value": "4"}]}"#,
        );
        let form = load_form(&path).unwrap();
        assert_eq!(form.elements.len(), 1);
        assert_eq!(form.elements[0].key(), Some("age"));
    }

    #[test]
    fn test_missing_options_file_defaults() {
        let options = load_options(None).unwrap();
        assert!(options.types.is_empty());
    }

    #[test]
    fn test_unreadable_file() {
        let err = load_form(Path::new("/nonexistent/form.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "form.yml", "elements: [unclosed");
        let err = load_form(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("form.yml"));
        assert!(err.to_string().contains("form snapshot"));
    }

    #[test]
    fn test_wrong_shape_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "options.json", r#"{"types": []}"#);
        let err = load_options(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }
}
