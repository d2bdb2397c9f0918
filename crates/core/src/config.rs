//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services. Core code
//! never reads environment variables itself; the CLI does that and builds a `CoreConfig`.

use crate::constants::DEFAULT_TEMPLATE_DIR;
use crate::{TemplateError, TemplateResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    template_dir: PathBuf,
    library_path: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Validation` if `template_dir` is empty or names an existing
    /// non-directory, or if `library_path` is given but is not a file.
    pub fn new(template_dir: PathBuf, library_path: Option<PathBuf>) -> TemplateResult<Self> {
        if template_dir.as_os_str().is_empty() {
            return Err(TemplateError::Validation(
                "template directory cannot be empty".into(),
            ));
        }
        if template_dir.exists() && !template_dir.is_dir() {
            return Err(TemplateError::Validation(format!(
                "template directory {} is not a directory",
                template_dir.display()
            )));
        }
        if let Some(path) = &library_path {
            if !path.is_file() {
                return Err(TemplateError::Validation(format!(
                    "library file {} does not exist",
                    path.display()
                )));
            }
        }

        Ok(Self {
            template_dir,
            library_path,
        })
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn library_path(&self) -> Option<&Path> {
        self.library_path.as_deref()
    }
}

/// Resolve the template directory from an optional override value.
///
/// Blank or missing values fall back to [`DEFAULT_TEMPLATE_DIR`].
pub fn template_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR))
}

/// Resolve the optional library path; blank values mean "no library".
pub fn library_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn env_values_fall_back_to_defaults() {
        assert_eq!(
            template_dir_from_env_value(None),
            PathBuf::from(DEFAULT_TEMPLATE_DIR)
        );
        assert_eq!(
            template_dir_from_env_value(Some("  ".into())),
            PathBuf::from(DEFAULT_TEMPLATE_DIR)
        );
        assert_eq!(
            template_dir_from_env_value(Some(" /srv/templates ".into())),
            PathBuf::from("/srv/templates")
        );
        assert_eq!(library_path_from_env_value(Some(String::new())), None);
    }

    #[test]
    fn accepts_missing_template_dir() {
        let temp = TempDir::new().unwrap();
        let config = CoreConfig::new(temp.path().join("not-yet"), None).unwrap();
        assert!(config.template_dir().ends_with("not-yet"));
        assert!(config.library_path().is_none());
    }

    #[test]
    fn rejects_file_as_template_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            CoreConfig::new(file, None),
            Err(TemplateError::Validation(_))
        ));
    }

    #[test]
    fn rejects_missing_library_file() {
        let temp = TempDir::new().unwrap();
        let result = CoreConfig::new(temp.path().into(), Some(temp.path().join("library.yaml")));
        assert!(matches!(result, Err(TemplateError::Validation(_))));

        std::fs::write(temp.path().join("library.yaml"), "[]").unwrap();
        let config =
            CoreConfig::new(temp.path().into(), Some(temp.path().join("library.yaml"))).unwrap();
        assert!(config.library_path().is_some());
    }

    #[test]
    fn rejects_empty_template_dir() {
        assert!(CoreConfig::new(PathBuf::new(), None).is_err());
    }
}
