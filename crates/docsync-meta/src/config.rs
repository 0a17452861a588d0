//! Sync targets and their credentials
//!
//! Targets are read from a `targets.toml` file:
//!
//! ```toml
//! default = "prod"
//!
//! [targets.prod]
//! server_url = "https://docs.example.com"
//! username = "editor"
//! password = "secret"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use docsync_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable overriding the targets file location.
pub const CONFIG_ENV: &str = "DOCSYNC_CONFIG";

/// Username and password for one server.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Token for an `Authorization: Basic` header.
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One `[targets.<name>]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub server_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TargetConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

/// Contents of `targets.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetsFile {
    /// Name of the target used when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

impl TargetsFile {
    /// Default location: `$DOCSYNC_CONFIG`, else `<config_dir>/docsync/targets.toml`.
    pub fn default_location() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("docsync").join("targets.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(ConfigStore::new().load(path)?)
    }

    /// Find the named target, or the default one when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<&TargetConfig> {
        let name = match name {
            Some(name) => name,
            None => self.default.as_deref().ok_or(Error::NoDefaultTarget)?,
        };
        self.targets.get(name).ok_or_else(|| Error::TargetNotFound {
            name: name.to_string(),
        })
    }
}

/// A fully resolved destination for one sync invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub server_url: String,
    pub credentials: Credentials,
    /// Normalized document path of the root node
    pub path: String,
}

impl Target {
    pub fn new(server_url: impl Into<String>, credentials: Credentials, path: &str) -> Self {
        Self {
            server_url: server_url.into(),
            credentials,
            path: crate::normalize_document_path(path),
        }
    }

    /// Public URL of the root document.
    pub fn document_url(&self) -> String {
        crate::document_base(&self.server_url, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
default = "prod"

[targets.prod]
server_url = "https://docs.example.com"
username = "editor"
password = "hunter2"

[targets.local]
server_url = "http://localhost:8080"
"#;

    #[test]
    fn resolve_named_and_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("targets.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let file = TargetsFile::load(&path).unwrap();

        assert_eq!(file.resolve(None).unwrap().username, "editor");
        assert_eq!(
            file.resolve(Some("local")).unwrap().server_url,
            "http://localhost:8080"
        );
        assert!(matches!(
            file.resolve(Some("staging")),
            Err(Error::TargetNotFound { .. })
        ));
    }

    #[test]
    fn missing_default_is_reported() {
        let file = TargetsFile::default();
        assert!(matches!(file.resolve(None), Err(Error::NoDefaultTarget)));
    }

    #[test]
    fn basic_token_encodes_user_and_password() {
        let creds = Credentials::new("Aladdin", "open sesame");
        assert_eq!(creds.basic_token(), "QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("editor", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("editor"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn target_normalizes_path() {
        let target = Target::new("https://d.example/", Credentials::default(), "blog/");
        assert_eq!(target.path, "/blog");
        assert_eq!(target.document_url(), "https://d.example/blog");
    }
}
