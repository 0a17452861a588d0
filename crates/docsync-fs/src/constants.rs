//! Names of the files and directories that make up a document directory.

use std::path::{Path, PathBuf};

/// Well-known entries of a document directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocPath {
    /// `settings.json`, required in every node directory
    Settings,
    /// `index.html`, the one content file not named `content.*`
    IndexHtml,
    /// `style.css`
    Style,
    /// `script.js`
    Script,
    /// `server.js`
    Server,
    /// `uploads/` directory holding binary assets
    Uploads,
    /// `template/` sub-document directory (root node only)
    Template,
    /// `slot/` sub-document directory (root node only)
    Slot,
    /// `.git` repository marker
    GitDir,
}

impl DocPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings.json",
            Self::IndexHtml => "index.html",
            Self::Style => "style.css",
            Self::Script => "script.js",
            Self::Server => "server.js",
            Self::Uploads => "uploads",
            Self::Template => "template",
            Self::Slot => "slot",
            Self::GitDir => ".git",
        }
    }

    /// Resolve this entry inside `dir`.
    pub fn under(&self, dir: &Path) -> PathBuf {
        dir.join(self.as_str())
    }
}

/// Stem shared by every content file (`content.md`, `content.html`, ...).
pub const CONTENT_STEM: &str = "content";

/// Stem shared by every data file (`data.yaml`, `data.json`, ...).
pub const DATA_STEM: &str = "data";

impl AsRef<Path> for DocPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for DocPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
