//! Document metadata for docsync
//!
//! - [`Settings`]: the persisted `settings.json` of one document directory
//! - [`PathContext`]: one node (root, template or slot) of a document tree
//! - [`Target`] / [`TargetsFile`]: where a document is synchronized to

pub mod config;
pub mod context;
pub mod error;
pub mod path;
pub mod settings;

pub use config::{Credentials, Target, TargetConfig, TargetsFile};
pub use context::{PathContext, Reference};
pub use error::{Error, Result};
pub use path::{default_child_path, document_base, normalize_document_path};
pub use settings::Settings;
