//! Filesystem primitives for docsync
//!
//! Provides the on-disk layout names of a document directory, canonical
//! content checksums, atomic writes and a format-agnostic config store.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;

pub use checksum::{compute_bytes_checksum, compute_file_checksum};
pub use config::ConfigStore;
pub use constants::DocPath;
pub use error::{Error, Result};
