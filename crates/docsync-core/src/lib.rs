//! Validation, assembly and synchronization core for docsync
//!
//! A document is a directory holding one content file, `settings.json` and
//! optional data, style, script and server files. It may compose a template
//! and a slot document kept in its `template/` and `slot/` subdirectories.
//!
//! # Modules
//!
//! - [`validate`]: collision and drift checks across the document tree, with fixes
//! - [`assemble`]: build an in-memory [`Document`](assemble::Document) from files
//! - [`transport`]: git and archive primitives moving one node at a time
//! - [`assets`]: hash-based upload sync
//! - [`sync`]: push and pull orchestration
//! - [`client`]: HTTP access to the document server

pub mod assemble;
pub mod assets;
pub mod client;
pub mod error;
pub mod sync;
pub mod transport;
pub mod validate;

pub use assemble::{AssembleOptions, Document, DocumentResolver, assemble};
pub use assets::AssetReport;
pub use client::ServerClient;
pub use error::{Error, Result};
pub use sync::{
    PullOptions, PullReport, PushOptions, PushReport, SyncContext, UploadPlan, pull, push,
};
pub use transport::{TransportChoice, TransportKind, detect_transport};
pub use validate::{Fix, Issue, IssueKind, apply_fixes, validate_tree};
