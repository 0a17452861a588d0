//! Settings validation for document trees
//!
//! [`validate_tree`] walks the root, template and slot nodes of a document
//! and reports every path collision and settings drift it finds. Drift
//! issues carry a [`Fix`] that [`apply_fixes`] can apply; collisions never do.

mod issue;
mod tree;

pub use issue::{Fix, Issue, IssueKind, apply_fixes};
pub use tree::{validate_node, validate_tree};
