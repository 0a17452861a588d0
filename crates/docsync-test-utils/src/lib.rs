//! Shared test utilities for the docsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures at three realism levels
//! - [`document`]: [`TestDocument`](document::TestDocument) builder for document trees

pub mod document;
pub mod git;
