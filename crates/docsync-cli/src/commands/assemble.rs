//! Assemble command implementation

use std::path::Path;

use colored::Colorize;
use docsync_core::{AssembleOptions, Document, assemble};

use crate::context::document_dir;
use crate::error::Result;

/// Run the assemble command
///
/// Prints a summary of the assembled tree, or the whole document as JSON.
pub fn run_assemble(cwd: &Path, dir: Option<&Path>, json: bool) -> Result<()> {
    let dir = document_dir(cwd, dir)?;
    let document = assemble(&dir, AssembleOptions::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_document("root", &document, 0);
    Ok(())
}

fn print_document(label: &str, document: &Document, depth: usize) {
    let indent = "   ".repeat(depth);
    let path = document.path.as_deref().unwrap_or("(no path)");
    println!(
        "{}{} {} {}",
        indent,
        label.bold(),
        path.cyan(),
        format!("[{} -> {}]", document.content_type, document.mime_type).dimmed()
    );

    let mut parts = Vec::new();
    if let Some(data_type) = &document.data_type {
        parts.push(format!("data: {}", data_type));
    }
    for (name, present) in [
        ("style", document.style.is_some()),
        ("script", document.script.is_some()),
        ("server", document.server.is_some()),
    ] {
        if present {
            parts.push(name.to_string());
        }
    }
    if document.has_eta {
        parts.push("eta".to_string());
    }
    if !document.uploads.is_empty() {
        parts.push(format!("{} upload(s)", document.uploads.len()));
    }
    if !parts.is_empty() {
        println!("{}   {}", indent, parts.join(", "));
    }

    if let Some(template) = &document.template {
        print_document("template", template, depth + 1);
    }
    if let Some(slot) = &document.slot {
        print_document("slot", slot, depth + 1);
    }
}
