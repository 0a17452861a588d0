use std::path::PathBuf;

use docsync_core::{AssembleOptions, Error, assemble};
use docsync_test_utils::document::TestDocument;
use pretty_assertions::assert_eq;
use serde_json::json;

fn root_with_template_pointer() -> TestDocument {
    let doc = TestDocument::new();
    doc.settings("", json!({"path": "/page", "template_path": "/t"}))
        .write("content.md", "# Page");
    doc
}

#[test]
fn missing_template_without_resolver_is_not_found() {
    let doc = root_with_template_pointer();

    let err = assemble(doc.root(), AssembleOptions::default()).unwrap_err();
    match err {
        Error::DirectoryNotFound { path, dir } => {
            assert_eq!(path, "/t");
            assert_eq!(dir, doc.root().join("template"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn resolver_locates_template_elsewhere() {
    let doc = root_with_template_pointer();
    let layouts = TestDocument::new();
    layouts
        .settings("t", json!({"path": "/t", "slot_path": "/ignored"}))
        .write("t/content.html", "<main><%~ it.content %></main>");

    let base = layouts.root().to_path_buf();
    let resolver = move |path: &str| -> Option<PathBuf> {
        (path == "/t").then(|| base.join("t"))
    };

    let document = assemble(doc.root(), AssembleOptions::with_resolver(&resolver)).unwrap();
    let template = document.template.expect("template assembled");
    assert_eq!(template.path.as_deref(), Some("/t"));
    assert!(template.has_eta);
    assert!(template.slot.is_none());
    assert!(document.slot.is_none());
}

#[test]
fn document_serializes_for_json_output() {
    let doc = TestDocument::minimal("/page");
    doc.write("data.toml", "title = 'x'");

    let document = assemble(doc.root(), AssembleOptions::default()).unwrap();
    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["content_type"], json!("markdown"));
    assert_eq!(value["data_type"], json!("toml"));
    assert_eq!(value["draft"], json!(true));
    assert!(value.get("template").is_none());
}
