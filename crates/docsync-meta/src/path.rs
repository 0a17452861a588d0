//! Document path handling
//!
//! Document paths are the server-side addresses of documents (`/blog/post`).
//! They are always absolute, use `/` separators and carry no trailing slash
//! except for the root document `/`.

/// Normalize a document path.
///
/// Trims whitespace, ensures a leading `/`, collapses repeated separators and
/// strips any trailing `/`. An empty input yields the root path `/`.
pub fn normalize_document_path(raw: &str) -> String {
    let segments: Vec<&str> = raw.trim().split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// Default path for a `template` or `slot` child of `parent`.
///
/// `default_child_path("/blog", "template")` is `/blog/template`; the root
/// document yields `/template`.
pub fn default_child_path(parent: &str, child_dir: &str) -> String {
    let parent = normalize_document_path(parent);
    if parent == "/" {
        format!("/{child_dir}")
    } else {
        format!("{parent}/{child_dir}")
    }
}

/// Base URL of a document on a server: server URL without trailing slash
/// followed by the normalized path, with the root path contributing nothing.
pub fn document_base(server_url: &str, path: &str) -> String {
    let server = server_url.trim_end_matches('/');
    let path = normalize_document_path(path);
    if path == "/" {
        server.to_string()
    } else {
        format!("{server}{path}")
    }
}
