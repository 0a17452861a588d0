//! The in-memory document produced by assembly

use std::fmt;

use serde::Serialize;

/// Markup family of the content file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Markdown,
    Html,
    Plain,
}

impl ContentType {
    /// Classify by file extension; `index.html` and `.eta` count as HTML.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => ContentType::Markdown,
            "html" | "htm" | "eta" => ContentType::Html,
            _ => ContentType::Plain,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::Markdown => "markdown",
            ContentType::Html => "html",
            ContentType::Plain => "plain",
        })
    }
}

/// Format of the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Yaml,
    Json,
    Toml,
}

impl DataType {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(DataType::Yaml),
            "json" => Some(DataType::Json),
            "toml" => Some(DataType::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataType::Yaml => "yaml",
            DataType::Json => "json",
            DataType::Toml => "toml",
        })
    }
}

/// Mime type served for an output extension such as `.html`.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// A document assembled from local files.
///
/// `template` and `slot` are only ever populated one level deep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub path: Option<String>,
    pub content: String,
    pub data: Option<String>,
    pub style: Option<String>,
    pub script: Option<String>,
    pub server: Option<String>,
    pub content_type: ContentType,
    pub data_type: Option<DataType>,
    pub has_eta: bool,
    pub mime_type: String,
    pub extension: String,
    pub uploads: Vec<String>,
    /// Locally assembled documents are never committed
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<Document>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Box<Document>>,
}
