//! Document assembly from a local directory
//!
//! [`assemble`] reads the content, data, style and script files of one
//! document directory and, for a top-level call, the template and slot
//! documents it points at. Sub-documents come from the local `template/`
//! and `slot/` directories, or from a [`DocumentResolver`] when the local
//! directory is absent.

mod document;
mod eta;

use std::path::{Path, PathBuf};

use docsync_fs::constants::{CONTENT_STEM, DATA_STEM};
use docsync_fs::{DocPath, io};
use docsync_meta::{Reference, Settings, normalize_document_path};

use crate::{Error, Result};

pub use document::{ContentType, DataType, Document, mime_for_extension};
pub use eta::detect_eta;

/// Maps a document path to the directory holding that document.
///
/// Used when assembling inside a graph of many document directories rather
/// than one standalone tree.
pub trait DocumentResolver {
    fn resolve(&self, path: &str) -> Option<PathBuf>;
}

impl<F> DocumentResolver for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        self(path)
    }
}

/// Options for [`assemble`].
#[derive(Default, Clone, Copy)]
pub struct AssembleOptions<'a> {
    /// Set for template/slot assembly; suppresses further composition
    pub nested: bool,
    pub resolver: Option<&'a dyn DocumentResolver>,
}

impl<'a> AssembleOptions<'a> {
    pub fn with_resolver(resolver: &'a dyn DocumentResolver) -> Self {
        Self {
            nested: false,
            resolver: Some(resolver),
        }
    }

    fn nested(self) -> Self {
        Self {
            nested: true,
            ..self
        }
    }
}

/// Assemble the document stored in `dir`.
pub fn assemble(dir: &Path, options: AssembleOptions<'_>) -> Result<Document> {
    let files = io::list_files(dir)?;
    let settings = Settings::load_optional(dir)?.unwrap_or_default();

    let content_file = single_content_file(dir, &files)?;
    let data_file = single_data_file(dir, &files)?;

    let content_ext = extension_of(&content_file);
    let content_type = ContentType::from_extension(content_ext);
    let content = io::read_text(&dir.join(&content_file))?;

    let extension = match &settings.extension {
        Some(explicit) => explicit.clone(),
        None if content_type != ContentType::Plain => ".html".to_string(),
        None if content_ext.is_empty() => ".txt".to_string(),
        None => format!(".{content_ext}"),
    };

    let mut document = Document {
        path: settings.path.as_deref().map(normalize_document_path),
        has_eta: detect_eta(&content),
        content,
        data: data_file
            .as_ref()
            .map(|name| io::read_text(&dir.join(name)))
            .transpose()?,
        style: io::read_text_optional(&DocPath::Style.under(dir))?,
        script: io::read_text_optional(&DocPath::Script.under(dir))?,
        server: io::read_text_optional(&DocPath::Server.under(dir))?,
        content_type,
        data_type: data_file
            .as_deref()
            .and_then(|name| DataType::from_extension(extension_of(name))),
        mime_type: mime_for_extension(&extension).to_string(),
        extension,
        uploads: settings.uploads.clone().unwrap_or_default(),
        draft: true,
        template: None,
        slot: None,
    };

    if !options.nested {
        document.template = compose(dir, &settings, Reference::Template, options)?;
        document.slot = compose(dir, &settings, Reference::Slot, options)?;
    }

    tracing::debug!(dir = %dir.display(), nested = options.nested, "Assembled document");
    Ok(document)
}

fn compose(
    dir: &Path,
    settings: &Settings,
    child: Reference,
    options: AssembleOptions<'_>,
) -> Result<Option<Box<Document>>> {
    let Some(expected) = settings.pointer(child).map(normalize_document_path) else {
        return Ok(None);
    };

    let local = dir.join(child.dir_name());
    if local.is_dir() {
        let document = assemble(&local, options.nested())?;
        let actual = document.path.clone().unwrap_or_default();
        if actual != expected {
            return Err(Error::PathMismatch {
                dir: local,
                expected,
                actual,
            });
        }
        return Ok(Some(Box::new(document)));
    }

    match options.resolver {
        None => Err(Error::DirectoryNotFound {
            path: expected,
            dir: local,
        }),
        Some(resolver) => match resolver.resolve(&expected) {
            Some(found) => Ok(Some(Box::new(assemble(&found, options.nested())?))),
            None => {
                tracing::debug!(path = %expected, "Composition target not found, skipping");
                Ok(None)
            }
        },
    }
}

pub(crate) fn single_content_file(dir: &Path, files: &[String]) -> Result<String> {
    let mut candidates: Vec<String> = files
        .iter()
        .filter(|name| stem_of(name) == CONTENT_STEM || name.as_str() == DocPath::IndexHtml.as_str())
        .cloned()
        .collect();
    match candidates.len() {
        0 => Err(Error::ContentMissing {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::ContentAmbiguous {
            dir: dir.to_path_buf(),
            files: candidates,
        }),
    }
}

pub(crate) fn single_data_file(dir: &Path, files: &[String]) -> Result<Option<String>> {
    let candidates: Vec<String> = files
        .iter()
        .filter(|name| stem_of(name) == DATA_STEM)
        .cloned()
        .collect();
    if candidates.len() > 1 {
        return Err(Error::DataAmbiguous {
            dir: dir.to_path_buf(),
            files: candidates,
        });
    }
    Ok(candidates.into_iter().next())
}

fn stem_of(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
}

fn extension_of(name: &str) -> &str {
    Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
}
