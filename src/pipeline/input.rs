//! Input resolution: read the source, cover, and user CSS files.
//!
//! Every input error must surface before any rendering work starts, so the
//! orchestrator calls into this module first. Existence and readability are
//! checked by actually opening the file; a stat-then-read sequence would
//! race against the filesystem and report the wrong error kind on
//! permission problems.

use crate::error::Md2PdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A Markdown document as read from disk.
///
/// Immutable once read; its lifecycle ends when the pipeline turns it into
/// an HTML fragment.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Raw Markdown text.
    pub text: String,
    /// Where it came from, kept for the `<base href>` of relative assets.
    pub path: PathBuf,
}

impl SourceDocument {
    /// Directory containing the source file, as an absolute `file://` URL
    /// with a trailing slash, suitable for an HTML `<base>` tag.
    pub fn base_url(&self) -> Option<String> {
        let dir = self.path.parent()?;
        let abs = dir.canonicalize().ok()?;
        let mut url = format!("file://{}", abs.display());
        if !url.ends_with('/') {
            url.push('/');
        }
        Some(url)
    }
}

/// Read the main input document.
pub fn read_source(path: &Path) -> Result<SourceDocument, Md2PdfError> {
    let text = read_text(path, |p| Md2PdfError::InputNotFound { path: p })?;
    debug!("Read input: {} ({} bytes)", path.display(), text.len());
    Ok(SourceDocument {
        text,
        path: path.to_path_buf(),
    })
}

/// Read the optional cover document.
pub fn read_cover(path: &Path) -> Result<SourceDocument, Md2PdfError> {
    let text = read_text(path, |p| Md2PdfError::CoverNotFound { path: p })?;
    debug!("Read cover: {} ({} bytes)", path.display(), text.len());
    Ok(SourceDocument {
        text,
        path: path.to_path_buf(),
    })
}

/// Read the optional user stylesheet. Contents are passed through without
/// validation; the rendering engines tolerate malformed CSS on their own.
pub fn read_user_css(path: &Path) -> Result<String, Md2PdfError> {
    let css = read_text(path, |p| Md2PdfError::CssNotFound { path: p })?;
    debug!("Read user CSS: {} ({} bytes)", path.display(), css.len());
    Ok(css)
}

/// Read a file to a string, mapping "not found" through `missing` and
/// keeping permission problems distinct.
fn read_text(
    path: &Path,
    missing: impl FnOnce(PathBuf) -> Md2PdfError,
) -> Result<String, Md2PdfError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Md2PdfError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(missing(path.to_path_buf())),
        Err(e) => Err(Md2PdfError::Internal(format!(
            "Failed to read '{}': {e}",
            path.display()
        ))),
    }
}
