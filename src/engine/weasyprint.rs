//! Static PDF engine: the external WeasyPrint renderer.
//!
//! WeasyPrint is pure HTML/CSS — no script execution, ever. Mermaid, math,
//! and syntax highlighting silently degrade to their source form here,
//! which is the documented trade for running without a browser binary.
//!
//! The document goes through a scratch directory: write `document.html`,
//! run `weasyprint document.html document.pdf`, read the bytes back. The
//! scratch directory cleans itself up on drop regardless of outcome.
//!
//! WeasyPrint stamps a creation date into the PDF metadata unless
//! `SOURCE_DATE_EPOCH` is set, so the engine pins it in the child
//! environment (only when the caller hasn't set it) — two renders of the
//! same document are byte-identical.

use crate::config::RenderConfig;
use crate::engine::PdfEngine;
use crate::error::EngineError;
use crate::pipeline::assemble::AssembledDocument;
use std::process::Command;
use tracing::debug;

const ENGINE_NAME: &str = "weasyprint";

/// Static HTML/CSS-to-PDF engine backed by the `weasyprint` executable.
#[derive(Debug)]
pub struct WeasyprintEngine {
    /// Program name or path; overridable for tests and odd installs.
    program: String,
}

impl Default for WeasyprintEngine {
    fn default() -> Self {
        Self {
            program: ENGINE_NAME.to_string(),
        }
    }
}

impl WeasyprintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable instead of `weasyprint` from PATH.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Honour `MD2PDF_WEASYPRINT` when set, otherwise use PATH lookup.
    pub fn from_env() -> Self {
        match std::env::var("MD2PDF_WEASYPRINT") {
            Ok(program) if !program.is_empty() => Self::with_program(program),
            _ => Self::new(),
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> EngineError {
        EngineError::Unavailable {
            engine: ENGINE_NAME,
            reason: reason.into(),
        }
    }

    fn render_failed(&self, detail: impl Into<String>) -> EngineError {
        EngineError::Render {
            engine: ENGINE_NAME,
            detail: detail.into(),
        }
    }
}

impl PdfEngine for WeasyprintEngine {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn render(
        &self,
        doc: &AssembledDocument,
        _config: &RenderConfig,
    ) -> Result<Vec<u8>, EngineError> {
        let scratch = tempfile::tempdir()
            .map_err(|e| self.render_failed(format!("failed to create scratch dir: {e}")))?;
        let html_path = scratch.path().join("document.html");
        let pdf_path = scratch.path().join("document.pdf");

        std::fs::write(&html_path, &doc.html)
            .map_err(|e| self.render_failed(format!("failed to write scratch HTML: {e}")))?;

        let mut cmd = Command::new(&self.program);
        cmd.arg(&html_path).arg(&pdf_path);
        if std::env::var_os("SOURCE_DATE_EPOCH").is_none() {
            cmd.env("SOURCE_DATE_EPOCH", "0");
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                self.unavailable(format!(
                    "'{}' executable not found; install it with `pip install weasyprint`",
                    self.program
                ))
            } else {
                self.render_failed(format!("failed to run '{}': {e}", self.program))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.render_failed(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let pdf = std::fs::read(&pdf_path)
            .map_err(|e| self.render_failed(format!("failed to read produced PDF: {e}")))?;
        if !pdf.starts_with(b"%PDF") {
            return Err(self.render_failed("produced file is not a PDF".to_string()));
        }
        debug!(bytes = pdf.len(), "weasyprint render finished");
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> AssembledDocument {
        AssembledDocument {
            html: "<!DOCTYPE html><html><body><p>x</p></body></html>".into(),
        }
    }

    #[test]
    fn missing_binary_is_unavailable_not_render_error() {
        let engine = WeasyprintEngine::with_program("md2pdf-no-such-binary");
        let err = engine
            .render(&doc(), &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Unavailable { .. }), "got {err:?}");
    }

    #[test]
    fn failing_binary_is_a_render_error() {
        // `false` exists everywhere, runs, and exits non-zero.
        let engine = WeasyprintEngine::with_program("false");
        let err = engine
            .render(&doc(), &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Render { .. }), "got {err:?}");
    }
}
