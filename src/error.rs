//! Error types for the md2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2PdfError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing input file, no usable engine, render failure on a mandatory
//!   engine). Returned as `Err(Md2PdfError)` from the top-level `convert*`
//!   functions.
//!
//! * [`EngineError`] — **Per-engine**: one PDF engine failed, distinguishing
//!   "engine unavailable" (browser binary missing, `weasyprint` not on PATH)
//!   from "render error" (the engine ran and blew up). The distinction is
//!   what drives fallback: under `--engine auto` an unavailable or failing
//!   browser hands the document to the static engine; under an explicit
//!   engine choice the same error is promoted to fatal.
//!
//! The separation lets the dispatcher decide recovery per the selection
//! mode instead of string-matching error messages.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2pdf library.
///
/// Engine-level failures use [`EngineError`] while fallback is still
/// possible; they are promoted into this type once no engine remains.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input Markdown file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// `--cover` was given but the cover Markdown file does not exist.
    #[error("Cover file not found: '{path}'\nPass an existing Markdown file to --cover.")]
    CoverNotFound { path: PathBuf },

    /// `--css` was given but the stylesheet file does not exist.
    #[error("CSS file not found: '{path}'\nPass an existing stylesheet to --css.")]
    CssNotFound { path: PathBuf },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// An explicitly requested engine cannot be used at all.
    #[error("PDF engine '{engine}' is not available.\n{hint}")]
    EngineUnavailable { engine: &'static str, hint: String },

    /// `--engine auto` exhausted every engine.
    #[error(
        "No PDF engine available.\n\
         chromium: {browser_reason}\n\
         weasyprint: {static_reason}\n\
         Install a Chromium/Chrome binary or the `weasyprint` executable."
    )]
    NoEngineAvailable {
        browser_reason: String,
        static_reason: String,
    },

    /// The engine ran but failed to produce a PDF. Never retried.
    #[error("PDF engine '{engine}' failed to render: {detail}")]
    RenderFailed { engine: &'static str, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure from a single PDF engine attempt.
///
/// Produced by [`crate::engine::PdfEngine::render`]; the dispatcher in
/// [`crate::engine`] decides whether it triggers fallback or becomes fatal.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The engine cannot run here at all (missing binary, launch failure).
    #[error("engine '{engine}' unavailable: {reason}")]
    Unavailable { engine: &'static str, reason: String },

    /// The engine ran and failed mid-render.
    #[error("engine '{engine}' render error: {detail}")]
    Render { engine: &'static str, detail: String },
}

impl EngineError {
    /// Name of the engine that produced this error.
    pub fn engine(&self) -> &'static str {
        match self {
            EngineError::Unavailable { engine, .. } | EngineError::Render { engine, .. } => engine,
        }
    }

    /// Promote to a fatal error, for when the engine was mandatory.
    pub fn into_fatal(self) -> Md2PdfError {
        match self {
            EngineError::Unavailable { engine, reason } => Md2PdfError::EngineUnavailable {
                engine,
                hint: reason,
            },
            EngineError::Render { engine, detail } => Md2PdfError::RenderFailed { engine, detail },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_display() {
        let e = Md2PdfError::InputNotFound {
            path: PathBuf::from("notes.md"),
        };
        assert!(e.to_string().contains("notes.md"));
    }

    #[test]
    fn no_engine_available_names_both_engines() {
        let e = Md2PdfError::NoEngineAvailable {
            browser_reason: "no chrome binary".into(),
            static_reason: "weasyprint not on PATH".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("no chrome binary"));
        assert!(msg.contains("weasyprint not on PATH"));
    }

    #[test]
    fn unavailable_promotes_to_engine_unavailable() {
        let e = EngineError::Unavailable {
            engine: "chromium",
            reason: "launch failed".into(),
        };
        assert!(matches!(
            e.into_fatal(),
            Md2PdfError::EngineUnavailable {
                engine: "chromium",
                ..
            }
        ));
    }

    #[test]
    fn render_promotes_to_render_failed() {
        let e = EngineError::Render {
            engine: "weasyprint",
            detail: "exit status 1".into(),
        };
        let fatal = e.into_fatal();
        assert!(matches!(
            fatal,
            Md2PdfError::RenderFailed {
                engine: "weasyprint",
                ..
            }
        ));
        assert!(fatal.to_string().contains("exit status 1"));
    }
}
