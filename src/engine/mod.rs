//! PDF engines: strategy selection and fallback.
//!
//! The two production strategies — scriptable headless-browser rendering
//! and static HTML/CSS rendering — implement one [`PdfEngine`] capability,
//! and a small dispatcher owns the selection state machine instead of
//! branching at every call site:
//!
//! * explicit `--engine chromium` or `--engine weasyprint` makes that
//!   engine mandatory; any failure is fatal;
//! * `auto` (the default) tries the browser first and hands the document to
//!   the static engine on any launch or runtime failure;
//! * when every candidate is unavailable, the resulting error says so
//!   distinctly from "the engine ran and failed".
//!
//! Engines are injected as trait objects, so tests drive the dispatcher
//! with fakes and never need a browser installed.

pub mod chromium;
pub mod weasyprint;

use crate::config::{Engine, MathMode, RenderConfig};
use crate::error::{EngineError, Md2PdfError};
use crate::pipeline::assemble::AssembledDocument;
use tracing::{info, warn};

pub use chromium::ChromiumEngine;
pub use weasyprint::WeasyprintEngine;

/// One PDF-production strategy: assembled document in, PDF bytes out.
pub trait PdfEngine: Send + Sync {
    /// Stable engine name used in logs, stats, and error messages.
    fn name(&self) -> &'static str;

    /// Render the document to PDF bytes. A single attempt; no retries.
    fn render(
        &self,
        doc: &AssembledDocument,
        config: &RenderConfig,
    ) -> Result<Vec<u8>, EngineError>;
}

/// The dispatcher's result: which engine produced the bytes, and whether
/// `auto` had to abandon its first choice.
#[derive(Debug)]
pub struct EngineOutcome {
    pub pdf: Vec<u8>,
    pub engine: &'static str,
    pub fell_back: bool,
}

/// Render with the engine preference from `config`.
pub fn render_document(
    doc: &AssembledDocument,
    config: &RenderConfig,
) -> Result<EngineOutcome, Md2PdfError> {
    let (candidates, mandatory): (Vec<Box<dyn PdfEngine>>, bool) = match config.engine {
        Engine::Auto => (
            vec![
                Box::new(ChromiumEngine::from_env()),
                Box::new(WeasyprintEngine::from_env()),
            ],
            false,
        ),
        Engine::Chromium => (vec![Box::new(ChromiumEngine::from_env())], true),
        Engine::Weasyprint => (vec![Box::new(WeasyprintEngine::from_env())], true),
    };
    run_candidates(&candidates, mandatory, doc, config)
}

/// Try each candidate in order. Extracted from [`render_document`] so the
/// fallback semantics are testable with injected engines.
pub fn run_candidates(
    engines: &[Box<dyn PdfEngine>],
    mandatory: bool,
    doc: &AssembledDocument,
    config: &RenderConfig,
) -> Result<EngineOutcome, Md2PdfError> {
    let mut failures: Vec<EngineError> = Vec::new();

    for (i, engine) in engines.iter().enumerate() {
        if engine.name() == "weasyprint" && (config.mermaid || config.math != MathMode::None) {
            warn!(
                "Using WeasyPrint: JavaScript-based features (Mermaid/MathJax/KaTeX) will not render"
            );
        }
        match engine.render(doc, config) {
            Ok(pdf) => {
                info!(engine = engine.name(), bytes = pdf.len(), "PDF rendered");
                return Ok(EngineOutcome {
                    pdf,
                    engine: engine.name(),
                    fell_back: i > 0,
                });
            }
            Err(err) if mandatory => return Err(err.into_fatal()),
            Err(err) => {
                if i + 1 < engines.len() {
                    warn!(
                        engine = engine.name(),
                        error = %err,
                        "engine failed, falling back"
                    );
                }
                failures.push(err);
            }
        }
    }

    // Every candidate failed. "Nothing could even start" reads differently
    // from "an engine ran and died", so keep the two shapes apart.
    if failures
        .iter()
        .all(|e| matches!(e, EngineError::Unavailable { .. }))
        && failures.len() > 1
    {
        let reason = |e: &EngineError| match e {
            EngineError::Unavailable { reason, .. } => reason.clone(),
            EngineError::Render { detail, .. } => detail.clone(),
        };
        return Err(Md2PdfError::NoEngineAvailable {
            browser_reason: reason(&failures[0]),
            static_reason: reason(&failures[failures.len() - 1]),
        });
    }

    match failures.pop() {
        Some(last) => Err(last.into_fatal()),
        None => Err(Md2PdfError::Internal("no PDF engine candidates".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Behaviour {
        Succeed,
        Unavailable,
        RenderError,
    }

    struct FakeEngine {
        name: &'static str,
        behaviour: Behaviour,
    }

    impl PdfEngine for FakeEngine {
        fn name(&self) -> &'static str {
            self.name
        }

        fn render(
            &self,
            _doc: &AssembledDocument,
            _config: &RenderConfig,
        ) -> Result<Vec<u8>, EngineError> {
            match self.behaviour {
                Behaviour::Succeed => Ok(b"%PDF-1.7 fake".to_vec()),
                Behaviour::Unavailable => Err(EngineError::Unavailable {
                    engine: self.name,
                    reason: "not installed".into(),
                }),
                Behaviour::RenderError => Err(EngineError::Render {
                    engine: self.name,
                    detail: "boom".into(),
                }),
            }
        }
    }

    fn doc() -> AssembledDocument {
        AssembledDocument {
            html: "<html></html>".into(),
        }
    }

    fn fakes(specs: &[(&'static str, Behaviour)]) -> Vec<Box<dyn PdfEngine>> {
        specs
            .iter()
            .map(|&(name, behaviour)| {
                Box::new(FakeEngine { name, behaviour }) as Box<dyn PdfEngine>
            })
            .collect()
    }

    #[test]
    fn first_engine_success_does_not_fall_back() {
        let engines = fakes(&[
            ("chromium", Behaviour::Succeed),
            ("weasyprint", Behaviour::Succeed),
        ]);
        let out = run_candidates(&engines, false, &doc(), &RenderConfig::default()).unwrap();
        assert_eq!(out.engine, "chromium");
        assert!(!out.fell_back);
    }

    #[test]
    fn auto_falls_back_when_browser_unavailable() {
        let engines = fakes(&[
            ("chromium", Behaviour::Unavailable),
            ("weasyprint", Behaviour::Succeed),
        ]);
        let out = run_candidates(&engines, false, &doc(), &RenderConfig::default()).unwrap();
        assert_eq!(out.engine, "weasyprint");
        assert!(out.fell_back);
        assert!(out.pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn auto_falls_back_on_runtime_failure_too() {
        let engines = fakes(&[
            ("chromium", Behaviour::RenderError),
            ("weasyprint", Behaviour::Succeed),
        ]);
        let out = run_candidates(&engines, false, &doc(), &RenderConfig::default()).unwrap();
        assert_eq!(out.engine, "weasyprint");
        assert!(out.fell_back);
    }

    #[test]
    fn both_unavailable_reports_no_engine_at_all() {
        let engines = fakes(&[
            ("chromium", Behaviour::Unavailable),
            ("weasyprint", Behaviour::Unavailable),
        ]);
        let err = run_candidates(&engines, false, &doc(), &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Md2PdfError::NoEngineAvailable { .. }));
    }

    #[test]
    fn fallback_render_failure_is_a_render_error() {
        let engines = fakes(&[
            ("chromium", Behaviour::Unavailable),
            ("weasyprint", Behaviour::RenderError),
        ]);
        let err = run_candidates(&engines, false, &doc(), &RenderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Md2PdfError::RenderFailed {
                engine: "weasyprint",
                ..
            }
        ));
    }

    #[test]
    fn mandatory_engine_failure_is_fatal() {
        let engines = fakes(&[("chromium", Behaviour::Unavailable)]);
        let err = run_candidates(&engines, true, &doc(), &RenderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Md2PdfError::EngineUnavailable {
                engine: "chromium",
                ..
            }
        ));
    }

    #[test]
    fn mandatory_render_error_is_fatal_and_distinct() {
        let engines = fakes(&[("weasyprint", Behaviour::RenderError)]);
        let err = run_candidates(&engines, true, &doc(), &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Md2PdfError::RenderFailed { .. }));
    }
}
