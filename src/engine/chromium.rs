//! Browser PDF engine: headless Chromium driven over the DevTools protocol.
//!
//! The assembled document is handed to the browser as a base64 `data:` URL —
//! a local payload rather than a temp-file URL, which sidesteps path and
//! permission issues entirely. After navigation the engine waits for
//! script-driven content (Mermaid, MathJax/KaTeX, fonts) with a bounded
//! readiness poll and then prints with the configured page geometry.
//!
//! ## Readiness wait
//!
//! The init scripts emitted by the assembler set `__md2pdfMermaidDone` /
//! `__md2pdfMathDone` once their rendering promises settle. The engine
//! polls a conjunction of those flags every 100 ms for at most 5 s, then
//! prints whatever is on the page. An awaited signal with a ceiling, not a
//! fixed sleep: fast documents print immediately, a wedged or offline CDN
//! cannot hang the run.
//!
//! The `Browser` handle closes the Chromium process on drop, so the
//! instance is released on every exit path, including errors mid-render.

use crate::config::{MathMode, RenderConfig};
use crate::engine::PdfEngine;
use crate::error::EngineError;
use crate::pipeline::assemble::AssembledDocument;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Upper bound on the script-readiness wait.
const SCRIPT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);
/// Interval between readiness probes.
const SCRIPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const ENGINE_NAME: &str = "chromium";

/// Headless-browser PDF engine.
#[derive(Debug, Default)]
pub struct ChromiumEngine {
    /// Explicit browser binary; `None` lets `headless_chrome` probe the
    /// usual install locations.
    browser_path: Option<PathBuf>,
}

impl ChromiumEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific browser binary instead of auto-detection.
    pub fn with_browser_path(path: impl Into<PathBuf>) -> Self {
        Self {
            browser_path: Some(path.into()),
        }
    }

    /// Honour `MD2PDF_BROWSER` when set, otherwise auto-detect.
    pub fn from_env() -> Self {
        match std::env::var_os("MD2PDF_BROWSER") {
            Some(path) if !path.is_empty() => Self::with_browser_path(PathBuf::from(path)),
            _ => Self::new(),
        }
    }

    fn launch(&self) -> Result<Browser, EngineError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(self.browser_path.clone())
            .build()
            .map_err(|e| EngineError::Unavailable {
                engine: ENGINE_NAME,
                reason: format!("invalid launch options: {e}"),
            })?;
        Browser::new(options).map_err(|e| EngineError::Unavailable {
            engine: ENGINE_NAME,
            reason: format!("failed to launch headless browser: {e}"),
        })
    }
}

impl PdfEngine for ChromiumEngine {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn render(
        &self,
        doc: &AssembledDocument,
        config: &RenderConfig,
    ) -> Result<Vec<u8>, EngineError> {
        let browser = self.launch()?;
        let tab = browser.new_tab().map_err(|e| EngineError::Unavailable {
            engine: ENGINE_NAME,
            reason: format!("failed to open a tab: {e}"),
        })?;

        let url = format!("data:text/html;base64,{}", STANDARD.encode(&doc.html));
        tab.navigate_to(&url).map_err(|e| render_error(e))?;
        tab.wait_until_navigated().map_err(|e| render_error(e))?;

        wait_for_scripts(&tab, config);

        let pdf = tab
            .print_to_pdf(Some(print_options(config)))
            .map_err(|e| render_error(e))?;
        debug!(bytes = pdf.len(), "browser print finished");
        Ok(pdf)
    }
}

fn render_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::Render {
        engine: ENGINE_NAME,
        detail: e.to_string(),
    }
}

/// Poll the readiness predicate until it holds or the ceiling passes.
fn wait_for_scripts(tab: &headless_chrome::Tab, config: &RenderConfig) {
    let expr = readiness_expression(config);
    let deadline = Instant::now() + SCRIPT_WAIT_TIMEOUT;
    loop {
        match tab.evaluate(&expr, false) {
            Ok(obj) if obj.value.as_ref().and_then(|v| v.as_bool()) == Some(true) => {
                debug!("script-driven content ready");
                return;
            }
            Ok(_) => {}
            Err(e) => debug!("readiness probe failed: {e}"),
        }
        if Instant::now() >= deadline {
            warn!(
                "script readiness wait exceeded {}s; printing current state",
                SCRIPT_WAIT_TIMEOUT.as_secs()
            );
            return;
        }
        std::thread::sleep(SCRIPT_POLL_INTERVAL);
    }
}

/// Build the JS readiness predicate for the enabled features.
///
/// Always requires the document load to have completed; each script-driven
/// feature contributes the completion flag its init snippet sets.
fn readiness_expression(config: &RenderConfig) -> String {
    let mut clauses = vec!["document.readyState === 'complete'".to_string()];
    if config.mermaid {
        clauses.push("window.__md2pdfMermaidDone === true".to_string());
    }
    if config.math != MathMode::None {
        clauses.push("window.__md2pdfMathDone === true".to_string());
    }
    clauses.join(" && ")
}

/// Map the configured geometry onto DevTools print options.
///
/// The DevTools call takes inches; margins set here win over the `@page`
/// rule (`prefer_css_page_size: false`), keeping browser output aligned
/// with the CLI flags even when a user stylesheet redefines `@page`.
fn print_options(config: &RenderConfig) -> PrintToPdfOptions {
    let (paper_width, paper_height) = config.page_size.dimensions_in();
    PrintToPdfOptions {
        landscape: Some(false),
        display_header_footer: Some(false),
        print_background: Some(true),
        scale: Some(1.0),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(config.margin.top.to_inches()),
        margin_bottom: Some(config.margin.bottom.to_inches()),
        margin_left: Some(config.margin.left.to_inches()),
        margin_right: Some(config.margin.right.to_inches()),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }
}
