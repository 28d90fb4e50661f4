//! # md2pdf
//!
//! Convert Markdown documents to print-quality PDF.
//!
//! ## Why this crate?
//!
//! Editors with live Markdown previews are forgiving: inconsistent list
//! indentation still nests, single newlines still break lines, `mermaid`
//! fences still draw diagrams. Naïve Markdown-to-PDF conversion loses all
//! of that. This crate repairs list structure before parsing, preserves
//! in-paragraph line breaks, layers preview-style CSS, and renders through
//! a scriptable headless browser so diagrams and math come out typeset —
//! falling back to a static HTML/CSS engine when no browser is available.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Input      read source, optional cover, optional user CSS
//!  ├─ 2. Normalize  repair nested-list indentation and markers
//!  ├─ 3. Convert    CommonMark+GFM to HTML, soft breaks become <br>
//!  ├─ 4. Style      base CSS + theme layer + user override, in cascade order
//!  ├─ 5. Assemble   one standalone HTML document (+ Mermaid/math scripts)
//!  └─ 6. Render     chromium (scripts run) or weasyprint (static), auto-fallback
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2pdf::{convert_to_file, RenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::default();
//!     let stats = convert_to_file("notes.md", "notes.pdf", &config).await?;
//!     eprintln!("rendered by {} in {}ms", stats.engine, stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Engines
//!
//! | Engine | Scripts | Needs |
//! |--------|---------|-------|
//! | `chromium` | Mermaid, MathJax/KaTeX, highlight.js all render | a Chrome/Chromium binary |
//! | `weasyprint` | none execute (documented degradation) | the `weasyprint` executable |
//! | `auto` (default) | chromium first, weasyprint as fallback | either of the above |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CssLength, Engine, LengthUnit, MathMode, PageMargins, PageSize, RenderConfig,
    RenderConfigBuilder, Theme,
};
pub use convert::{build_document, convert, convert_sync, convert_to_file, default_output_path};
pub use error::{EngineError, Md2PdfError};
pub use output::{ConversionOutput, RenderStats};
pub use pipeline::assemble::AssembledDocument;
