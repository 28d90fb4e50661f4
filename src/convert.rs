//! Conversion entry points.
//!
//! One conversion run is single-shot and synchronous in spirit: one input
//! document, one output PDF, no state shared with any other run. The only
//! long-blocking step — the PDF engine — runs under `spawn_blocking` so a
//! library caller's async runtime is never stalled by a browser launch or
//! a subprocess wait.

use crate::config::RenderConfig;
use crate::engine;
use crate::error::Md2PdfError;
use crate::output::{ConversionOutput, RenderStats};
use crate::pipeline::assemble::{assemble, AssembledDocument};
use crate::pipeline::{input, markdown, normalize, style};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Build the assembled HTML document without rendering it.
///
/// Runs the whole Markdown pipeline: input resolution (every input error
/// surfaces here, before any engine is touched), list normalisation,
/// HTML conversion for body and optional cover, style composition, and
/// assembly.
pub fn build_document(
    input_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<AssembledDocument, Md2PdfError> {
    let input_path = input_path.as_ref();

    // ── Step 1: Resolve inputs ───────────────────────────────────────────
    let source = input::read_source(input_path)?;
    let cover = config
        .cover
        .as_deref()
        .map(input::read_cover)
        .transpose()?;
    let user_css = config
        .css
        .as_deref()
        .map(input::read_user_css)
        .transpose()?;

    // ── Step 2: Normalise and convert ────────────────────────────────────
    let body_html = markdown::to_html_fragment(&normalize::normalize(&source.text));
    let cover_html = cover
        .as_ref()
        .map(|c| markdown::to_html_fragment(&normalize::normalize(&c.text)));
    debug!(
        body_bytes = body_html.len(),
        has_cover = cover_html.is_some(),
        "converted Markdown to HTML"
    );

    // ── Step 3: Compose style ────────────────────────────────────────────
    let bundle = style::compose(
        config.theme,
        user_css.as_deref(),
        config.page_size,
        &config.margin,
    );

    // ── Step 4: Assemble ─────────────────────────────────────────────────
    let doc = assemble(
        &body_html,
        cover_html.as_deref(),
        &bundle,
        source.base_url().as_deref(),
        config,
    );
    debug!(html_bytes = doc.html.len(), "assembled document");
    Ok(doc)
}

/// Convert a Markdown file to PDF bytes.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(Md2PdfError)` for every fatal condition in the taxonomy:
/// input errors (before any rendering attempt), an unavailable mandatory
/// engine, a render failure, or — under `auto` — no usable engine at all.
pub async fn convert(
    input_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Steps 1-4: Markdown pipeline ─────────────────────────────────────
    let pipeline_start = Instant::now();
    let doc = build_document(input_path, config)?;
    let pipeline_duration_ms = pipeline_start.elapsed().as_millis() as u64;

    // ── Step 5: Render ───────────────────────────────────────────────────
    // Engine work is blocking (browser drive or subprocess wait); keep it
    // off the async worker threads.
    let render_start = Instant::now();
    let doc_for_render = doc.clone();
    let config_for_render = config.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        engine::render_document(&doc_for_render, &config_for_render)
    })
    .await
    .map_err(|e| Md2PdfError::Internal(format!("Render task panicked: {e}")))??;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 6: Stats ────────────────────────────────────────────────────
    let stats = RenderStats {
        engine: outcome.engine.to_string(),
        fell_back: outcome.fell_back,
        pdf_bytes: outcome.pdf.len(),
        html_bytes: doc.html.len(),
        pipeline_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        engine = outcome.engine,
        fell_back = outcome.fell_back,
        total_ms = stats.total_duration_ms,
        "conversion complete"
    );

    Ok(ConversionOutput {
        pdf: outcome.pdf,
        html: doc.html,
        stats,
    })
}

/// Convert a Markdown file and write the PDF to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files. When
/// `config.debug_html` is set, the assembled HTML is persisted beside the
/// output with an `.html` extension *before* the render, so it survives a
/// failing PDF step; a failed debug write is logged and never aborts the
/// run.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<RenderStats, Md2PdfError> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Md2PdfError::OutputWriteFailed {
                    path: output_path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    // Debug byproduct before the render attempt, so it survives a failing
    // PDF step. The pipeline is pure, so building the document again inside
    // `convert` is cheap and keeps the entry points simple.
    if config.debug_html {
        let doc = build_document(input_path, config)?;
        let debug_path = output_path.with_extension("html");
        match tokio::fs::write(&debug_path, &doc.html).await {
            Ok(()) => info!("Debug HTML written: {}", debug_path.display()),
            Err(e) => warn!(
                "Failed to write debug HTML '{}': {e}",
                debug_path.display()
            ),
        }
    }

    let output = convert(input_path, config).await?;

    let tmp_path = output_path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf)
        .await
        .map_err(|e| Md2PdfError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, output_path)
        .await
        .map_err(|e| Md2PdfError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    info!("PDF generated: {}", output_path.display());
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Md2PdfError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_path, config))
}

/// Default output path: the input with a `.pdf` extension.
pub fn default_output_path(input_path: &Path) -> PathBuf {
    input_path.with_extension("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MathMode;
    use std::fs;

    fn write_md(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn build_document_missing_input_fails_before_rendering() {
        let err = build_document("/no/such/input.md", &RenderConfig::default());
        assert!(matches!(err, Err(Md2PdfError::InputNotFound { .. })));
    }

    #[test]
    fn build_document_missing_cover_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_md(&dir, "doc.md", "# Hi\n");
        let config = RenderConfig::builder()
            .cover(dir.path().join("missing-cover.md"))
            .build()
            .unwrap();
        let err = build_document(&input, &config);
        assert!(matches!(err, Err(Md2PdfError::CoverNotFound { .. })));
    }

    #[test]
    fn build_document_produces_standalone_html() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_md(&dir, "doc.md", "# Title\n\nBody text\n");
        let doc = build_document(&input, &RenderConfig::default()).unwrap();
        assert!(doc.html.starts_with("<!DOCTYPE html>"));
        assert!(doc.html.contains("<h1>Title</h1>"));
        assert!(doc.html.contains("<base href=\"file://"));
    }

    #[test]
    fn cover_content_precedes_body_across_a_page_break() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_md(&dir, "doc.md", "# Body heading\n");
        let cover = write_md(&dir, "cover.md", "# Cover heading\n");
        let config = RenderConfig::builder().cover(cover).build().unwrap();

        let doc = build_document(&input, &config).unwrap();
        let cover_pos = doc.html.find("Cover heading").unwrap();
        let break_pos = doc.html.find("page-break\"></div>").unwrap();
        let body_pos = doc.html.find("Body heading").unwrap();
        assert!(cover_pos < break_pos && break_pos < body_pos);
    }

    #[test]
    fn user_css_lands_after_theme_css() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_md(&dir, "doc.md", "text\n");
        let css = dir.path().join("extra.css");
        fs::write(&css, ".markdown-body { color: teal; }").unwrap();
        let config = RenderConfig::builder().css(css).build().unwrap();

        let doc = build_document(&input, &config).unwrap();
        let user_pos = doc.html.find("color: teal").unwrap();
        let theme_pos = doc.html.find("list-style-type: circle").unwrap();
        assert!(user_pos > theme_pos);
    }

    #[test]
    fn nested_list_scenario_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_md(&dir, "doc.md", "- a\n  - b\n    - c\n");
        let doc = build_document(&input, &RenderConfig::default()).unwrap();
        assert_eq!(doc.html.matches("<ul>").count(), 3);
    }

    #[test]
    fn script_free_configuration_emits_no_script_features() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_md(&dir, "doc.md", "plain\n");
        let config = RenderConfig::builder()
            .math(MathMode::None)
            .mermaid(false)
            .build()
            .unwrap();
        let doc = build_document(&input, &config).unwrap();
        assert!(!doc.html.contains("mermaid"));
        assert!(!doc.html.contains("MathJax"));
        assert!(!doc.html.contains("katex"));
    }

    #[test]
    fn default_output_path_swaps_extension() {
        assert_eq!(
            default_output_path(Path::new("/tmp/notes.md")),
            PathBuf::from("/tmp/notes.pdf")
        );
    }
}
