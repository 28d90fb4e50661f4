//! End-to-end integration tests for md2pdf.
//!
//! These tests drive real PDF engines — a Chrome/Chromium install and/or
//! the `weasyprint` executable — so they are gated behind the `E2E_ENABLED`
//! environment variable plus a per-engine availability probe, and skip
//! cleanly everywhere else.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use md2pdf::engine::{run_candidates, ChromiumEngine, PdfEngine, WeasyprintEngine};
use md2pdf::{build_document, convert_to_file, Engine, RenderConfig};
use std::path::PathBuf;
use std::process::Command;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set *and* `cond` holds.
macro_rules! e2e_skip_unless {
    ($cond:expr, $what:expr) => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if !$cond {
            println!("SKIP — {} not available", $what);
            return;
        }
    };
}

fn weasyprint_available() -> bool {
    let program =
        std::env::var("MD2PDF_WEASYPRINT").unwrap_or_else(|_| "weasyprint".to_string());
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn chromium_available() -> bool {
    std::env::var_os("MD2PDF_BROWSER").is_some()
        || headless_chrome::browser::default_executable().is_ok()
}

fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const SAMPLE: &str = "# Sample\n\nFirst line\nsecond line\n\n- a\n  - b\n    - c\n\n\
```rust\nfn main() {}\n```\n";

/// Assert the bytes look like a finished PDF document.
fn assert_pdf_quality(pdf: &[u8], context: &str) {
    assert!(!pdf.is_empty(), "[{context}] PDF is empty");
    assert!(
        pdf.starts_with(b"%PDF"),
        "[{context}] Missing %PDF signature, got {:?}",
        &pdf[..pdf.len().min(8)]
    );
    assert!(
        pdf.len() > 500,
        "[{context}] PDF suspiciously small: {} bytes",
        pdf.len()
    );
    println!("[{context}] ✓  {} bytes, quality checks passed", pdf.len());
}

// ── WeasyPrint engine ────────────────────────────────────────────────────────

#[tokio::test]
async fn weasyprint_renders_a_valid_pdf() {
    e2e_skip_unless!(weasyprint_available(), "weasyprint");

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "doc.md", SAMPLE);
    let output = dir.path().join("doc.pdf");
    let config = RenderConfig::builder()
        .engine(Engine::Weasyprint)
        .build()
        .unwrap();

    let stats = convert_to_file(&input, &output, &config).await.unwrap();
    assert_eq!(stats.engine, "weasyprint");
    assert!(!stats.fell_back);

    let pdf = std::fs::read(&output).unwrap();
    assert_pdf_quality(&pdf, "weasyprint");
}

#[tokio::test]
async fn weasyprint_double_render_is_byte_identical() {
    e2e_skip_unless!(weasyprint_available(), "weasyprint");

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "doc.md", SAMPLE);
    let config = RenderConfig::builder()
        .engine(Engine::Weasyprint)
        .build()
        .unwrap();

    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");
    convert_to_file(&input, &first, &config).await.unwrap();
    convert_to_file(&input, &second, &config).await.unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b, "weasyprint output must be deterministic");
}

#[tokio::test]
async fn cover_adds_a_page_before_the_body() {
    e2e_skip_unless!(weasyprint_available(), "weasyprint");

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "doc.md", "# Body\n\ncontent\n");
    let cover = write_input(&dir, "cover.md", "# The Cover\n");
    let with_cover_out = dir.path().join("with-cover.pdf");
    let without_cover_out = dir.path().join("without-cover.pdf");

    let base = RenderConfig::builder().engine(Engine::Weasyprint);
    let without = base.build().unwrap();
    convert_to_file(&input, &without_cover_out, &without)
        .await
        .unwrap();

    let with = RenderConfig::builder()
        .engine(Engine::Weasyprint)
        .cover(&cover)
        .build()
        .unwrap();
    convert_to_file(&input, &with_cover_out, &with).await.unwrap();

    let with_pdf = std::fs::read(&with_cover_out).unwrap();
    let without_pdf = std::fs::read(&without_cover_out).unwrap();
    assert_pdf_quality(&with_pdf, "cover");

    // The page-break marker forces at least one extra page.
    let page_count = |pdf: &[u8]| count_occurrences(pdf, b"/Type /Page");
    if page_count(&without_pdf) > 0 {
        assert!(
            page_count(&with_pdf) > page_count(&without_pdf),
            "cover must add a page: {} vs {}",
            page_count(&with_pdf),
            page_count(&without_pdf)
        );
    }
}

// ── Fallback ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn auto_with_broken_browser_falls_back_to_weasyprint() {
    e2e_skip_unless!(weasyprint_available(), "weasyprint");

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "doc.md", SAMPLE);
    let config = RenderConfig::default();
    let doc = build_document(&input, &config).unwrap();

    // A deliberately broken browser binary: launch must fail, and auto
    // selection must hand the document to the static engine.
    let engines: Vec<Box<dyn PdfEngine>> = vec![
        Box::new(ChromiumEngine::with_browser_path("/nonexistent/chromium")),
        Box::new(WeasyprintEngine::from_env()),
    ];
    let outcome = run_candidates(&engines, false, &doc, &config).unwrap();

    assert!(outcome.fell_back, "must fall back to the static engine");
    assert_eq!(outcome.engine, "weasyprint");
    assert_pdf_quality(&outcome.pdf, "fallback");
}

// ── Chromium engine ──────────────────────────────────────────────────────────

#[tokio::test]
async fn chromium_renders_a_valid_pdf() {
    e2e_skip_unless!(chromium_available(), "chrome/chromium");

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "doc.md", SAMPLE);
    let output = dir.path().join("doc.pdf");
    let config = RenderConfig::builder()
        .engine(Engine::Chromium)
        .build()
        .unwrap();

    let stats = convert_to_file(&input, &output, &config).await.unwrap();
    assert_eq!(stats.engine, "chromium");

    let pdf = std::fs::read(&output).unwrap();
    assert_pdf_quality(&pdf, "chromium");
}

#[tokio::test]
async fn debug_html_sibling_is_written() {
    e2e_skip_unless!(weasyprint_available(), "weasyprint");

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "doc.md", SAMPLE);
    let output = dir.path().join("doc.pdf");
    let config = RenderConfig::builder()
        .engine(Engine::Weasyprint)
        .debug_html(true)
        .build()
        .unwrap();

    convert_to_file(&input, &output, &config).await.unwrap();

    let html = std::fs::read_to_string(dir.path().join("doc.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<ul>"));
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}
