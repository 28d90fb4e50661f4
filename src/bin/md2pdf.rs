//! CLI binary for md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenderConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2pdf::{
    convert_to_file, default_output_path, Engine, MathMode, PageMargins, PageSize, RenderConfig,
    Theme,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes notes.pdf next to the input)
  md2pdf notes.md

  # Convert to a specific file with the GitHub theme
  md2pdf notes.md -o out/notes.pdf --theme github

  # Letter paper, asymmetric margins, no diagrams
  md2pdf report.md --page-size letter --margin "15mm 20mm" --no-mermaid

  # KaTeX math, cover page, keep the intermediate HTML for inspection
  md2pdf paper.md --math katex --cover cover.md --debug-html

  # Force the static engine (no browser, scripts degrade silently)
  md2pdf notes.md --engine weasyprint

ENGINES:
  chromium    headless Chrome/Chromium over the DevTools protocol; Mermaid,
              MathJax/KaTeX, and syntax highlighting all render.
  weasyprint  the external `weasyprint` executable; pure HTML/CSS, scripts
              never execute.
  auto        (default) chromium first, weasyprint as fallback.

ENVIRONMENT VARIABLES:
  MD2PDF_BROWSER      Path to a Chrome/Chromium binary — skips auto-detection
  MD2PDF_WEASYPRINT   Path to the weasyprint executable
  SOURCE_DATE_EPOCH   Honoured by the weasyprint engine for reproducible PDFs
                      (pinned to 0 automatically when unset)

SETUP:
  The browser engine needs any Chrome/Chromium install. The static engine
  needs `pip install weasyprint`. Either one is enough for --engine auto.
"#;

/// Convert a Markdown document to a paginated, print-styled PDF.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert Markdown to PDF with browser or WeasyPrint engines",
    long_about = "Convert one Markdown document to a paginated PDF that approximates an \
editor live-preview: repaired nested lists, preserved line breaks, preview-style CSS, \
and optional Mermaid diagrams and math typesetting via a headless browser.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input Markdown file.
    input: PathBuf,

    /// Output PDF path. Default: the input path with a .pdf extension.
    #[arg(short, long, env = "MD2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// PDF engine: auto, chromium, or weasyprint.
    #[arg(long, env = "MD2PDF_ENGINE", default_value = "auto")]
    engine: Engine,

    /// Styling theme: mpe, github, or minimal.
    #[arg(long, env = "MD2PDF_THEME", default_value = "mpe")]
    theme: Theme,

    /// Math typesetting: none, mathjax, or katex.
    #[arg(long, env = "MD2PDF_MATH", default_value = "mathjax")]
    math: MathMode,

    /// Disable Mermaid diagram rendering.
    #[arg(long)]
    no_mermaid: bool,

    /// Page size: A3, A4, A5, Letter, Legal, or Tabloid.
    #[arg(long, env = "MD2PDF_PAGE_SIZE", default_value = "A4")]
    page_size: PageSize,

    /// Page margins, CSS shorthand: "20mm", "15mm 20mm", "T R B L".
    #[arg(long, env = "MD2PDF_MARGIN", default_value = "20mm")]
    margin: PageMargins,

    /// Optional cover Markdown file, rendered before the body on its own page.
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Additional CSS file, appended after the theme (highest precedence).
    #[arg(long)]
    css: Option<PathBuf>,

    /// Document title for the HTML <title>.
    #[arg(long, default_value = "Document")]
    title: String,

    /// Write the assembled HTML beside the output PDF for inspection.
    #[arg(long)]
    debug_html: bool,

    /// Print run statistics as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = RenderConfig::builder()
        .engine(cli.engine)
        .theme(cli.theme)
        .math(cli.math)
        .mermaid(!cli.no_mermaid)
        .page_size(cli.page_size)
        .margin(cli.margin)
        .title(&cli.title)
        .debug_html(cli.debug_html);
    if let Some(ref cover) = cli.cover {
        builder = builder.cover(cover);
    }
    if let Some(ref css) = cli.css {
        builder = builder.css(css);
    }
    let config = builder.build().context("Invalid configuration")?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    // ── Run conversion ───────────────────────────────────────────────────
    let spinner = if !cli.quiet && !cli.verbose {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Rendering");
        bar.set_message(cli.input.display().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = convert_to_file(&cli.input, &output_path, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let stats = result.context("Conversion failed")?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    }

    if !cli.quiet {
        eprintln!(
            "{} PDF generated: {}",
            green("✔"),
            bold(&output_path.display().to_string())
        );
        eprintln!(
            "   {} engine, {} bytes, {}ms total",
            dim(stats.engine.as_str()),
            dim(&stats.pdf_bytes.to_string()),
            stats.total_duration_ms
        );
        if stats.fell_back {
            eprintln!(
                "{} browser engine unavailable — fell back to weasyprint; \
                 Mermaid/math did not render",
                cyan("⚠")
            );
        }
    }

    Ok(())
}
