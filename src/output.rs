//! Output types: the rendered PDF plus run statistics.

use serde::{Deserialize, Serialize};

/// The result of a successful conversion.
///
/// Holds the PDF bytes in memory; [`crate::convert::convert_to_file`] takes
/// care of writing them out atomically. The assembled HTML rides along so
/// callers (and the `--debug-html` flag) can inspect exactly what the engine
/// rendered.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The finished PDF document.
    pub pdf: Vec<u8>,
    /// The complete standalone HTML that was handed to the engine.
    pub html: String,
    /// Statistics for the run.
    pub stats: RenderStats,
}

/// Statistics describing one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStats {
    /// Name of the engine that actually produced the PDF
    /// (`"chromium"` or `"weasyprint"`).
    pub engine: String,
    /// True when `auto` selection abandoned the browser engine and the
    /// static engine produced the PDF instead.
    pub fell_back: bool,
    /// Size of the produced PDF in bytes.
    pub pdf_bytes: usize,
    /// Size of the assembled HTML document in bytes.
    pub html_bytes: usize,
    /// Wall-clock time spent in the Markdown pipeline (normalise, convert,
    /// compose, assemble).
    pub pipeline_duration_ms: u64,
    /// Wall-clock time spent inside the PDF engine.
    pub render_duration_ms: u64,
    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}
