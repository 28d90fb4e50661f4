//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. Keeping every knob in one immutable struct
//! makes a run reproducible: the orchestrator and both engines consume one
//! resolved snapshot, and serialising it for logging shows exactly why two
//! runs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::Md2PdfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for one Markdown-to-PDF conversion run.
///
/// Built via [`RenderConfig::builder()`] or [`RenderConfig::default()`].
/// The struct is an immutable snapshot: nothing mutates it once the run
/// starts, and no state survives between runs.
///
/// # Example
/// ```rust
/// use md2pdf::{Engine, RenderConfig, Theme};
///
/// let config = RenderConfig::builder()
///     .engine(Engine::Weasyprint)
///     .theme(Theme::Github)
///     .margin("15mm 20mm".parse().unwrap())
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// PDF engine preference. Default: [`Engine::Auto`].
    ///
    /// `Auto` tries the browser engine first and silently falls back to the
    /// static engine when the browser cannot be used. An explicit engine is
    /// mandatory: its failure is fatal, never a fallback trigger.
    pub engine: Engine,

    /// Styling theme. Default: [`Theme::Mpe`].
    pub theme: Theme,

    /// Math typesetting mode. Default: [`MathMode::Mathjax`].
    ///
    /// Math is rendered client-side by the browser engine; the static
    /// engine cannot execute scripts, so math sources print as-is there.
    pub math: MathMode,

    /// Render ```` ```mermaid ```` fenced blocks as diagrams. Default: true.
    ///
    /// Same degradation note as math: diagrams need the browser engine.
    pub mermaid: bool,

    /// Output page size. Default: [`PageSize::A4`].
    pub page_size: PageSize,

    /// Page margins, each side independently settable via the CSS shorthand
    /// (`"20mm"`, `"15mm 25mm"`, `"10mm 20mm 10mm 20mm"`). Default: 20 mm
    /// on every side.
    pub margin: PageMargins,

    /// Optional cover Markdown file, rendered ahead of the body with a page
    /// break between them.
    pub cover: Option<PathBuf>,

    /// Optional user stylesheet appended after the theme layer, so its
    /// declarations win the cascade. Passed through unvalidated.
    pub css: Option<PathBuf>,

    /// Document title, used for the HTML `<title>`. Default: "Document".
    pub title: String,

    /// Persist the assembled HTML beside the output PDF for inspection.
    /// Default: false. A failed debug write never aborts the PDF run.
    pub debug_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Auto,
            theme: Theme::Mpe,
            math: MathMode::Mathjax,
            mermaid: true,
            page_size: PageSize::A4,
            margin: PageMargins::default(),
            cover: None,
            css: None,
            title: "Document".to_string(),
            debug_html: false,
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn engine(mut self, engine: Engine) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    pub fn math(mut self, math: MathMode) -> Self {
        self.config.math = math;
        self
    }

    pub fn mermaid(mut self, enabled: bool) -> Self {
        self.config.mermaid = enabled;
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn margin(mut self, margin: PageMargins) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn cover(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cover = Some(path.into());
        self
    }

    pub fn css(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.css = Some(path.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn debug_html(mut self, enabled: bool) -> Self {
        self.config.debug_html = enabled;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, Md2PdfError> {
        let c = &self.config;
        if c.title.trim().is_empty() {
            return Err(Md2PdfError::InvalidConfig(
                "Title must not be empty".into(),
            ));
        }
        for (side, len) in c.margin.sides() {
            if len.value < 0.0 {
                return Err(Md2PdfError::InvalidConfig(format!(
                    "Negative {side} margin: {len}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// PDF production strategy.
///
/// Two engines exist because they trade capability against footprint: the
/// browser engine executes scripts (Mermaid, MathJax, KaTeX, highlight.js)
/// but needs a Chromium binary; the static engine renders pure HTML/CSS
/// anywhere WeasyPrint is installed but never runs a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Try the browser engine, fall back to the static engine. (default)
    #[default]
    Auto,
    /// Headless Chromium over the DevTools protocol. Mandatory when chosen.
    Chromium,
    /// WeasyPrint static HTML/CSS rendering. Mandatory when chosen.
    Weasyprint,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Auto => "auto",
            Engine::Chromium => "chromium",
            Engine::Weasyprint => "weasyprint",
        }
    }
}

impl FromStr for Engine {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Engine::Auto),
            // "playwright" is an accepted alias for the same
            // headless-browser strategy.
            "chromium" | "chrome" | "playwright" => Ok(Engine::Chromium),
            "weasyprint" => Ok(Engine::Weasyprint),
            other => Err(Md2PdfError::InvalidConfig(format!(
                "Unknown engine '{other}' (expected auto, chromium, or weasyprint)"
            ))),
        }
    }
}

/// Named CSS layering preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// GitHub stylesheet plus an enhancement layer approximating the
    /// Markdown Preview Enhanced look. (default)
    #[default]
    Mpe,
    /// GitHub-flavored stylesheet.
    Github,
    /// Base stylesheet only.
    Minimal,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Mpe => "mpe",
            Theme::Github => "github",
            Theme::Minimal => "minimal",
        }
    }
}

impl FromStr for Theme {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mpe" | "" => Ok(Theme::Mpe),
            "github" => Ok(Theme::Github),
            "minimal" => Ok(Theme::Minimal),
            other => Err(Md2PdfError::InvalidConfig(format!(
                "Unknown theme '{other}' (expected mpe, github, or minimal)"
            ))),
        }
    }
}

/// Math typesetting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathMode {
    /// No math scripts are emitted.
    None,
    /// MathJax 3 via CDN. (default)
    #[default]
    Mathjax,
    /// KaTeX with the auto-render extension via CDN.
    Katex,
}

impl MathMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MathMode::None => "none",
            MathMode::Mathjax => "mathjax",
            MathMode::Katex => "katex",
        }
    }
}

impl FromStr for MathMode {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(MathMode::None),
            "mathjax" | "" => Ok(MathMode::Mathjax),
            "katex" => Ok(MathMode::Katex),
            other => Err(Md2PdfError::InvalidConfig(format!(
                "Unknown math mode '{other}' (expected none, mathjax, or katex)"
            ))),
        }
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Output paper size.
///
/// The browser engine needs physical dimensions in inches for the DevTools
/// print call; the static engine reads the same size from the generated
/// `@page` rule, so both engines agree on geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PageSize {
    /// Physical dimensions as `(width, height)` in inches, portrait.
    pub fn dimensions_in(self) -> (f64, f64) {
        match self {
            PageSize::A3 => (11.69, 16.54),
            PageSize::A4 => (8.27, 11.69),
            PageSize::A5 => (5.83, 8.27),
            PageSize::Letter => (8.5, 11.0),
            PageSize::Legal => (8.5, 14.0),
            PageSize::Tabloid => (11.0, 17.0),
        }
    }

    /// The size keyword used in the CSS `@page` rule.
    pub fn css_keyword(self) -> &'static str {
        match self {
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::Tabloid => "tabloid",
        }
    }
}

impl FromStr for PageSize {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a3" => Ok(PageSize::A3),
            "a4" | "" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            "tabloid" => Ok(PageSize::Tabloid),
            other => Err(Md2PdfError::InvalidConfig(format!(
                "Unknown page size '{other}' (expected A3, A4, A5, Letter, Legal, or Tabloid)"
            ))),
        }
    }
}

/// A CSS length with unit, e.g. `20mm` or `0.5in`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CssLength {
    pub value: f64,
    pub unit: LengthUnit,
}

impl CssLength {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Convert to inches, the unit the DevTools print call expects.
    pub fn to_inches(self) -> f64 {
        match self.unit {
            LengthUnit::Mm => self.value / 25.4,
            LengthUnit::Cm => self.value / 2.54,
            LengthUnit::In => self.value,
            LengthUnit::Pt => self.value / 72.0,
            LengthUnit::Px => self.value / 96.0,
        }
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for CssLength {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (num, unit) = s.split_at(split);
        let value: f64 = num.trim().parse().map_err(|_| {
            Md2PdfError::InvalidConfig(format!("Invalid CSS length '{s}'"))
        })?;
        let unit = match unit.trim().to_ascii_lowercase().as_str() {
            "mm" => LengthUnit::Mm,
            "cm" => LengthUnit::Cm,
            "in" => LengthUnit::In,
            "pt" => LengthUnit::Pt,
            // Bare numbers are treated as CSS pixels.
            "px" | "" => LengthUnit::Px,
            other => {
                return Err(Md2PdfError::InvalidConfig(format!(
                    "Unsupported CSS unit '{other}' in length '{s}'"
                )))
            }
        };
        Ok(CssLength { value, unit })
    }
}

/// Supported CSS length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    Cm,
    In,
    Pt,
    Px,
}

impl LengthUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::In => "in",
            LengthUnit::Pt => "pt",
            LengthUnit::Px => "px",
        }
    }
}

/// Four-sided page margins.
///
/// Parsed from the usual CSS shorthand: one value sets all sides, two set
/// vertical/horizontal, three set top/horizontal/bottom, four set
/// top/right/bottom/left explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: CssLength,
    pub right: CssLength,
    pub bottom: CssLength,
    pub left: CssLength,
}

impl PageMargins {
    /// Uniform margin on all four sides.
    pub const fn uniform(len: CssLength) -> Self {
        Self {
            top: len,
            right: len,
            bottom: len,
            left: len,
        }
    }

    /// Iterate sides in CSS order with their names, for validation and
    /// `@page` emission.
    pub fn sides(&self) -> [(&'static str, CssLength); 4] {
        [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ]
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::uniform(CssLength::new(20.0, LengthUnit::Mm))
    }
}

impl fmt::Display for PageMargins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl FromStr for PageMargins {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<CssLength> = s
            .split_whitespace()
            .map(CssLength::from_str)
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [] => Err(Md2PdfError::InvalidConfig(
                "Empty margin specification".into(),
            )),
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            more => Err(Md2PdfError::InvalidConfig(format!(
                "Margin shorthand takes 1-4 values, got {}",
                more.len()
            ))),
        }
    }
}
