//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the Markdown parser) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ markdown ──▶ style ──▶ assemble
//! (file)    (list repair)  (comrak)    (CSS layers)  (full HTML)
//! ```
//!
//! 1. [`input`]     — resolve and read the source, cover, and user CSS files
//! 2. [`normalize`] — rewrite list indentation so the parser's native
//!    nesting rules reproduce the intended visual hierarchy
//! 3. [`markdown`]  — CommonMark+GFM conversion to an HTML fragment, with
//!    soft line breaks preserved as `<br>`
//! 4. [`style`]     — layer base, theme, and user CSS in cascade order
//! 5. [`assemble`]  — wrap fragments, styles, and script tags into one
//!    standalone HTML document, the direct input to a PDF engine

pub mod assemble;
pub mod input;
pub mod markdown;
pub mod normalize;
pub mod style;
