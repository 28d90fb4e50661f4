//! Style composition: layering base, theme, and user CSS.
//!
//! A [`StyleBundle`] is an ordered set of CSS sources. Order is the whole
//! contract: later layers override earlier ones by cascade, never by
//! removal, so a user stylesheet appended last always wins. Composition
//! performs no validation — malformed CSS is the engines' problem, and both
//! engines ignore rules they cannot parse.
//!
//! | theme   | layers                                              |
//! |---------|-----------------------------------------------------|
//! | minimal | base                                                |
//! | github  | base + GitHub stylesheet (CDN link)                 |
//! | mpe     | base + GitHub stylesheet + MPE enhancement layer    |

use crate::config::{PageMargins, PageSize, Theme};

/// GitHub's markdown stylesheet, referenced from the CDN like every other
/// external asset; nothing is bundled or cached locally.
const GITHUB_MARKDOWN_CSS_HREF: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/5.2.0/github-markdown.min.css";

/// highlight.js colour scheme for fenced code blocks.
const HIGHLIGHT_CSS_HREF: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github.min.css";

/// The composed stylesheet for one document: external links plus inline
/// CSS text in increasing cascade precedence.
#[derive(Debug, Clone)]
pub struct StyleBundle {
    /// Stylesheet `<link>` hrefs, emitted into `<head>` before the inline
    /// block so the inline layers can override them.
    pub links: Vec<&'static str>,
    /// Concatenated inline CSS: page geometry + base, then theme layer,
    /// then the user override.
    pub css: String,
}

impl StyleBundle {
    /// Render the `<link rel="stylesheet">` tags for the document head.
    pub fn link_tags(&self) -> String {
        self.links
            .iter()
            .map(|href| format!("<link rel=\"stylesheet\" href=\"{href}\">\n"))
            .collect()
    }
}

/// Compose the final stylesheet for the given theme and optional user CSS.
pub fn compose(
    theme: Theme,
    user_css: Option<&str>,
    page_size: PageSize,
    margin: &PageMargins,
) -> StyleBundle {
    let mut links = vec![HIGHLIGHT_CSS_HREF];
    if matches!(theme, Theme::Github | Theme::Mpe) {
        links.push(GITHUB_MARKDOWN_CSS_HREF);
    }

    let mut css = String::with_capacity(4096);
    css.push_str(&page_rule(page_size, margin));
    css.push_str(BASE_CSS);
    if theme == Theme::Mpe {
        css.push_str(MPE_CSS);
    }
    if let Some(user) = user_css {
        css.push('\n');
        css.push_str(user);
        css.push('\n');
    }

    StyleBundle { links, css }
}

/// Generate the `@page` rule from the configured geometry so the static
/// engine honors page size and margins too. The browser engine passes the
/// same values through the print call, which takes precedence there.
fn page_rule(page_size: PageSize, margin: &PageMargins) -> String {
    format!(
        "@page {{ size: {}; margin: {}; }}\n",
        page_size.css_keyword(),
        margin
    )
}

/// Base stylesheet: shared typography, print plumbing, and the page-break
/// helper used by the cover merge. Present for every theme.
const BASE_CSS: &str = "
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, 'Noto Sans', 'Liberation Sans', sans-serif; color: #24292e; }
.markdown-body { max-width: 900px; margin: 0 auto; padding: 0; }
.markdown-body h1, .markdown-body h2, .markdown-body h3 { border-bottom: 1px solid #eaecef; padding-bottom: .3em; }
.markdown-body pre { background: #f6f8fa; padding: 12px; overflow: auto; }
.markdown-body code { font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace; }
.page-break { page-break-before: always; }
img { max-width: 100%; }
table { border-collapse: collapse; }
table th, table td { border: 1px solid #d0d7de; padding: 6px 12px; }
";

/// Enhancement layer approximating the Markdown Preview Enhanced look:
/// heavier headings, tighter lists, tinted blockquotes, print rules.
const MPE_CSS: &str = "
/* headings */
.markdown-body h1 { font-weight: 800; font-size: 2.0rem; }
.markdown-body h2 { font-weight: 700; font-size: 1.6rem; }
.markdown-body h3 { font-weight: 700; font-size: 1.25rem; }
.markdown-body h1, .markdown-body h2, .markdown-body h3 { margin-top: 1.2em; }

/* paragraph and list */
.markdown-body { line-height: 1.8; font-size: 16px; }
.markdown-body strong { font-weight: 700; }
.markdown-body ul, .markdown-body ol { margin: .6em 0; list-style-position: outside; }
.markdown-body ul { padding-left: 1.8rem; list-style-type: disc; }
.markdown-body ol { padding-left: 2.0rem; }
.markdown-body ol > li, .markdown-body ul > li { margin: .3em 0; }
.markdown-body ol ol, .markdown-body ol ul, .markdown-body ul ol, .markdown-body ul ul { margin: .2em 0; padding-left: 1.4rem; }
.markdown-body ul ul { list-style-type: circle; }
.markdown-body ul ul ul { list-style-type: square; }
.markdown-body li > p { margin: .2em 0; }
.markdown-body li::marker { font-weight: 700; }

/* blockquote */
.markdown-body blockquote { background: #f6f8fa; border-left: 4px solid #d0d7de; margin: 1em 0; padding: .6em 1em; }

/* code */
.markdown-body pre code { background: transparent; }
.markdown-body code { background: rgba(175,184,193,0.2); padding: .2em .4em; border-radius: 4px; }

/* hr */
.markdown-body hr { border: 0; border-top: 1px solid #d0d7de; margin: 1.5em 0; }

/* table */
.markdown-body table { width: 100%; }

/* print adjustments */
@media print {
  .markdown-body { color: #000; }
  a { color: inherit; text-decoration: none; }
}
";
