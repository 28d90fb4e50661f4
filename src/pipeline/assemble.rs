//! Document assembly: one standalone HTML string from the converted
//! fragments, the composed stylesheet, and the feature-gated script tags.
//!
//! The assembled document is the single input both PDF engines consume.
//! Everything the page needs at render time — GitHub CSS, highlight.js,
//! Mermaid, MathJax or KaTeX — is referenced from CDN URLs; this component
//! never bundles or caches assets. Scripts only matter on the browser
//! engine; the static engine ignores them, which is the documented
//! degradation for diagram and math features.
//!
//! When a cover fragment is present it is emitted first, followed by a
//! page-break marker, then the body. The cover lives in the same document,
//! so its scripts (Mermaid in a cover diagram, say) execute under exactly
//! the same passes as the body's.

use crate::config::{MathMode, RenderConfig};
use crate::pipeline::style::StyleBundle;

const HIGHLIGHT_JS_SRC: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js";
const MERMAID_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";
const MATHJAX_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";
const KATEX_CSS_HREF: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css";
const KATEX_JS_SRC: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js";
const KATEX_AUTORENDER_SRC: &str =
    "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js";

/// Fenced `mermaid` blocks come out of the parser as `<pre><code>`; this
/// load-time transform rewrites them into the `<div class="mermaid">` form
/// the Mermaid runtime expects, then kicks off rendering. The
/// `__md2pdfMermaidDone` flag is the readiness signal the browser engine
/// polls before printing.
const MERMAID_INIT: &str = r#"<script>
function transformMermaidBlocks(){
  const blocks = Array.from(document.querySelectorAll('pre > code.language-mermaid'));
  for (const code of blocks) {
    const pre = code.parentElement;
    const div = document.createElement('div');
    div.className = 'mermaid';
    div.textContent = code.textContent;
    pre.replaceWith(div);
  }
}
window.addEventListener('load', function(){
  transformMermaidBlocks();
  if (window.mermaid) {
    mermaid.initialize({startOnLoad: false});
    mermaid.run().then(function(){ window.__md2pdfMermaidDone = true; })
                 .catch(function(){ window.__md2pdfMermaidDone = true; });
  } else {
    window.__md2pdfMermaidDone = true;
  }
});
</script>"#;

/// Configure TeX delimiters up front (single-dollar inline math is off by
/// default in MathJax 3) and typeset once the page has loaded.
const MATHJAX_INIT: &str = r#"<script>
window.MathJax = {
  tex: {
    inlineMath: [['$', '$'], ['\\(', '\\)']],
    displayMath: [['$$', '$$'], ['\\[', '\\]']]
  }
};
</script>"#;

/// `__md2pdfMathDone` is the math half of the readiness signal.
const MATHJAX_TYPESET: &str = r#"<script>
window.addEventListener('load', function(){
  if (window.MathJax && MathJax.typesetPromise) {
    MathJax.typesetPromise().then(function(){ window.__md2pdfMathDone = true; })
                            .catch(function(){ window.__md2pdfMathDone = true; });
  } else {
    window.__md2pdfMathDone = true;
  }
});
</script>"#;

const KATEX_INIT: &str = r#"<script>
window.addEventListener('load', function(){
  if (window.renderMathInElement) {
    renderMathInElement(document.body, {
      delimiters: [
        {left: '$$', right: '$$', display: true},
        {left: '$', right: '$', display: false},
        {left: '\\(', right: '\\)', display: false},
        {left: '\\[', right: '\\]', display: true}
      ]
    });
  }
  window.__md2pdfMathDone = true;
});
</script>"#;

/// The complete, self-contained HTML passed to a rendering engine.
///
/// One assembled document produces exactly one output PDF (plus, under
/// `--debug-html`, one sibling `.html` byproduct).
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub html: String,
}

/// Wrap the body fragment (and optional cover fragment) together with the
/// composed style and the feature-gated script tags into one document.
pub fn assemble(
    body: &str,
    cover: Option<&str>,
    style: &StyleBundle,
    base_url: Option<&str>,
    config: &RenderConfig,
) -> AssembledDocument {
    let base_tag = base_url
        .map(|url| format!("<base href=\"{url}\">\n"))
        .unwrap_or_default();

    let mut content = String::with_capacity(body.len() + 1024);
    if let Some(cover_html) = cover {
        content.push_str(cover_html);
        content.push_str("\n<div class=\"page-break\"></div>\n");
    }
    content.push_str(body);

    let mut scripts = String::with_capacity(1024);
    scripts.push_str(&format!("<script src=\"{HIGHLIGHT_JS_SRC}\"></script>\n"));
    scripts.push_str("<script>try{hljs.highlightAll();}catch(e){};</script>\n");
    if config.mermaid {
        scripts.push_str(&format!("<script src=\"{MERMAID_JS_SRC}\"></script>\n"));
        scripts.push_str(MERMAID_INIT);
        scripts.push('\n');
    }
    match config.math {
        MathMode::None => {}
        MathMode::Mathjax => {
            scripts.push_str(MATHJAX_INIT);
            scripts.push('\n');
            scripts.push_str(&format!("<script src=\"{MATHJAX_JS_SRC}\"></script>\n"));
            scripts.push_str(MATHJAX_TYPESET);
            scripts.push('\n');
        }
        MathMode::Katex => {
            scripts.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{KATEX_CSS_HREF}\">\n"
            ));
            scripts.push_str(&format!("<script src=\"{KATEX_JS_SRC}\"></script>\n"));
            scripts.push_str(&format!("<script src=\"{KATEX_AUTORENDER_SRC}\"></script>\n"));
            scripts.push_str(KATEX_INIT);
            scripts.push('\n');
        }
    }

    let html = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         {base_tag}{links}<style>\n{css}</style>\n\
         </head>\n\
         <body>\n\
         <main class=\"markdown-body\">\n{content}\n</main>\n\
         {scripts}</body>\n\
         </html>\n",
        title = escape_html(&config.title),
        links = style.link_tags(),
        css = style.css,
    );

    AssembledDocument { html }
}

/// Escape text for safe interpolation into HTML.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
