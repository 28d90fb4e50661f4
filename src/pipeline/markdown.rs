//! Markdown-to-HTML conversion.
//!
//! Delegates the actual parsing to comrak; this stage's only responsibility
//! is the fixed extension set and the line-break policy. Soft breaks become
//! `<br>` (`hardbreaks`) — a deliberate deviation from strict CommonMark
//! paragraph joining, because the preview style this tool approximates
//! keeps single newlines visible.

use comrak::Options;

/// Convert normalised Markdown text into an HTML fragment.
///
/// The output carries no `<html>`/`<head>` wrapper; assembly into a full
/// document happens in [`crate::pipeline::assemble`].
///
/// Raw inline HTML must pass through (`unsafe_`) so the cover page-break
/// marker and hand-written HTML in documents survive conversion; the
/// assembled document is rendered locally, never served.
pub fn to_html_fragment(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.autolink = true;
    options.render.hardbreaks = true;
    options.render.r#unsafe = true;
    comrak::markdown_to_html(markdown, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::normalize;

    #[test]
    fn soft_break_becomes_br() {
        let html = to_html_fragment("first line\nsecond line\n");
        assert!(html.contains("<br"), "expected a <br>, got: {html}");
        assert!(html.contains("first line"));
        assert!(html.contains("second line"));
    }

    #[test]
    fn blank_line_still_separates_paragraphs() {
        let html = to_html_fragment("one\n\ntwo\n");
        assert_eq!(html.matches("<p>").count(), 2);
    }

    #[test]
    fn normalized_three_level_list_yields_three_nested_uls() {
        let html = to_html_fragment(&normalize("- a\n  - b\n    - c\n"));
        assert_eq!(html.matches("<ul>").count(), 3, "html: {html}");
        assert_eq!(html.matches("</ul>").count(), 3);
    }

    #[test]
    fn mixed_markers_stay_one_list_after_normalisation() {
        let html = to_html_fragment(&normalize("- a\n* b\n+ c\n"));
        assert_eq!(html.matches("<ul>").count(), 1, "html: {html}");
        assert_eq!(html.matches("<li>").count(), 3);
    }

    #[test]
    fn ordered_parent_with_bullet_child() {
        let html = to_html_fragment(&normalize("1. first\n  - nested\n"));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<ul>"));
    }

    #[test]
    fn gfm_tables_render() {
        let html = to_html_fragment("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>"));
    }

    #[test]
    fn fenced_code_keeps_language_class() {
        let html = to_html_fragment("```mermaid\ngraph TD;\n```\n");
        assert!(
            html.contains("language-mermaid"),
            "mermaid fence must keep its class for the browser transform: {html}"
        );
    }

    #[test]
    fn task_lists_render_checkboxes() {
        let html = to_html_fragment("- [x] done\n- [ ] todo\n");
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn raw_html_passes_through() {
        let html = to_html_fragment("<div class=\"page-break\"></div>\n");
        assert!(html.contains("<div class=\"page-break\"></div>"));
    }

    #[test]
    fn output_is_a_fragment() {
        let html = to_html_fragment("# Title\n");
        assert!(!html.contains("<html"));
        assert!(!html.contains("<head"));
    }
}
