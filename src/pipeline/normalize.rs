//! List-structure normalisation: deterministic repair of nested-list
//! Markdown before parsing.
//!
//! ## Why is this pass necessary?
//!
//! Editors let authors indent nested lists with whatever width they like —
//! 2 spaces here, 4 there, a tab elsewhere — and live previews are
//! forgiving about it. CommonMark is not: whether an item nests under its
//! predecessor depends on the predecessor's *content column*, so a document
//! that looks fine in the preview can parse into flattened or accidentally
//! merged lists. This pass rewrites list-item indentation so that the
//! parser's native nesting rules reproduce the visual hierarchy:
//!
//! - each item's depth is inferred from a stack of indentation widths
//!   observed in the source, not from raw column counts;
//! - the rewritten indent is `depth * 4` spaces, which clears the content
//!   column of every marker up to `99.`, ordered or unordered;
//! - unordered markers are canonalised to `-` so a sibling marker change
//!   (`-` to `*`) does not split one visual list into two;
//! - a blank line is inserted before a list that directly follows a
//!   paragraph line, which some parsers require to open the list;
//! - a blank line inside a list does not end it: the indentation stack
//!   survives blanks and resets only on unindented non-list text.
//!
//! The transform is pure and infallible. Anything it does not recognise —
//! fenced code, HTML blocks, plain prose, malformed constructs — passes
//! through unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

/// Indent width applied per nesting depth in the rewritten output.
///
/// Four spaces sit inside the continuation range of every list marker up to
/// two digits, so a child at `depth * 4` nests correctly under bullet and
/// ordered parents alike.
const INDENT_UNIT: usize = 4;

/// A new level must be indented at least this much past its parent;
/// smaller wobble is treated as the same level.
const LEVEL_TOLERANCE: usize = 2;

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(```|~~~)").unwrap());

/// Captures: 1 = leading whitespace, 2 = marker, 3 = separator, 4 = rest.
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)([-*+]|\d{1,9}[.)])([ \t]+)(.*)$").unwrap());

/// Rewrite list-item indentation to a canonical form.
///
/// See the module docs for the rule set. The output parses to the same
/// document except that list nesting now matches the source's visual
/// hierarchy.
pub fn normalize(text: &str) -> String {
    let mut out: Vec<String> = Vec::with_capacity(text.lines().count() + 8);
    let mut stack: Vec<usize> = Vec::new();
    let mut in_code = false;
    let mut prev_blank = true;
    let mut prev_was_item = false;

    for line in text.lines() {
        if FENCE.is_match(line) {
            in_code = !in_code;
            out.push(line.to_string());
            prev_blank = false;
            prev_was_item = false;
            continue;
        }
        if in_code {
            out.push(line.to_string());
            continue;
        }

        if let Some(caps) = LIST_ITEM.captures(line) {
            let indent = indent_width(&caps[1]);
            let marker = canonical_marker(&caps[2]);
            let depth = depth_for_indent(&mut stack, indent);

            // A list directly after a paragraph line needs a separating
            // blank for the parser to open it.
            if !prev_blank && !prev_was_item {
                out.push(String::new());
            }

            out.push(format!(
                "{}{}{}{}",
                " ".repeat(depth * INDENT_UNIT),
                marker,
                &caps[3],
                &caps[4]
            ));
            prev_blank = false;
            prev_was_item = true;
            continue;
        }

        let blank = line.trim().is_empty();
        // Unindented text ends the list; indented continuation lines and
        // blank lines keep the stack alive so later items rejoin it.
        if !blank && indent_width(line) == 0 {
            stack.clear();
        }
        out.push(line.to_string());
        prev_blank = blank;
        prev_was_item = false;
    }

    let mut result = out.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Leading-whitespace width in columns, tabs counted as four.
fn indent_width(s: &str) -> usize {
    s.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Unify unordered markers on `-`; ordered markers keep their number.
fn canonical_marker(marker: &str) -> &str {
    match marker {
        "*" | "+" => "-",
        other => other,
    }
}

/// Map an observed indentation width onto a nesting depth.
///
/// The stack holds the source indentation of each open level. An item at
/// least [`LEVEL_TOLERANCE`] columns past the innermost level opens a new
/// one; one at least that much before it closes levels until it fits;
/// anything in between is jitter and stays on the current level.
fn depth_for_indent(stack: &mut Vec<usize>, indent: usize) -> usize {
    while let Some(&top) = stack.last() {
        if indent + LEVEL_TOLERANCE <= top {
            stack.pop();
        } else {
            break;
        }
    }
    match stack.last().copied() {
        None => {
            stack.push(indent);
            0
        }
        Some(top) if indent >= top + LEVEL_TOLERANCE => {
            stack.push(indent);
            stack.len() - 1
        }
        Some(_) => stack.len() - 1,
    }
}
