//! Derived markdown export.
//!
//! # Responsibility
//! - Render each block type to line-oriented markup, one list item per block.
//! - Post-process math markup with the fixed `latex_fix` rewrite sequence.
//!
//! # Invariants
//! - The rewrite rules are disjoint, but their order is fixed for
//!   reproducible output.
//! - An empty Math segment renders as a single space so the line survives.
//!
//! # See also
//! - docs/architecture/envelope.md

use crate::model::block::{Block, Document, Grid, Segment};
use crate::serialize::serialize_document;
use once_cell::sync::Lazy;
use regex::Regex;

static LIM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\lim_").expect("valid lim regex"));
static INT_BEFORE_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\int_\{ \}\^\{ \}([A-Za-z])").expect("valid integral regex"));
static INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\int_\{ \}\^\{ \}").expect("valid bare integral regex"));
static MID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\mid_").expect("valid mid regex"));
static STACKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(=|<|>|\\ne|\\ge|\\le)\^\?").expect("valid stacked regex"));
static CUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\cup_").expect("valid cup regex"));
static CAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\cap_").expect("valid cap regex"));
static HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#").expect("valid hash regex"));

/// Applies the fixed rewrite sequence to one math-markup string:
/// limit-operator spacing, empty-bound integral cleanup, stacked relations
/// with a question mark, big union/intersection promotion, `#` escaping.
pub fn latex_fix(latex: &str) -> String {
    // The original expresses the integral-before-letter rule with a
    // lookahead; `regex` has none, so the letter is captured and re-emitted.
    let fixed = LIM_RE.replace_all(latex, r"\lim\limits_");
    let fixed = INT_BEFORE_LETTER_RE.replace_all(&fixed, r"\int ${1}");
    let fixed = INT_RE.replace_all(&fixed, r"\int");
    let fixed = MID_RE.replace_all(&fixed, r"\bigg\rvert_");
    let fixed = STACKED_RE.replace_all(&fixed, r"\stackrel{?}{${1}}");
    let fixed = CUP_RE.replace_all(&fixed, r"\bigcup_");
    let fixed = CAP_RE.replace_all(&fixed, r"\bigcap_");
    HASH_RE.replace_all(&fixed, r"\#").into_owned()
}

/// Renders the document as markdown: a `# title` header when the title is
/// non-empty, then one list item per block. With `append_json` the full
/// envelope trails as a fenced code block.
///
/// # Errors
/// Only the appended-envelope encoding can fail.
pub fn document_to_markdown(
    document: &Document,
    append_json: bool,
) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    if !document.title.is_empty() {
        out.push_str("# ");
        out.push_str(&document.title);
        out.push_str("\n\n");
    }
    let rendered: Vec<String> = document.blocks.values().map(render_block).collect();
    out.push_str(&rendered.join("\n"));

    if append_json {
        let envelope = serde_json::to_string(&serialize_document(document, None))?;
        out.push_str("\n- ```json\n  ");
        out.push_str(&envelope);
        out.push_str("\n  ```");
    }
    Ok(out)
}

fn render_block(block: &Block) -> String {
    let indent_spaces = "  ".repeat(block.indent() as usize);

    match block {
        Block::Note {
            is_answer, content, ..
        } => {
            let math_block = block.is_math_only_note();
            let body: String = content
                .values()
                .map(|segment| render_segment(segment, math_block))
                .collect();
            let answer_mark = if *is_answer { "> " } else { "" };
            format!("{indent_spaces}- {answer_mark}{body}")
        }
        Block::Table { cells, .. } => render_table(cells, &indent_spaces),
        Block::Matrix { cells, .. } => {
            format!(
                "- $${}$$",
                matrix_markup(cells, &format!("{indent_spaces}  "), "")
            )
        }
        Block::MatMul {
            first,
            second,
            result,
            ..
        } => {
            let prefix = format!("{indent_spaces}  ");
            format!(
                "{indent_spaces}- $$\\begin{{array}}{{}}\n\
                 {indent_spaces}  &\n\
                 {second}\n\
                 {indent_spaces}  \\\\ \\\\\n\
                 {first}\n\
                 {indent_spaces}  &\n\
                 {result}\n\
                 {indent_spaces}  \\end{{array}}$$",
                second = matrix_markup(second, &prefix, &prefix),
                first = matrix_markup(first, &prefix, &prefix),
                result = matrix_markup(result, &prefix, &prefix),
            )
        }
        Block::Embed { url, .. } => {
            format!(
                "{indent_spaces}- <iframe src={url} width=900 height=500 style=\"border: none;\" />"
            )
        }
    }
}

fn render_segment(segment: &Segment, math_block: bool) -> String {
    match segment {
        Segment::Text { content } => content.clone(),
        Segment::Math { content } => {
            if content.is_empty() {
                // Placeholder keeps an otherwise-empty line present.
                " ".to_owned()
            } else if math_block {
                format!("$${}$$", latex_fix(content))
            } else {
                format!("${}$", latex_fix(content))
            }
        }
    }
}

fn render_table(cells: &Grid, indent_spaces: &str) -> String {
    let columns = cells.get(0).map_or(0, Vec::len);
    let rows: Vec<String> = cells
        .values()
        .map(|row| {
            let inner: Vec<String> = row.iter().map(|cell| format!(" $${cell}$$ ")).collect();
            format!("{indent_spaces}  |{}|", inner.join("|"))
        })
        .collect();
    format!(
        "{indent_spaces}- {}|\n{indent_spaces}  {}|\n{}",
        "|     ".repeat(columns),
        "| --- ".repeat(columns),
        rows.join("\n")
    )
}

fn matrix_markup(cells: &Grid, prefix: &str, first_line_prefix: &str) -> String {
    let rows: Vec<String> = cells
        .values()
        .map(|row| format!("{prefix}{}", row.join(" & ")))
        .collect();
    format!(
        "{first_line_prefix}\\begin{{bmatrix}}\n{}\n{prefix}\\end{{bmatrix}}",
        rows.join("\\\\\n")
    )
}
