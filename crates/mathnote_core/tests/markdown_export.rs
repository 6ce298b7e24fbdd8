use mathnote_core::{document_to_markdown, Block, Document, KeyedVec, Segment};

fn document_with(title: &str, blocks: Vec<Block>) -> Document {
    let mut document = Document::new(title);
    document.blocks = KeyedVec::from_values(blocks);
    document
}

fn cells(values: &[&[&str]]) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[test]
fn title_becomes_a_header_and_inline_math_uses_single_dollars() {
    let document = document_with(
        "calc",
        vec![Block::note_with_segments(
            vec![Segment::text("let "), Segment::math("x=1")],
            0,
            false,
        )],
    );
    let markdown = document_to_markdown(&document, false).unwrap();
    assert_eq!(markdown, "# calc\n\n- let $x=1$");
}

#[test]
fn empty_title_renders_no_header() {
    let document = document_with("", vec![Block::note_line("hi", 0)]);
    assert_eq!(document_to_markdown(&document, false).unwrap(), "- hi");
}

#[test]
fn math_only_notes_use_display_math() {
    let document = document_with(
        "",
        vec![Block::note_with_segments(
            vec![Segment::math("x^2=4")],
            0,
            false,
        )],
    );
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "- $$x^2=4$$"
    );
}

#[test]
fn math_markup_is_rewritten_on_export() {
    let document = document_with(
        "",
        vec![Block::note_with_segments(
            vec![Segment::math("\\lim_{n} a_n =^? 0")],
            0,
            false,
        )],
    );
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "- $$\\lim\\limits_{n} a_n \\stackrel{?}{=} 0$$"
    );
}

#[test]
fn empty_math_renders_as_a_single_space() {
    let document = document_with(
        "",
        vec![Block::note_with_segments(
            vec![Segment::text("a"), Segment::math(""), Segment::text("b")],
            0,
            false,
        )],
    );
    assert_eq!(document_to_markdown(&document, false).unwrap(), "- a b");
}

#[test]
fn answer_notes_and_indent_gain_their_prefixes() {
    let document = document_with(
        "",
        vec![
            Block::note_line("question", 0),
            Block::note_with_segments(vec![Segment::text("done")], 1, true),
        ],
    );
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "- question\n  - > done"
    );
}

#[test]
fn tables_render_a_blank_header_row_and_raw_cells() {
    let document = document_with(
        "",
        vec![Block::table_with_cells(cells(&[&["a", "#"], &["c", "d"]]), 0)],
    );
    // Cell markup is emitted verbatim: no rewrite pass, `#` stays `#`.
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "- |     |     |\n  | --- | --- |\n  | $$a$$ | $$#$$ |\n  | $$c$$ | $$d$$ |"
    );
}

#[test]
fn indented_tables_indent_every_line() {
    let document = document_with("", vec![Block::table_with_cells(cells(&[&["a"]]), 1)]);
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "  - |     |\n    | --- |\n    | $$a$$ |"
    );
}

#[test]
fn matrices_render_as_one_display_bmatrix() {
    let document = document_with(
        "",
        vec![Block::matrix(cells(&[&["1", "2"], &["3", "4"]]), 0)],
    );
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "- $$\\begin{bmatrix}\n  1 & 2\\\\\n  3 & 4\n  \\end{bmatrix}$$"
    );
}

#[test]
fn matmul_lays_out_the_three_grids_in_an_array() {
    let document = document_with(
        "",
        vec![Block::mat_mul(
            cells(&[&["a"]]),
            cells(&[&["b"]]),
            cells(&[&["c"]]),
            0,
        )],
    );
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "- $$\\begin{array}{}\n\
         \x20 &\n\
         \x20 \\begin{bmatrix}\n\
         \x20 b\n\
         \x20 \\end{bmatrix}\n\
         \x20 \\\\ \\\\\n\
         \x20 \\begin{bmatrix}\n\
         \x20 a\n\
         \x20 \\end{bmatrix}\n\
         \x20 &\n\
         \x20 \\begin{bmatrix}\n\
         \x20 c\n\
         \x20 \\end{bmatrix}\n\
         \x20 \\end{array}$$"
    );
}

#[test]
fn embeds_render_as_an_iframe() {
    let document = document_with(
        "",
        vec![Block::embed("https://example.com/sim", 1)],
    );
    assert_eq!(
        document_to_markdown(&document, false).unwrap(),
        "  - <iframe src=https://example.com/sim width=900 height=500 style=\"border: none;\" />"
    );
}

#[test]
fn append_json_trails_the_envelope_in_a_fenced_item() {
    let document = document_with("t", vec![Block::note_line("hi", 0)]);
    let markdown = document_to_markdown(&document, true).unwrap();

    assert!(markdown.starts_with("# t\n\n- hi\n- ```json\n  "));
    assert!(markdown.ends_with("\n  ```"));
    assert!(markdown.contains("\"version\":3"));
    assert!(markdown.contains("\"type\":\"NOTE\""));
}
