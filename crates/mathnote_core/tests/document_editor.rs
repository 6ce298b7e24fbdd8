use mathnote_core::{
    deserialize_document, Block, Document, DocumentEditor, Direction, FocusPointer, KeyedVec,
    Segment,
};

fn document_with(blocks: Vec<Block>) -> Document {
    let mut document = Document::new("test");
    document.blocks = KeyedVec::from_values(blocks);
    document
}

#[test]
fn table_sentinel_replaces_the_note_in_place() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note(2)]));
    editor.focus_block(0).unwrap();

    editor.segment_changed("\\table").unwrap();

    let blocks = &editor.document().blocks;
    assert_eq!(blocks.len(), 2);
    let Some(Block::Table { cells, indent }) = blocks.get(0) else {
        panic!("expected a table at index 0");
    };
    assert_eq!(*indent, 2);
    assert_eq!(cells.len(), 2);
    assert!(cells.values().all(|row| row == &vec!["", ""]));
    assert_eq!(blocks.get(1), Some(&Block::note(2)));

    // Editing continues in the trailing empty note.
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment {
            block: 1,
            segment: 0,
            side: None
        })
    );
}

#[test]
fn embed_sentinel_replaces_and_clears_focus() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note(1)]));
    editor.focus_block(0).unwrap();

    editor.segment_changed("\\embed").unwrap();

    assert_eq!(
        editor.document().blocks.get(0),
        Some(&Block::embed("https://", 1))
    );
    assert_eq!(editor.focus_pointer(), None);
}

#[test]
fn sentinel_needs_a_sole_segment() {
    let block = Block::note_with_segments(
        vec![Segment::text("\\table"), Segment::math("x")],
        0,
        false,
    );
    let mut editor = DocumentEditor::new(document_with(vec![block]));
    editor.focus_segment(0, 0).unwrap();

    editor.segment_changed("\\table").unwrap();

    assert_eq!(editor.document().blocks.len(), 1);
    assert!(matches!(
        editor.document().blocks.get(0),
        Some(Block::Note { .. })
    ));
}

#[test]
fn deleting_an_emptied_math_segment_merges_its_neighbors() {
    let block = Block::note_with_segments(
        vec![Segment::text("ab"), Segment::math(""), Segment::text("cd")],
        0,
        false,
    );
    let mut editor = DocumentEditor::new(document_with(vec![block]));
    editor.focus_segment(0, 1).unwrap();

    editor.delete_out().unwrap();

    let Some(Block::Note { content, .. }) = editor.document().blocks.get(0) else {
        panic!("expected a note block");
    };
    assert_eq!(content.len(), 1);
    assert_eq!(content.get(0), Some(&Segment::text("abcd")));
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment {
            block: 0,
            segment: 0,
            side: None
        })
    );
}

#[test]
fn loaded_math_only_note_survives_delete_out() {
    // Edits never build a note whose sole segment is Math, but the envelope
    // accepts one.
    let json = r#"{
        "title": "t",
        "blocks": [
            {"type": "NOTE", "indent": 0, "isAnswer": false,
             "content": [{"type": "MATH", "content": "x=1"}]}
        ],
        "version": 3
    }"#;
    let mut editor = DocumentEditor::new(deserialize_document(json).unwrap());
    editor.focus_block(0).unwrap();

    editor.delete_out().unwrap();

    assert_eq!(editor.document().blocks.len(), 1);
    assert!(matches!(
        editor.document().blocks.get(0),
        Some(Block::Note { .. })
    ));
}

#[test]
fn vertical_navigation_crosses_into_tables_edge_first() {
    let mut editor = DocumentEditor::new(document_with(vec![
        Block::note_line("above", 0),
        Block::table(0),
        Block::note_line("below", 0),
    ]));
    editor.focus_block(0).unwrap();

    editor.down_out().unwrap();
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Cell {
            block: 1,
            row: 0,
            column: 0,
            side: Some(Direction::Top)
        })
    );

    editor.down_out().unwrap();
    assert!(matches!(
        editor.focus_pointer(),
        Some(FocusPointer::Cell { block: 1, row: 1, .. })
    ));

    editor.down_out().unwrap();
    assert!(matches!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment { block: 2, .. })
    ));

    // Coming back up enters the table at its last row.
    editor.up_out().unwrap();
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Cell {
            block: 1,
            row: 1,
            column: 0,
            side: Some(Direction::Bottom)
        })
    );
}

#[test]
fn vertical_navigation_skips_embed_blocks() {
    let mut editor = DocumentEditor::new(document_with(vec![
        Block::note_line("a", 0),
        Block::embed("https://example.com", 0),
        Block::note_line("b", 0),
    ]));
    editor.focus_block(0).unwrap();

    editor.down_out().unwrap();
    assert!(matches!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment { block: 2, .. })
    ));
}

#[test]
fn document_edges_are_noops() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note_line("only", 0)]));
    editor.focus_block(0).unwrap();
    let before = editor.focus_pointer();

    editor.up_out().unwrap();
    editor.down_out().unwrap();
    editor.left_out().unwrap();
    editor.right_out().unwrap();

    assert_eq!(editor.focus_pointer(), before);
    assert_eq!(editor.document().blocks.len(), 1);
}

#[test]
fn deleting_an_empty_note_merges_into_the_previous_block() {
    let mut editor = DocumentEditor::new(document_with(vec![
        Block::note_line("keep", 0),
        Block::note(0),
    ]));
    editor.focus_segment(1, 0).unwrap();

    editor.delete_out().unwrap();

    assert_eq!(editor.document().blocks.len(), 1);
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment {
            block: 0,
            segment: 0,
            side: Some(Direction::Right)
        })
    );
}

#[test]
fn delete_out_on_the_first_block_is_a_noop() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note(0)]));
    editor.focus_block(0).unwrap();

    editor.delete_out().unwrap();

    assert_eq!(editor.document().blocks.len(), 1);
}

#[test]
fn insert_after_adds_an_empty_note_with_matching_indent() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note_line("head", 3)]));
    editor.focus_block(0).unwrap();

    editor.insert_after().unwrap();

    assert_eq!(editor.document().blocks.len(), 2);
    assert_eq!(editor.document().blocks.get(1), Some(&Block::note(3)));
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment {
            block: 1,
            segment: 0,
            side: None
        })
    );
}

#[test]
fn insert_math_splits_the_focused_text_segment() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note_line("helloworld", 0)]));
    editor.focus_block(0).unwrap();

    editor.insert_math("hello", "world").unwrap();

    let Some(Block::Note { content, .. }) = editor.document().blocks.get(0) else {
        panic!("expected a note block");
    };
    assert_eq!(content.get(0), Some(&Segment::text("hello")));
    assert_eq!(content.get(1), Some(&Segment::math("")));
    assert_eq!(content.get(2), Some(&Segment::text("world")));
    assert_eq!(
        editor.focus_pointer(),
        Some(FocusPointer::Segment {
            block: 0,
            segment: 1,
            side: None
        })
    );
}

#[test]
fn events_without_focus_are_idle_noops() {
    let mut editor = DocumentEditor::new(document_with(vec![Block::note(0)]));

    editor.down_out().unwrap();
    editor.delete_out().unwrap();
    editor.segment_changed("ignored").unwrap();
    editor.insert_block_after().unwrap();

    assert_eq!(editor.focus_pointer(), None);
    assert_eq!(editor.document().blocks.len(), 1);
    assert_eq!(editor.document().blocks.get(0), Some(&Block::note(0)));
}
