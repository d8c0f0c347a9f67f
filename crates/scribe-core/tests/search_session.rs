use scribe_core::{Cursor, Document, Highlight, SearchKey, SearchState, SearchStatus, Viewport};

fn type_query(
    state: &mut SearchState,
    query: &str,
    doc: &mut Document,
    cursor: &mut Cursor,
    vp: &mut Viewport,
) {
    for ch in query.chars() {
        let status = state.handle_key(SearchKey::Char(ch), doc, cursor, vp);
        assert_eq!(status, SearchStatus::Active);
    }
}

#[test]
fn test_match_moves_cursor_and_overlays_span() {
    let mut doc = Document::from_text("alpha\nneedle here\nomega", 8);
    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "needle", &mut doc, &mut cursor, &mut vp);

    assert_eq!(cursor, Cursor { row: 1, col: 0 });
    let hl = doc.row(1).expect("row").hl();
    assert!(hl[..6].iter().all(|&h| h == Highlight::Match));
    assert!(hl[6..].iter().all(|&h| h != Highlight::Match));

    // The matched row lands at the top of the window on the next scroll.
    vp.scroll(cursor, &doc);
    assert_eq!(vp.row_off, 1);
}

#[test]
fn test_match_position_uses_rendered_content() {
    let mut doc = Document::from_text("\tneedle", 8);
    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "needle", &mut doc, &mut cursor, &mut vp);

    // The match starts at rendered column 8, owned by raw column 1.
    assert_eq!(cursor, Cursor { row: 0, col: 1 });
    let hl = doc.row(0).expect("row").hl();
    assert!(hl[8..14].iter().all(|&h| h == Highlight::Match));
    assert!(hl[..8].iter().all(|&h| h != Highlight::Match));
}

#[test]
fn test_forward_search_wraps_back_to_single_match() {
    let mut doc = Document::from_text("alpha\nneedle here\nomega", 8);
    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "needle", &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 1);

    // Forward from the only match cycles through every row and returns.
    assert_eq!(
        state.handle_key(SearchKey::Next, &mut doc, &mut cursor, &mut vp),
        SearchStatus::Active
    );
    assert_eq!(cursor, Cursor { row: 1, col: 0 });

    assert_eq!(
        state.handle_key(SearchKey::Next, &mut doc, &mut cursor, &mut vp),
        SearchStatus::Active
    );
    assert_eq!(cursor, Cursor { row: 1, col: 0 });
}

#[test]
fn test_direction_keys_cycle_between_matches() {
    let mut doc = Document::from_text("aa\nxx\naa", 8);
    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "aa", &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 0);

    state.handle_key(SearchKey::Next, &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 2);

    state.handle_key(SearchKey::Prev, &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 0);

    state.handle_key(SearchKey::Prev, &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 2);
}

#[test]
fn test_cancel_restores_cursor_and_both_offsets() {
    let text = (0..60)
        .map(|i| format!("row {i} with needle"))
        .collect::<Vec<_>>()
        .join("\n");
    let mut doc = Document::from_text(&text, 8);
    let mut cursor = Cursor { row: 40, col: 7 };
    let mut vp = Viewport::new(10, 20);
    vp.row_off = 35;
    vp.col_off = 3;

    let mut state = SearchState::default();
    state.begin(cursor, &vp);
    type_query(&mut state, "needle", &mut doc, &mut cursor, &mut vp);
    assert_ne!(cursor, Cursor { row: 40, col: 7 });

    let status = state.handle_key(SearchKey::Cancel, &mut doc, &mut cursor, &mut vp);
    assert_eq!(status, SearchStatus::Cancelled);
    assert_eq!(cursor, Cursor { row: 40, col: 7 });
    assert_eq!(vp.row_off, 35);
    assert_eq!(vp.col_off, 3);
    assert!(!state.is_active());
}

#[test]
fn test_accept_keeps_cursor_and_clears_overlay() {
    let mut doc = Document::from_text("alpha\nneedle here", 8);
    let before: Vec<Highlight> = doc.row(1).expect("row").hl().to_vec();

    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "needle", &mut doc, &mut cursor, &mut vp);
    assert!(doc.row(1).expect("row").hl().contains(&Highlight::Match));

    let status = state.handle_key(SearchKey::Accept, &mut doc, &mut cursor, &mut vp);
    assert_eq!(status, SearchStatus::Accepted);
    assert_eq!(cursor, Cursor { row: 1, col: 0 });
    assert_eq!(doc.row(1).expect("row").hl(), &before[..]);
    assert!(!state.is_active());
}

#[test]
fn test_backspace_edits_query_and_rescans() {
    let mut doc = Document::from_text("ab\nac", 8);
    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "ac", &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 1);

    // "ac" -> "a": the scan restarts from the top and lands on row 0.
    state.handle_key(SearchKey::Backspace, &mut doc, &mut cursor, &mut vp);
    assert_eq!(state.query(), Some("a"));
    assert_eq!(cursor.row, 0);
}

#[test]
fn test_snapshot_is_one_row_deep() {
    let mut doc = Document::from_text("first hit\nsecond hit", 8);
    let clean_row0: Vec<Highlight> = doc.row(0).expect("row").hl().to_vec();

    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    state.begin(cursor, &vp);
    type_query(&mut state, "hit", &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 0);

    // Moving to the next match restores row 0 before overlaying row 1.
    state.handle_key(SearchKey::Next, &mut doc, &mut cursor, &mut vp);
    assert_eq!(cursor.row, 1);
    assert_eq!(doc.row(0).expect("row").hl(), &clean_row0[..]);
    assert!(doc.row(1).expect("row").hl().contains(&Highlight::Match));
}

#[test]
fn test_keys_without_open_prompt_are_ignored() {
    let mut doc = Document::from_text("x", 8);
    let mut cursor = Cursor::default();
    let mut vp = Viewport::new(10, 40);
    let mut state = SearchState::default();

    let status = state.handle_key(SearchKey::Char('x'), &mut doc, &mut cursor, &mut vp);
    assert_eq!(status, SearchStatus::Active);
    assert_eq!(cursor, Cursor::default());
    assert!(!state.is_active());
}
