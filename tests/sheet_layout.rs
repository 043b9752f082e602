mod common;

use common::{count_operator, date, media_box, page_operations, page_texts, single_sheet_roster};
use feuille_emargement::{
    Block, CERTIFICATION, Column, LayoutOptions, PageSize, Period, Repository, STAMP_CAPTION,
    Selection, SheetBuilder, TITLE, build_document, generate_attendance_document,
    render_document,
};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn blocks_are_emitted_in_fixed_order() {
    let (store, sid) = single_sheet_roster();
    let session = store.session(sid).unwrap();
    let candidate = &store.candidates(sid, &Selection::All).unwrap()[0];
    let period = &store.periods(sid, &Selection::All).unwrap()[0];
    let opts = LayoutOptions::default();

    let page = SheetBuilder::new(&opts)
        .build_page(&session, candidate, period)
        .unwrap();
    let kinds: Vec<&str> = page
        .blocks
        .iter()
        .map(|b| match b {
            Block::Title(_) => "title",
            Block::Subtitle(_) => "subtitle",
            Block::Info(_) => "info",
            Block::Grid(_) => "grid",
            Block::Certification(_) => "certification",
            Block::Stamp(_) => "stamp",
            Block::Logo(_) => "logo",
            Block::PageNumber(_) => "page-number",
        })
        .collect();
    assert_eq!(
        kinds,
        ["title", "subtitle", "info", "info", "info", "grid", "certification", "stamp"]
    );
}

#[test]
fn cursor_positions_follow_the_sheet_geometry() {
    let (store, sid) = single_sheet_roster();
    let session = store.session(sid).unwrap();
    let candidate = &store.candidates(sid, &Selection::All).unwrap()[0];
    let period = &store.periods(sid, &Selection::All).unwrap()[0];
    let opts = LayoutOptions::default();
    let builder = SheetBuilder::new(&opts);
    let (width, height) = builder.page_size();
    let page = builder.build_page(&session, candidate, period).unwrap();

    let Block::Title(title) = &page.blocks[0] else {
        panic!("first block is the title");
    };
    assert_eq!(title.text, TITLE);
    assert!(approx(title.baseline, height - 60.0));
    assert!(approx(title.x + title.width() / 2.0, width / 2.0));

    let Block::Subtitle(subtitle) = &page.blocks[1] else {
        panic!("second block is the subtitle");
    };
    assert_eq!(subtitle.text, "1 - TP CTRMP Saint-Pierre");
    assert!(approx(subtitle.baseline, height - 80.0));
    assert!(approx(subtitle.x + subtitle.width() / 2.0, width / 2.0));

    let infos: Vec<f32> = page
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Info(t) => Some(t.baseline),
            _ => None,
        })
        .collect();
    assert!(approx(infos[0], height - 100.0));
    assert!(approx(infos[1], height - 112.0));
    assert!(approx(infos[2], height - 124.0));

    let grid = page.grid().unwrap();
    assert!(approx(grid.top, height - 139.0));
    assert_eq!(grid.row_height, 32.0);
    assert_eq!(grid.grid.rows.len(), 5);
    // header + five days
    assert!(approx(grid.bottom(), height - 139.0 - 6.0 * 32.0));

    let Block::Certification(cert) = &page.blocks[6] else {
        panic!("certification follows the grid");
    };
    assert_eq!(cert.text, CERTIFICATION);
    assert!(approx(cert.baseline, grid.bottom() - 40.0));
    assert!(approx(cert.x, 260.0));

    let Block::Stamp(stamp) = &page.blocks[7] else {
        panic!("stamp closes the sheet");
    };
    assert!(approx(stamp.y, cert.baseline - 30.0));
    assert_eq!((stamp.width, stamp.height), (200.0, 50.0));
    assert_eq!(stamp.caption.text, STAMP_CAPTION);
    assert!(approx(stamp.caption.x, stamp.x + 10.0));
    assert!(approx(stamp.caption.baseline, stamp.y + 50.0 - 10.0 - 8.0));
}

#[test]
fn long_period_uses_reduced_rows_and_wider_spacing() {
    let (mut store, sid) = single_sheet_roster();
    let pid = store
        .add_period(sid, date(2024, 1, 1), date(2024, 1, 13))
        .unwrap();
    let session = store.session(sid).unwrap();
    let candidates = store.candidates(sid, &Selection::All).unwrap();
    let periods = store.periods(sid, &Selection::Only(vec![pid])).unwrap();

    let doc = build_document(&session, &candidates, &periods, &LayoutOptions::default()).unwrap();
    let page = &doc.pages[0];
    let grid = page.grid().unwrap();
    assert_eq!(grid.grid.rows.len(), 13);
    assert_eq!(grid.row_height, 26.0);
    let cert = page
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Certification(t) => Some(t.baseline),
            _ => None,
        })
        .unwrap();
    assert!(approx(cert, grid.bottom() - 44.0));
}

#[test]
fn month_long_period_overflows_but_stays_on_one_page() {
    let (store, sid) = single_sheet_roster();
    let session = store.session(sid).unwrap();
    let candidates = store.candidates(sid, &Selection::All).unwrap();
    let month = Period::new(7, sid, date(2024, 1, 1), date(2024, 1, 31)).unwrap();

    let doc = build_document(
        &session,
        &candidates,
        std::slice::from_ref(&month),
        &LayoutOptions::default(),
    )
    .unwrap();
    assert_eq!(doc.pages.len(), 1);
    assert!(doc.pages[0].bottom() < 0.0);

    let bytes =
        render_document(&session, &candidates, &[month], &LayoutOptions::default()).unwrap();
    assert_eq!(common::page_count(&bytes), 1);
}

#[test]
fn candidate_signature_column_can_be_dropped() {
    let (store, sid) = single_sheet_roster();
    let opts = LayoutOptions {
        include_candidate_signature_column: false,
        ..LayoutOptions::default()
    };
    let session = store.session(sid).unwrap();
    let candidates = store.candidates(sid, &Selection::All).unwrap();
    let periods = store.periods(sid, &Selection::All).unwrap();

    let doc = build_document(&session, &candidates, &periods, &opts).unwrap();
    let grid = doc.pages[0].grid().unwrap();
    assert!(!grid.grid.columns.contains(&Column::CandidateSignature));
    assert_eq!(grid.grid.columns.len(), 6);

    let bytes = render_document(&session, &candidates, &periods, &opts).unwrap();
    let texts = &page_texts(&bytes)[0];
    assert!(texts.contains(&"Signature CFA".to_string()));
    assert!(!texts.contains(&"Signature".to_string()));
}

#[test]
fn default_page_is_a4_portrait() {
    let (store, sid) = single_sheet_roster();
    let out = generate_attendance_document(
        &store,
        sid,
        &Selection::All,
        &Selection::All,
        &LayoutOptions::default(),
    )
    .unwrap();
    let (w, h) = media_box(&out.bytes);
    assert!((w - 595.28).abs() < 0.1, "width {w}");
    assert!((h - 841.89).abs() < 0.1, "height {h}");
}

#[test]
fn letter_page_moves_the_title_with_the_top_edge() {
    let (store, sid) = single_sheet_roster();
    let opts = LayoutOptions {
        page_size: PageSize::Letter,
        ..LayoutOptions::default()
    };
    let session = store.session(sid).unwrap();
    let candidates = store.candidates(sid, &Selection::All).unwrap();
    let periods = store.periods(sid, &Selection::All).unwrap();
    let doc = build_document(&session, &candidates, &periods, &opts).unwrap();
    assert_eq!((doc.page_width, doc.page_height), (612.0, 792.0));
    let Block::Title(title) = &doc.pages[0].blocks[0] else {
        panic!("title first");
    };
    assert!(approx(title.baseline, 732.0));

    let bytes = render_document(&session, &candidates, &periods, &opts).unwrap();
    assert_eq!(media_box(&bytes), (612.0, 792.0));
}

#[test]
fn page_numbers_count_across_the_document() {
    let (store, sid) = common::two_by_two_roster();
    let opts = LayoutOptions {
        footer_page_number: true,
        ..LayoutOptions::default()
    };
    let out =
        generate_attendance_document(&store, sid, &Selection::All, &Selection::All, &opts).unwrap();
    let texts = page_texts(&out.bytes);
    for (i, page) in texts.iter().enumerate() {
        let footer = format!("Page {} / 4", i + 1);
        assert!(page.contains(&footer), "page {i} lacks {footer:?}");
    }
}

#[test]
fn grid_header_is_filled_and_ruled() {
    let (store, sid) = single_sheet_roster();
    let out = generate_attendance_document(
        &store,
        sid,
        &Selection::All,
        &Selection::All,
        &LayoutOptions::default(),
    )
    .unwrap();
    let ops = &page_operations(&out.bytes)[0];
    // header fill and the stamp box are the only rectangles
    assert_eq!(count_operator(ops, "re"), 2);
    assert_eq!(count_operator(ops, "f"), 1);
    // 7 horizontal rules (header + 5 days + bottom) and 8 vertical ones
    assert_eq!(count_operator(ops, "m"), 15);
    // no logo by default
    assert_eq!(count_operator(ops, "Do"), 0);

    let texts = &page_texts(&out.bytes)[0];
    for label in ["Date", "Matin", "Après-midi", "Signature", "Signature CFA"] {
        assert!(texts.contains(&label.to_string()), "missing header {label:?}");
    }
    assert_eq!(texts.iter().filter(|t| *t == "Observation(s)").count(), 2);
}
