#![allow(dead_code)]

use chrono::NaiveDate;
use feuille_emargement::{Formation, RosterStore, SessionId, Site};
use lopdf::content::Content;
use lopdf::{Document, Object};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Session "TP CTRMP Saint-Pierre" with one candidate (Jean Dupont) and one
/// five-day period, 2024-01-08 to 2024-01-12.
pub fn single_sheet_roster() -> (RosterStore, SessionId) {
    let mut store = RosterStore::new();
    let sid = store.create_session(Site::SaintPierre, Formation::TpCtrmp);
    store.add_candidate(sid, "Dupont", "Jean").unwrap();
    store
        .add_period(sid, date(2024, 1, 8), date(2024, 1, 12))
        .unwrap();
    (store, sid)
}

/// Two candidates and two periods in one session, plus an unrelated second
/// session so "all" selections have something to leave out.
pub fn two_by_two_roster() -> (RosterStore, SessionId) {
    let mut store = RosterStore::new();
    let sid = store.create_session(Site::SaintAndre, Formation::TpClvul);
    store.add_candidate(sid, "Dupont", "Jean").unwrap();
    store.add_candidate(sid, "Martin", "Claire").unwrap();
    store
        .add_period(sid, date(2024, 1, 8), date(2024, 1, 12))
        .unwrap();
    store
        .add_period(sid, date(2024, 2, 5), date(2024, 2, 6))
        .unwrap();

    let other = store.create_session(Site::SaintPierre, Formation::TpCtcr);
    store.add_candidate(other, "Payet", "Luc").unwrap();
    store
        .add_period(other, date(2024, 3, 1), date(2024, 3, 1))
        .unwrap();
    (store, sid)
}

pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("generated PDF parses")
}

pub fn page_count(bytes: &[u8]) -> usize {
    load(bytes).get_pages().len()
}

/// (width, height) of the first page's MediaBox.
pub fn media_box(bytes: &[u8]) -> (f32, f32) {
    let doc = load(bytes);
    let (_, &page_id) = doc.get_pages().iter().next().expect("at least one page");
    let page = doc.get_dictionary(page_id).unwrap();
    let rect: Vec<f32> = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect();
    (rect[2] - rect[0], rect[3] - rect[1])
}

/// Decoded content-stream operations of each page, in page order.
pub fn page_operations(bytes: &[u8]) -> Vec<Vec<lopdf::content::Operation>> {
    let doc = load(bytes);
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let raw = doc.get_page_content(page_id).unwrap();
            Content::decode(&raw).unwrap().operations
        })
        .collect()
}

/// Every string shown with `Tj` on each page. WinAnsi and Latin-1 agree on
/// all characters the sheets use.
pub fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    page_operations(bytes)
        .into_iter()
        .map(|ops| {
            ops.iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(s, _)) => Some(s.iter().map(|&b| b as char).collect()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

pub fn count_operator(ops: &[lopdf::content::Operation], operator: &str) -> usize {
    ops.iter().filter(|op| op.operator == operator).count()
}
