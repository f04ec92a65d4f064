//! Extraction of the label→text summary table embedded in article bodies.
//!
//! Every article opens with a two-column HTML table ("Who", "When", "Why",
//! ...). [`extract_table_data`] reads the cells of the first `<table>` in
//! document order and pairs them up sequentially into a [`TableData`].

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::{element, end_tag, rewrite_str, text, RewriteStrSettings};
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// TableData
// ---------------------------------------------------------------------------

/// Ordered label→text mapping.
///
/// Insertion order is preserved. Inserting a label that already exists
/// replaces its text but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableData {
    entries: Vec<(String, String)>,
}

impl TableData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the text for `label`.
    pub fn insert(&mut self, label: impl Into<String>, text: impl Into<String>) {
        let label = label.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = text,
            None => self.entries.push((label, text)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, t)| t.as_str())
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for TableData {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (label, text) in iter {
            data.insert(label, text);
        }
        data
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScanState {
    tables_seen: usize,
    depth: usize,
    cells: Vec<String>,
}

impl ScanState {
    /// Inside the first top-level table and outside any table nested in it.
    fn in_first_table(&self) -> bool {
        self.tables_seen == 1 && self.depth == 1
    }
}

/// Parse the first `<table>` of `html` into label→text pairs.
///
/// Cells are paired sequentially: `td[0]→td[1]`, `td[2]→td[3]`, ...
/// Text of nested inline markup is flattened into its cell and HTML
/// entities are decoded. A table nested inside a cell contributes no
/// cells and no text.
///
/// # Errors
///
/// - [`CoreError::Parse`] if the document has no `<table>`.
/// - [`CoreError::Parse`] if the table holds an odd number of cells.
pub fn extract_table_data(html: &str) -> Result<TableData, CoreError> {
    let state = Rc::new(RefCell::new(ScanState::default()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("table", {
                    let state = Rc::clone(&state);
                    move |el| {
                        let Some(handlers) = el.end_tag_handlers() else {
                            return Ok(());
                        };
                        {
                            let mut state = state.borrow_mut();
                            if state.depth == 0 {
                                state.tables_seen += 1;
                            }
                            state.depth += 1;
                        }
                        let state = Rc::clone(&state);
                        handlers.push(end_tag!(move |_end| {
                            let mut state = state.borrow_mut();
                            state.depth = state.depth.saturating_sub(1);
                            Ok(())
                        }));
                        Ok(())
                    }
                }),
                element!("td", {
                    let state = Rc::clone(&state);
                    move |_el| {
                        let mut state = state.borrow_mut();
                        if state.in_first_table() {
                            state.cells.push(String::new());
                        }
                        Ok(())
                    }
                }),
                text!("td", {
                    let state = Rc::clone(&state);
                    move |chunk| {
                        let mut state = state.borrow_mut();
                        if state.in_first_table() {
                            if let Some(cell) = state.cells.last_mut() {
                                cell.push_str(chunk.as_str());
                            }
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| CoreError::Parse(format!("Malformed article HTML: {e}")))?;

    let state = state.borrow();
    if state.tables_seen == 0 {
        return Err(CoreError::Parse("Article body contains no table".into()));
    }
    if state.cells.len() % 2 != 0 {
        return Err(CoreError::Parse(format!(
            "Article table has an odd number of cells ({}); expected label/value pairs",
            state.cells.len()
        )));
    }

    Ok(state
        .cells
        .chunks_exact(2)
        .map(|pair| (decode_entities(&pair[0]), decode_entities(&pair[1])))
        .collect())
}

/// Decode every HTML5 character reference. A reference that does not
/// resolve, or a bare `&`, is kept as written.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail.find(';').and_then(|end| {
            let reference = &tail[..=end];
            unescape_with(reference, resolve_html5_entity)
                .ok()
                .map(|text| (text.into_owned(), reference.len()))
        });
        match decoded {
            Some((text, consumed)) => {
                out.push_str(&text);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
