// src/gui/table_model.rs
//! TableModel: what the viewer shows for one loaded source.
//!
//! Layers, bottom up:
//! - the `TableView` built from the source and the resolved profile
//!   (column order, preset filters, formatted cells);
//! - the live search (filter row + global box), applied on display text;
//! - the current sort.
//!
//! `visible` holds view-row indices after search and sort; the data table
//! renders exactly those, and Copy/Export go through `visible_view`.

use std::cmp::Ordering;

use crate::filter::LiveSearch;
use crate::format::ColumnKind;
use crate::render::TableView;

#[derive(Clone, Debug, Default)]
pub struct TableModel {
    pub view: TableView,
    text: Vec<Vec<String>>,
    pub search: LiveSearch,
    sort: Option<(usize, bool)>,
    pub visible: Vec<usize>,
}

impl TableModel {
    pub fn new(view: TableView) -> Self {
        let text = view.text_rows();
        let mut model = Self {
            search: LiveSearch::new(view.keys.len()),
            view,
            text,
            sort: None,
            visible: Vec::new(),
        };
        model.refresh();
        model
    }

    pub fn ncols(&self) -> usize { self.view.keys.len() }
    pub fn nrows(&self) -> usize { self.view.rows.len() }
    pub fn is_empty(&self) -> bool { self.view.rows.is_empty() }
    pub fn sort(&self) -> Option<(usize, bool)> { self.sort }

    pub fn text(&self, row: usize, col: usize) -> &str {
        self.text.get(row).and_then(|r| r.get(col)).map(String::as_str).unwrap_or("")
    }

    pub fn is_orderable(&self, col: usize) -> bool {
        self.view.keys.get(col).is_some_and(|k| !ColumnKind::of(k).is_fixed())
    }

    pub fn set_column_search(&mut self, col: usize, text: &str) {
        if self.search.column_text(col) != text {
            self.search.set_column(col, text);
            self.refresh();
        }
    }

    pub fn set_global_search(&mut self, text: &str) {
        if self.search.global_text() != text {
            self.search.set_global(text);
            self.refresh();
        }
    }

    /// Click on a header: ascending, then descending, on the same column.
    pub fn toggle_sort(&mut self, col: usize) {
        if !self.is_orderable(col) {
            return;
        }
        self.sort = match self.sort {
            Some((c, true)) if c == col => Some((col, false)),
            _ => Some((col, true)),
        };
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: Option<(usize, bool)>) {
        self.sort = sort.filter(|(c, _)| self.is_orderable(*c));
        self.refresh();
    }

    /// Recompute visible rows from search + sort.
    pub fn refresh(&mut self) {
        let mut vis = self.search.visible_rows(&self.text);
        if let Some((col, asc)) = self.sort {
            let text = &self.text;
            vis.sort_by(|&a, &b| {
                let ord = compare_cells(&text[a][col], &text[b][col]);
                if asc { ord } else { ord.reverse() }
            });
        }
        self.visible = vis;
    }

    /// Visible rows, in display order, as a view for export.
    pub fn visible_view(&self) -> TableView {
        TableView {
            keys: self.view.keys.clone(),
            captions: self.view.captions.clone(),
            rows: self.visible.iter().map(|&i| self.view.rows[i].clone()).collect(),
            source_rows: self.visible.iter().map(|&i| self.view.source_rows[i]).collect(),
        }
    }
}

/// Case-insensitive; blanks after text when ascending.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
