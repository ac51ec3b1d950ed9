// src/render.rs
//
// Table rendering: DataSource + Profile → detached <table> markup.
//
// Two steps:
// - TableView::build   – pick/ordered columns, drop rows failing the preset
//                        filters, format every cell. Shared with export and
//                        the desktop viewer.
// - render_table       – lay a TableView out as HTML (normal or rotated) and
//                        attach the widget options as data attributes.

use std::collections::BTreeMap;

use crate::config::consts::HEADER_CLASS_PREFIX;
use crate::config::profile::Profile;
use crate::core::html::{escape_attr, escape_text};
use crate::data::{CellValue, DataSource};
use crate::filter::ColumnFilter;
use crate::format::{ColumnKind, Fragment, format_value};

/// Widget layout, taken from the resolved profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub rotate: bool,
    pub paging: bool,
    pub page_length: i32,
    pub dom: String,
}

impl From<&Profile> for Layout {
    fn from(p: &Profile) -> Self {
        Self {
            rotate: p.rotate,
            paging: p.paging,
            page_length: p.page_length,
            dom: p.dom.clone(),
        }
    }
}

impl Layout {
    fn has_filter_row(&self) -> bool {
        !self.rotate && self.dom.contains('f')
    }
}

/// Ordered, pre-filtered, formatted view over a data source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableView {
    pub keys: Vec<String>,
    pub captions: Vec<String>,
    pub rows: Vec<Vec<Fragment>>,
    /// Index into `DataSource::entries` for each row.
    pub source_rows: Vec<usize>,
}

impl TableView {
    pub fn build(ds: &DataSource, profile: &Profile) -> Self {
        let order = profile.column_order(&ds.columns);
        let filters = compile_filters(ds, profile);
        Self::build_with(ds, &order, &filters)
    }

    /// Build from an explicit column order and compiled predicates
    /// (`(column index, filter)` pairs).
    pub fn build_with(ds: &DataSource, order: &[usize], filters: &[(usize, ColumnFilter)]) -> Self {
        // Hand-built sources may be ragged: missing captions and cells read as empty.
        let keys: Vec<String> = order.iter().filter_map(|&i| ds.columns.get(i).cloned()).collect();
        let order: Vec<usize> = order.iter().copied().filter(|&i| i < ds.columns.len()).collect();
        let captions: Vec<String> =
            order.iter().map(|&i| ds.captions.get(i).cloned().unwrap_or_default()).collect();
        let empty = CellValue::Empty;

        let mut rows = Vec::new();
        let mut source_rows = Vec::new();
        for (ri, entry) in ds.entries.iter().enumerate() {
            let pass = filters.iter().all(|(ci, f)| entry.get(*ci).is_none_or(|v| f.accepts(v)));
            if !pass {
                continue;
            }
            rows.push(
                order
                    .iter()
                    .map(|&ci| format_value(&ds.columns[ci], entry.get(ci).unwrap_or(&empty)))
                    .collect(),
            );
            source_rows.push(ri);
        }

        Self { keys, captions, rows, source_rows }
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    /// Display text per row, same order as `rows`.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.iter().map(Fragment::text).collect()).collect()
    }
}

/// Compile the profile's preset filters against the source's columns.
/// Filters on columns the source doesn't have are dropped.
pub fn compile_filters(ds: &DataSource, profile: &Profile) -> Vec<(usize, ColumnFilter)> {
    let mut out = Vec::with_capacity(profile.filter_columns.len());
    for (key, spec) in &profile.filter_columns {
        match ds.column_index(key) {
            Some(ci) => out.push((ci, ColumnFilter::compile(spec))),
            None => logd!("Render: filter on unknown column {:?} ignored", key),
        }
    }
    out
}

#[derive(Clone, Debug)]
pub struct RenderedTable {
    pub id: String,
    pub html: String,
    pub row_count: usize,
    pub keys: Vec<String>,
}

/// Render one data source under one profile.
pub fn render(ds: &DataSource, profile: &Profile, id: &str) -> RenderedTable {
    let view = TableView::build(ds, profile);
    let layout = Layout::from(profile);
    let html = render_table(id, &view, &layout);
    logd!(
        "Render: #{} {} cols, {}/{} rows{}",
        id,
        view.keys.len(),
        view.row_count(),
        ds.row_count(),
        if layout.rotate { " (rotated)" } else { "" }
    );
    RenderedTable { id: s!(id), html, row_count: view.row_count(), keys: view.keys }
}

/// Lay out a view as a `<table class="toh">`.
pub fn render_table(id: &str, view: &TableView, layout: &Layout) -> String {
    let mut out = String::with_capacity(256 + view.rows.len() * view.keys.len() * 48);

    out.push_str(&format!(r#"<table class="toh" id="{}""#, escape_attr(id)));
    if layout.rotate {
        out.push_str(r#" data-rotate="true">"#);
        push_rotated(&mut out, view);
    } else {
        out.push_str(&widget_attrs(view, layout));
        out.push('>');
        push_normal(&mut out, view, layout);
    }
    out.push_str("</table>");
    out
}

fn widget_attrs(view: &TableView, layout: &Layout) -> String {
    let fixed: Vec<usize> = (0..view.keys.len())
        .filter(|&i| ColumnKind::of(&view.keys[i]).is_fixed())
        .collect();
    let order: Vec<serde_json::Value> = (0..view.keys.len())
        .filter(|i| !fixed.contains(i))
        .map(|i| serde_json::json!([i, "asc"]))
        .collect();

    let mut attrs = BTreeMap::new();
    attrs.insert("data-dom", layout.dom.clone());
    attrs.insert("data-paging", layout.paging.to_string());
    attrs.insert("data-page-length", layout.page_length.to_string());
    attrs.insert("data-order", serde_json::Value::Array(order).to_string());
    attrs.insert("data-unorderable", serde_json::json!(fixed).to_string());

    attrs
        .into_iter()
        .map(|(k, v)| format!(r#" {}="{}""#, k, escape_attr(&v)))
        .collect()
}

fn header_cell(key: &str, caption: &str) -> String {
    format!(
        r#"<th class="{}{}" title="{}">{}</th>"#,
        HEADER_CLASS_PREFIX,
        escape_attr(key),
        escape_attr(caption),
        escape_text(caption)
    )
}

fn push_normal(out: &mut String, view: &TableView, layout: &Layout) {
    out.push_str("<thead><tr>");
    for (key, cap) in view.keys.iter().zip(&view.captions) {
        out.push_str(&header_cell(key, cap));
    }
    out.push_str("</tr>");

    if layout.has_filter_row() {
        out.push_str(r#"<tr class="filters">"#);
        for (key, cap) in view.keys.iter().zip(&view.captions) {
            if ColumnKind::of(key).is_fixed() {
                out.push_str("<th>&nbsp;</th>");
            } else {
                out.push_str(&format!(
                    r#"<th><input style="width:100%" type="text" placeholder="{}" /></th>"#,
                    escape_attr(cap)
                ));
            }
        }
        out.push_str("</tr>");
    }
    out.push_str("</thead><tbody>");

    for row in &view.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&cell.to_html());
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");
}

/// One row per column: caption cell first, then one cell per entry.
fn push_rotated(out: &mut String, view: &TableView) {
    out.push_str("<tbody>");
    for (ci, (key, cap)) in view.keys.iter().zip(&view.captions).enumerate() {
        out.push_str("<tr>");
        out.push_str(&header_cell(key, cap));
        for row in &view.rows {
            out.push_str("<td>");
            out.push_str(&row[ci].to_html());
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");
}
