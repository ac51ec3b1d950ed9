// src/export.rs
//
// Export renderings of ToH data (no file I/O here, see `file`):
// - TableView → CSV / TSV / standalone HTML
// - one entry → per-device JSON document and Markdown page

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::config::consts::DEVICE_PAGE_DATE;
use crate::config::options::ExportOptions;
use crate::csv::to_export_string;
use crate::data::{CellValue, DataSource};
use crate::render::{Layout, TableView, render_table};

/// Whole export body for the configured format.
pub fn export_string(view: &TableView, layout: &Layout, opts: &ExportOptions) -> String {
    match opts.format.delim() {
        Some(sep) => to_export_string(&view.captions, &view.text_rows(), opts.include_headers, sep),
        None => html_document(view, layout),
    }
}

/// Standalone page around one rendered table.
pub fn html_document(view: &TableView, layout: &Layout) -> String {
    let table = render_table("toh_export", view, layout);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Table of Hardware</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        table
    )
}

/// Empty, `""` and `"NULL"` become JSON null.
fn json_cell(v: &CellValue) -> Value {
    match v {
        CellValue::Empty => Value::Null,
        CellValue::Text(s) if s.is_empty() || s == "NULL" => Value::Null,
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::List(items) if items.is_empty() => Value::Null,
        CellValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
    }
}

/// Device id for an entry: last `:` segment of its device page.
pub fn device_id(ds: &DataSource, row: usize) -> Option<String> {
    let page = ds.cell(row, "devicepage")?.joined();
    let id = page.rsplit(':').next().unwrap_or("").trim();
    (!id.is_empty()).then(|| s!(id))
}

/// Sorted-key, 4-space-indented JSON for one entry, plus its `id`.
pub fn device_json(ds: &DataSource, row: usize) -> Result<Option<(String, String)>, serde_json::Error> {
    let Some(id) = device_id(ds, row) else { return Ok(None) };
    let Some(entry) = ds.entries.get(row) else { return Ok(None) };

    let mut doc = Map::new();
    for (key, cell) in ds.columns.iter().zip(entry) {
        doc.insert(key.clone(), json_cell(cell));
    }
    doc.insert(s!("id"), Value::String(id.clone()));

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    Value::Object(doc).serialize(&mut ser)?;
    Ok(Some((id, String::from_utf8_lossy(&buf).into_owned())))
}

/// Markdown page with TOML front matter for one entry.
pub fn device_page(ds: &DataSource, row: usize, id: &str) -> String {
    let field = |key: &str| match ds.cell(row, key).map(json_cell) {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "),
        _ => s!(),
    };
    let title = format!("{} {} {}", field("brand"), field("model"), field("version"));
    let title = title.trim();
    format!(
        "+++\ntitle = \"{}\"\ndate = {}\n\n[extra]\ndevice_id = \"{}\"\n+++",
        toml_escape(title),
        DEVICE_PAGE_DATE,
        toml_escape(id)
    )
}

fn toml_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CellValue { CellValue::Text(s!(s)) }

    fn source() -> DataSource {
        DataSource::new(
            strings!["model", "brand", "version", "devicepage", "target"],
            strings!["Model", "Brand", "Version", "Device Page", "Target"],
            vec![
                vec![t("Archer C7"), t("TP-Link"), t("NULL"), t("toh:tp-link:archer_c7"), CellValue::List(strings!["ath79"])],
                vec![t("R7800"), t("Netgear"), t("v1"), t(""), CellValue::Empty],
            ],
        )
    }

    #[test]
    fn json_is_sorted_indented_and_nulled() {
        let (id, json) = device_json(&source(), 0).unwrap().unwrap();
        assert_eq!(id, "archer_c7");
        let expected = r#"{
    "brand": "TP-Link",
    "devicepage": "toh:tp-link:archer_c7",
    "id": "archer_c7",
    "model": "Archer C7",
    "target": [
        "ath79"
    ],
    "version": null
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn entries_without_page_are_skipped() {
        assert!(device_json(&source(), 1).unwrap().is_none());
    }

    #[test]
    fn markdown_front_matter() {
        let md = device_page(&source(), 0, "archer_c7");
        assert!(md.starts_with("+++\ntitle = \"TP-Link Archer C7\"\ndate = 2019-11-28\n"));
        assert!(md.ends_with("[extra]\ndevice_id = \"archer_c7\"\n+++"));
    }
}
