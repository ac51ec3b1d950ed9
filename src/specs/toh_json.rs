// src/specs/toh_json.rs
//! Spec for the JSON device document.
//!
//! Shape: `{ "columns": [...], "captions": [...], "entries": [[...], ...] }`.
//! The document is already keyed; we only apply the same key aliases and
//! wiki-id reshaping as the HTML spec so both sources look alike downstream.

use serde::Deserialize;

use crate::data::{CellValue, DataSource};

use super::toh_html::wiki_id;
use super::{column_key_alias, is_wiki_id_column};

#[derive(Deserialize)]
struct RawDoc {
    columns: Vec<String>,
    #[serde(default)]
    captions: Vec<String>,
    #[serde(default)]
    entries: Vec<Vec<CellValue>>,
}

pub fn parse_doc(text: &str) -> Result<DataSource, serde_json::Error> {
    let raw: RawDoc = serde_json::from_str(text)?;

    let columns: Vec<String> = raw.columns.iter().map(|c| column_key_alias(c)).collect();
    let id_cols: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| is_wiki_id_column(c))
        .map(|(i, _)| i)
        .collect();

    let mut entries = raw.entries;
    for row in entries.iter_mut() {
        for &ci in &id_cols {
            if let Some(cell) = row.get_mut(ci) {
                *cell = reshape_id(std::mem::take(cell));
            }
        }
    }

    let ds = DataSource::new(columns, raw.captions, entries);
    logd!("Normalize(json): {} columns, {} rows", ds.column_count(), ds.row_count());
    Ok(ds)
}

/// Link-shaped ids (`https://…/toh/a/b`, `/toh/a/b`) become `toh:a:b`;
/// colon ids pass through. A list keeps its first element.
fn reshape_id(cell: CellValue) -> CellValue {
    let text = match cell {
        CellValue::Empty => return CellValue::Empty,
        CellValue::Text(s) => s,
        CellValue::List(v) => match v.into_iter().next() {
            Some(s) => s,
            None => return CellValue::Empty,
        },
    };
    if text.contains('/') {
        CellValue::Text(wiki_id(&text))
    } else {
        CellValue::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shaped_document() {
        let doc = r#"{
            "columns": ["brand", "model", "page", "edit"],
            "captions": ["Brand", "Model", "Device Page", "Edit"],
            "entries": [
                ["TP-Link", "AC1750", "toh:tp-link:archer_c7", "https://openwrt.org/toh/hwdata/tp-link/archer_c7"],
                ["Netgear", null]
            ]
        }"#;
        let ds = parse_doc(doc).unwrap();
        assert_eq!(ds.columns, strings!["brand", "model", "devicepage", "deviceid"]);
        assert_eq!(ds.captions[3], "");
        assert_eq!(ds.entries[0][3], CellValue::Text(s!("toh:hwdata:tp-link:archer_c7")));
        assert_eq!(ds.entries[1], vec![
            CellValue::Text(s!("Netgear")),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
        ]);
    }

    #[test]
    fn captions_default_to_keys() {
        let ds = parse_doc(r#"{"columns":["brand"],"entries":[["x"]]}"#).unwrap();
        assert_eq!(ds.captions, strings!["brand"]);
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(parse_doc("{not json").is_err());
    }
}
