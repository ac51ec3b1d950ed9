// src/data.rs
//
// The ToH data model: columns, captions and entries of one data source.
//
// - CellValue: one cell. `List` when the source cell held hyperlinks.
// - DataSource: keys + captions + rows, shape-checked on construction so
//               every row has exactly one cell per column.
//
// Every source (minimal HTML, full HTML, JSON) ends up as a DataSource;
// rendering, export and the viewer only ever read this type.

use serde::de::{Deserialize, Deserializer};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    List(Vec<String>),
}

impl CellValue {
    /// Lenient mapping from JSON: null → Empty, scalars → Text, arrays → List.
    pub fn from_json(v: Value) -> Self {
        match v {
            Value::Null => CellValue::Empty,
            Value::String(s) => CellValue::Text(s),
            Value::Array(items) => CellValue::List(
                items.into_iter().filter_map(|it| match it {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                }).collect(),
            ),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// Values a predicate sees: each list element, or the text ("" for Empty).
    pub fn parts(&self) -> Vec<&str> {
        match self {
            CellValue::Empty => vec![""],
            CellValue::Text(s) => vec![s.as_str()],
            CellValue::List(v) if v.is_empty() => vec![""],
            CellValue::List(v) => v.iter().map(|s| s.as_str()).collect(),
        }
    }

    /// Plain text for sorting/export: list elements joined with ", ".
    pub fn joined(&self) -> String {
        match self {
            CellValue::Empty => s!(),
            CellValue::Text(s) => s.clone(),
            CellValue::List(v) => v.join(", "),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::List(v) => v.iter().all(|s| s.trim().is_empty()),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(CellValue::from_json(Value::deserialize(d)?))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DataSource {
    pub columns: Vec<String>,
    pub captions: Vec<String>,
    pub entries: Vec<Vec<CellValue>>,
}

impl DataSource {
    /// Build and shape-check: captions follow columns (missing → key,
    /// `deviceid` → ""), short rows padded with Empty, long rows truncated.
    pub fn new(columns: Vec<String>, mut captions: Vec<String>, mut entries: Vec<Vec<CellValue>>) -> Self {
        let ncols = columns.len();

        captions.truncate(ncols);
        for key in columns.iter().skip(captions.len()) {
            captions.push(key.clone());
        }
        for (key, cap) in columns.iter().zip(captions.iter_mut()) {
            if key == "deviceid" {
                cap.clear();
            }
        }

        for row in entries.iter_mut() {
            row.resize(ncols, CellValue::Empty);
        }

        Self { columns, captions, entries }
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == key)
    }

    pub fn column_count(&self) -> usize { self.columns.len() }
    pub fn row_count(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// The shape invariant every constructor guarantees.
    pub fn is_well_formed(&self) -> bool {
        self.columns.len() == self.captions.len()
            && self.entries.iter().all(|r| r.len() == self.columns.len())
    }

    pub fn cell(&self, row: usize, key: &str) -> Option<&CellValue> {
        let ci = self.column_index(key)?;
        self.entries.get(row)?.get(ci)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pads_truncates_and_blanks_deviceid_caption() {
        let ds = DataSource::new(
            strings!["brand", "deviceid", "model"],
            strings!["Brand", "Edit"],
            vec![
                vec![CellValue::Text(s!("TP-Link"))],
                vec![CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Text(s!("x"))],
            ],
        );
        assert!(ds.is_well_formed());
        assert_eq!(ds.captions, strings!["Brand", "", "model"]);
        assert_eq!(ds.entries[0].len(), 3);
        assert_eq!(ds.entries[1].len(), 3);
    }

    #[test]
    fn json_cells_are_lenient() {
        let v: Vec<CellValue> = serde_json::from_str(r#"[null,"a",3,true,["x",null,1]]"#).unwrap();
        assert_eq!(v, vec![
            CellValue::Empty,
            CellValue::Text(s!("a")),
            CellValue::Text(s!("3")),
            CellValue::Text(s!("true")),
            CellValue::List(strings!["x", "1"]),
        ]);
    }
}
