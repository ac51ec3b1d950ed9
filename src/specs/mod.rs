// src/specs/mod.rs
//! # Source "specs"
//!
//! Each spec knows how to read one upstream ToH document and reshape it into
//! a `data::DataSource`.
//!
//! ## What lives here
//! - **Pure parsing** of fetched documents: the HTML device tables
//!   (`toh_html`, used for both the minimal and the full table) and the JSON
//!   document (`toh_json`).
//! - **Column key derivation** from the `toh_<name>` header classes, with the
//!   `edit` → `deviceid` and `page` → `devicepage` aliases.
//! - **Link reshaping** of device edit/page links into colon-delimited wiki ids.
//!
//! ## What does **not** live here
//! - Networking and memoization (`sources`).
//! - Formatting, filtering or rendering (`format`, `filter`, `render`).
//!
//! ## Conventions & invariants
//! - Specs never fail on bad markup: missing pieces become empty cells.
//! - Output is shape-checked through `DataSource::new`.
//! - Parsing is a pure function of the input text.

pub mod toh_html;
pub mod toh_json;

use crate::config::profile::SourceKind;
use crate::data::DataSource;

/// Column key for a header class name, with the upstream aliases applied.
pub fn column_key_alias(name: &str) -> String {
    match name {
        "edit" => s!("deviceid"),
        "page" => s!("devicepage"),
        other => s!(other),
    }
}

/// Whether a column holds a device wiki id rather than free values.
pub fn is_wiki_id_column(key: &str) -> bool {
    key == "deviceid" || key == "devicepage"
}

/// Parse a fetched document according to its source kind.
pub fn parse(kind: SourceKind, text: &str) -> Result<DataSource, Box<dyn std::error::Error>> {
    match kind {
        SourceKind::Min | SourceKind::Full => Ok(toh_html::parse_doc(text)),
        SourceKind::Json => Ok(toh_json::parse_doc(text)?),
    }
}
