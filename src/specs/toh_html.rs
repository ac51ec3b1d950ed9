// src/specs/toh_html.rs
//! Spec for the HTML device tables (minimal and full).
//!
//! Layout we rely on:
//! - one element with `id="devices"` (a `<table>`);
//! - a header row whose cells carry a `toh_<name>` class;
//! - body rows of `<td>` cells, where the edit/page columns hold a single
//!   link into the upstream wiki and other columns hold text or links.
//!
//! Everything else is tolerated: missing `<thead>`/`<tbody>`, unclosed
//! `<td>`/`<tr>`, stray whitespace and entities.

use url::Url;

use crate::config::consts::{DEVICE_TABLE_ID, HEADER_CLASS_PREFIX, WIKI_ORIGIN};
use crate::core::html::{
    Block, anchor_hrefs, class_tokens, element_block_ci, find_by_id, loose_children_ci, strip_tags,
};
use crate::data::{CellValue, DataSource};

use super::{column_key_alias, is_wiki_id_column};

/// Normalize a whole fetched page into a data source.
/// No device table → empty source.
pub fn parse_doc(doc: &str) -> DataSource {
    let Some(table) = find_by_id(doc, DEVICE_TABLE_ID) else {
        logw!("Normalize: no #{} element in document ({} bytes)", DEVICE_TABLE_ID, doc.len());
        return DataSource::default();
    };
    parse_table(table.inner(doc))
}

/// Normalize the inner markup of the device table.
pub fn parse_table(table: &str) -> DataSource {
    let (header_row, body_rows) = split_rows(table);

    let Some((hdr_src, hdr)) = header_row else {
        return DataSource::default();
    };

    let (columns, captions) = read_header(hdr.inner(hdr_src));

    let mut entries = Vec::with_capacity(body_rows.len());
    for (src, row) in body_rows {
        let cells = loose_children_ci(row.inner(src), &["td", "th"]);
        if cells.is_empty() {
            continue;
        }
        let row_src = row.inner(src);
        let values = cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let key = columns.get(i).map(String::as_str).unwrap_or("");
                cell_value(key, c.inner(row_src))
            })
            .collect();
        entries.push(values);
    }

    let ds = DataSource::new(columns, captions, entries);
    logd!("Normalize: {} columns, {} rows", ds.column_count(), ds.row_count());
    ds
}

type RowRef<'a> = (&'a str, Block);

/// Header row plus body rows, each paired with the text its offsets index into.
fn split_rows(table: &str) -> (Option<RowRef<'_>>, Vec<RowRef<'_>>) {
    if let Some(thead) = element_block_ci(table, "thead", 0) {
        let head_src = thead.inner(table);
        let header = loose_children_ci(head_src, &["tr"]).into_iter().next().map(|b| (head_src, b));

        let rest = &table[thead.end..];
        let body_src = match element_block_ci(rest, "tbody", 0) {
            Some(tb) => tb.inner(rest),
            None => rest,
        };
        let body = loose_children_ci(body_src, &["tr"]).into_iter().map(|b| (body_src, b)).collect();
        return (header, body);
    }

    let body_src = match element_block_ci(table, "tbody", 0) {
        Some(tb) => tb.inner(table),
        None => table,
    };
    // No <thead>: the first row holding <th> cells is the header.
    let rows = loose_children_ci(body_src, &["tr"]);
    let hdr_ix = rows.iter().position(|r| {
        crate::core::html::find_open_tag_ci(r.inner(body_src), "th", 0).is_some()
    });
    match hdr_ix {
        Some(ix) => {
            let header = Some((body_src, rows[ix]));
            let body = rows.into_iter().skip(ix + 1).map(|b| (body_src, b)).collect();
            (header, body)
        }
        None => (None, Vec::new()),
    }
}

fn read_header(row: &str) -> (Vec<String>, Vec<String>) {
    let cells = loose_children_ci(row, &["th", "td"]);
    let mut columns: Vec<String> = Vec::with_capacity(cells.len());
    let mut captions = Vec::with_capacity(cells.len());

    for (i, cell) in cells.iter().enumerate() {
        let named = class_tokens(cell.open_tag(row))
            .iter()
            .find_map(|t| t.strip_prefix(HEADER_CLASS_PREFIX).map(column_key_alias));

        let key = match named {
            Some(k) if !columns.contains(&k) => k,
            _ => format!("column_{i}"),
        };
        captions.push(strip_tags(cell.inner(row)));
        columns.push(key);
    }
    (columns, captions)
}

fn cell_value(key: &str, inner: &str) -> CellValue {
    let hrefs = anchor_hrefs(inner);

    if is_wiki_id_column(key) {
        return match hrefs.first() {
            Some(href) => CellValue::Text(wiki_id(href)),
            None => CellValue::Text(strip_tags(inner)),
        };
    }
    if !hrefs.is_empty() {
        return CellValue::List(hrefs);
    }
    CellValue::Text(strip_tags(inner))
}

/// Upstream wiki link → colon-delimited id.
///
/// `https://openwrt.org/toh/tp-link/archer_c7` → `toh:tp-link:archer_c7`
/// `/doku.php?id=toh:hwdata:tp-link:x&do=edit` → `toh:hwdata:tp-link:x`
pub fn wiki_id(href: &str) -> String {
    let href = href.trim();
    let parsed = Url::parse(href).or_else(|_| Url::parse(WIKI_ORIGIN).and_then(|base| base.join(href)));

    let Ok(url) = parsed else {
        return href.trim_matches('/').replace('/', ":");
    };

    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "id") {
        return id.trim_matches(':').to_string();
    }

    url.path_segments()
        .map(|segs| {
            segs.filter(|s| !s.is_empty() && *s != "doku.php")
                .collect::<Vec<_>>()
                .join(":")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
        <table id="devices" class="toh">
          <thead>
            <tr>
              <th class="toh_brand">Brand</th>
              <th class="toh_model">Model</th>
              <th class="toh_supportedcurrentrel">Supported Current Rel</th>
              <th class="toh_page">Device Page</th>
              <th class="toh_edit">Edit</th>
              <th>Mystery</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <td>TP-Link</td>
              <td>Archer C7 &amp; friends</td>
              <td><a href="https://openwrt.org/releases/23.05">23.05</a><a href="https://openwrt.org/releases/22.03">22.03</a></td>
              <td><a href="https://openwrt.org/toh/tp-link/archer_c7">archer_c7</a></td>
              <td><a href="https://openwrt.org/toh/hwdata/tp-link/tp-link_archer_c7_v2?do=edit">Edit</a></td>
              <td>?
            </tr>
            <tr><td>Netgear<td>R7800<td>EOL<td><td><td>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn header_keys_and_aliases() {
        let ds = parse_doc(SAMPLE);
        assert_eq!(
            ds.columns,
            strings!["brand", "model", "supportedcurrentrel", "devicepage", "deviceid", "column_5"]
        );
        assert_eq!(ds.captions[3], "Device Page");
        assert_eq!(ds.captions[4], "");
        assert!(ds.is_well_formed());
    }

    #[test]
    fn body_cells_by_column_semantics() {
        let ds = parse_doc(SAMPLE);
        assert_eq!(ds.row_count(), 2);
        let r = &ds.entries[0];
        assert_eq!(r[1], CellValue::Text(s!("Archer C7 & friends")));
        assert_eq!(
            r[2],
            CellValue::List(strings!["https://openwrt.org/releases/23.05", "https://openwrt.org/releases/22.03"])
        );
        assert_eq!(r[3], CellValue::Text(s!("toh:tp-link:archer_c7")));
        assert_eq!(r[4], CellValue::Text(s!("toh:hwdata:tp-link:tp-link_archer_c7_v2")));

        let r2 = &ds.entries[1];
        assert_eq!(r2[0], CellValue::Text(s!("Netgear")));
        assert_eq!(r2[2], CellValue::Text(s!("EOL")));
        assert_eq!(r2[3], CellValue::Text(s!("")));
    }

    #[test]
    fn table_without_thead_uses_first_th_row() {
        let t = r#"<tr><th class="toh_brand">Brand</th><th class="toh_brand">Again</th></tr>
                   <tr><td>A</td><td>B</td></tr>"#;
        let ds = parse_table(t);
        assert_eq!(ds.columns, strings!["brand", "column_1"]);
        assert_eq!(ds.entries, vec![vec![CellValue::Text(s!("A")), CellValue::Text(s!("B"))]]);
    }

    #[test]
    fn missing_table_is_empty() {
        let ds = parse_doc("<html><body><p>nothing</p></body></html>");
        assert!(ds.columns.is_empty());
        assert!(ds.is_empty());
    }

    #[test]
    fn wiki_id_variants() {
        assert_eq!(wiki_id("https://openwrt.org/toh/tp-link/archer_c7"), "toh:tp-link:archer_c7");
        assert_eq!(wiki_id("/toh/netgear/r7800"), "toh:netgear:r7800");
        assert_eq!(wiki_id("https://openwrt.org/doku.php?id=toh:hwdata:a:b&do=edit"), "toh:hwdata:a:b");
    }
}
