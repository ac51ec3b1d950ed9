// src/csv.rs
use std::io::{self, Write};

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Full delimited export string.
/// - `headers`: caption line, emitted only when `include_headers` is set
/// - `rows`: display text per row
/// - `sep`: field separator
pub fn to_export_string(
    headers: &[String],
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        let _ = write_row(&mut buf, headers, sep);
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_only_when_needed() {
        let rows = vec![strings!["TP-Link", "Archer \"C7\"", "ath79, ramips"]];
        let out = to_export_string(&strings!["Brand", "Model", "Target"], &rows, true, ',');
        assert_eq!(out, "Brand,Model,Target\nTP-Link,\"Archer \"\"C7\"\"\",\"ath79, ramips\"\n");
    }

    #[test]
    fn tsv_without_headers() {
        let rows = vec![strings!["a", "b,c"]];
        assert_eq!(to_export_string(&strings!["X", "Y"], &rows, false, '\t'), "a\tb,c\n");
    }
}
