// src/file.rs

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::{CONTENT_SUBDIR, DEVICES_SUBDIR};
use crate::config::options::ExportOptions;
use crate::core::sanitize::sanitize_file_stem;
use crate::data::DataSource;
use crate::export::{device_json, device_page, export_string};
use crate::progress::Progress;
use crate::render::{Layout, TableView};

/// Write a single table export based on ExportOptions (path, format, headers policy).
/// Returns the final path written to.
pub fn write_export_single(
    export: &ExportOptions,
    view: &TableView,
    layout: &Layout,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    fs::write(&path, export_string(view, layout, export))?;
    logf!("Export: {} rows → {}", view.row_count(), path.display());
    Ok(path)
}

/// Per-device dump: `<out>/devices/<id>.json` and `<out>/content/<id>.md`
/// for every entry with a device page. Returns every path written.
pub fn write_device_dump(
    ds: &DataSource,
    out_dir: &Path,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let json_dir = out_dir.join(DEVICES_SUBDIR);
    let page_dir = out_dir.join(CONTENT_SUBDIR);
    ensure_directory(&json_dir)?;
    ensure_directory(&page_dir)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(ds.row_count());
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(ds.row_count() * 2);
    let mut skipped = 0usize;

    for row in 0..ds.row_count() {
        let Some((id, json)) = device_json(ds, row)? else {
            skipped += 1;
            logw!("Export: entry {} has no device page, skipped", row);
            continue;
        };

        let stem = sanitize_file_stem(&id);
        let stem = if stem.is_empty() { format!("device_{row}") } else { stem };
        let json_path = resolve_unique_filename(&json_dir, &stem, &mut seen, "json");
        let page_path = json_path
            .file_stem()
            .map(|s| page_dir.join(format!("{}.md", s.to_string_lossy())))
            .unwrap_or_else(|| page_dir.join(format!("{stem}.md")));

        fs::write(&json_path, json)?;
        fs::write(&page_path, device_page(ds, row, &id))?;
        written.push(json_path);
        written.push(page_path);

        if let Some(p) = progress.as_deref_mut() {
            p.item_done(row);
        }
    }

    let msg = format!(
        "Wrote {} devices to {} ({} skipped)",
        written.len() / 2,
        out_dir.display(),
        skipped
    );
    logf!("Export: {}", msg);
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
        p.log(&msg);
    }
    Ok(written)
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_unique_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,                         // "json" | "csv" | ...
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}
