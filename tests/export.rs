// tests/export.rs
use std::fs;
use std::path::PathBuf;

use toh_embed::config::options::{ExportFormat, ExportOptions};
use toh_embed::config::profile::LayeredProfile;
use toh_embed::export::export_string;
use toh_embed::file::{write_device_dump, write_export_single};
use toh_embed::render::{Layout, TableView};
use toh_embed::specs::toh_html;

const FIXTURE: &str = include_str!("fixtures/toh_min.html");

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("toh_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn supported_view() -> (TableView, Layout) {
    let ds = toh_html::parse_doc(FIXTURE);
    let profile = LayeredProfile::named("supported_devices").resolve();
    (TableView::build(&ds, &profile), Layout::from(&profile))
}

#[test]
fn delimited_export_uses_display_text() {
    let (view, layout) = supported_view();
    let mut opts = ExportOptions::default();
    opts.format = ExportFormat::Tsv;

    let tsv = export_string(&view, &layout, &opts);
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Brand\tModel\tVersion"));
    assert!(lines[1].starts_with("TP-Link\tArcher C7 AC1750\tv2\t23.05.3\tath79\tarcher_c7\tEdit"));

    opts.include_headers = false;
    assert_eq!(export_string(&view, &layout, &opts).lines().count(), 1);
}

#[test]
fn single_file_export_respects_typed_extension() {
    let dir = tmp_dir("single");
    let (view, layout) = supported_view();

    let mut opts = ExportOptions::default();
    opts.format = ExportFormat::Html;
    opts.set_path(dir.join("nested/devices.htm").to_str().unwrap());

    let path = write_export_single(&opts, &view, &layout).unwrap();
    assert_eq!(path, dir.join("nested/devices.htm"));
    let body = fs::read_to_string(&path).unwrap();
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains(r#"id="toh_export""#));
}

#[test]
fn device_dump_writes_json_and_markdown() {
    let dir = tmp_dir("dump");
    let ds = toh_html::parse_doc(FIXTURE);

    let written = write_device_dump(&ds, &dir, None).unwrap();
    assert_eq!(written.len(), 8);

    let json = fs::read_to_string(dir.join("devices/r7800.json")).unwrap();
    assert!(json.starts_with("{\n    \"brand\": \"Netgear\""));
    assert!(json.contains("\"id\": \"r7800\""));
    assert!(json.contains("\"version\": null"));
    assert!(json.contains("\"supportedcurrentrel\": \"EOL\""));

    let md = fs::read_to_string(dir.join("content/archer_c7.md")).unwrap();
    assert!(md.contains("title = \"TP-Link Archer C7 AC1750 v2\""));
    assert!(md.contains("device_id = \"archer_c7\""));
}
