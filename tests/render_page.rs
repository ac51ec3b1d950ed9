// tests/render_page.rs
use std::error::Error;

use toh_embed::assets::AssetCache;
use toh_embed::config::consts::{DATATABLES_CSS_URL, LOADING_TEXT};
use toh_embed::config::options::{AssetMode, RenderOptions};
use toh_embed::config::profile::SourceKind;
use toh_embed::embed::render_page;
use toh_embed::sources::{Fetch, SourceCache};
use toh_embed::wiring::SCRIPT_ID;

const FIXTURE: &str = include_str!("fixtures/toh_min.html");

/// Serves the minimal table; the full table is unreachable.
struct Offline;

impl Fetch for Offline {
    fn fetch(&self, kind: SourceKind) -> Result<String, Box<dyn Error>> {
        match kind {
            SourceKind::Min => Ok(FIXTURE.to_string()),
            _ => Err("connection refused".into()),
        }
    }
}

fn no_assets(_: &str) -> Result<String, Box<dyn Error>> {
    Err("asset host down".into())
}

fn asset_body(url: &str) -> Result<String, Box<dyn Error>> {
    Ok(format!("/* body of {url} */"))
}

const PAGE: &str = r#"<html><head><title>Hardware</title></head><body>
<h1>Supported</h1>
<div class="wrap_toh wrap_toh_profile_supported_devices">Loading data...</div>
<!-- ToH: {"hiddenColumns":["version"],"filterColumns":{"target":"^mvebu$"}} -->
<div class="wrap_toh_full">Loading data...</div>
</body></html>"#;

#[test]
fn renders_each_placeholder_and_injects_assets_once() {
    let sources = SourceCache::new(Box::new(Offline));
    let assets = AssetCache::new(no_assets);
    let out = render_page(PAGE, &RenderOptions::default(), &sources, &assets).unwrap();

    assert!(out.contains(r#"id="toh_min_0""#));
    assert!(out.contains(r#"id="toh_min_1""#));
    assert!(!out.contains("toh_full_2"));

    // the full-table placeholder keeps its loading text
    assert!(out.contains(&format!(r#"<div class="wrap_toh_full">{}</div>"#, LOADING_TEXT)));
    assert!(!out.contains("<!-- ToH:"));

    let head_end = out.find("</head>").unwrap();
    let css = out.find(DATATABLES_CSS_URL).unwrap();
    assert!(css < head_end);
    assert_eq!(out.matches(DATATABLES_CSS_URL).count(), 1);
    assert_eq!(out.matches(SCRIPT_ID).count(), 1);
    assert!(out.find(SCRIPT_ID).unwrap() > out.find("toh_min_1").unwrap());
}

#[test]
fn comment_settings_drive_the_second_table() {
    let sources = SourceCache::new(Box::new(Offline));
    let assets = AssetCache::new(no_assets);
    let out = render_page(PAGE, &RenderOptions::default(), &sources, &assets).unwrap();

    let second = &out[out.find(r#"id="toh_min_1""#).unwrap()..];
    let second = &second[..second.find("</table>").unwrap()];
    assert!(second.contains("WRT3200ACM"));
    assert!(!second.contains("R7800"));
    assert!(!second.contains("toh_version"));
}

#[test]
fn query_filter_applies_to_every_placeholder() {
    let sources = SourceCache::new(Box::new(Offline));
    let assets = AssetCache::new(no_assets);
    let opts = RenderOptions {
        page_url: Some("/toh/start?toh.filter.brand=netgear".into()),
        ..RenderOptions::default()
    };
    let out = render_page(PAGE, &opts, &sources, &assets).unwrap();

    // supported_devices excludes Netgear (EOL); the comment table wants mvebu
    assert!(!out.contains("R7800"));
    assert!(!out.contains("WRT3200ACM"));
    assert!(!out.contains("Archer C7"));
}

#[test]
fn inline_asset_failure_aborts_the_render() {
    let sources = SourceCache::new(Box::new(Offline));
    let assets = AssetCache::new(no_assets);
    let opts = RenderOptions { assets: AssetMode::Inline, ..RenderOptions::default() };
    let err = render_page(PAGE, &opts, &sources, &assets).unwrap_err();
    assert!(err.to_string().contains("asset host down"));
    assert!(!sources.is_loaded(SourceKind::Min));
}

#[test]
fn inline_assets_embed_bodies() {
    let sources = SourceCache::new(Box::new(Offline));
    let assets = AssetCache::new(asset_body);
    let opts = RenderOptions { assets: AssetMode::Inline, ..RenderOptions::default() };
    let out = render_page(PAGE, &opts, &sources, &assets).unwrap();
    assert!(out.contains(&format!("/* body of {} */", DATATABLES_CSS_URL)));
    assert!(!out.contains("<link rel=\"stylesheet\""));
}

#[test]
fn pages_without_placeholders_are_untouched() {
    let sources = SourceCache::new(Box::new(Offline));
    let assets = AssetCache::new(no_assets);
    let page = "<html><body><p>nothing here <!-- just a comment --></p></body></html>";
    let out = render_page(page, &RenderOptions::default(), &sources, &assets).unwrap();
    assert_eq!(out, page);
}
