// tests/embed_profile.rs
use toh_embed::config::profile::{LayeredProfile, ProfileLayer, SourceKind};
use toh_embed::data::{CellValue, DataSource};
use toh_embed::embed::{self, find_placeholders, rewrite_comment_placeholders};
use toh_embed::render::TableView;
use toh_embed::specs::toh_html;

const FIXTURE: &str = include_str!("fixtures/toh_min.html");

fn keys_for(ds: &DataSource, settings: &str) -> Vec<String> {
    let mut lp = LayeredProfile::named("default");
    lp.inline = embed::inline_layer(settings);
    let profile = lp.resolve();
    profile.column_order(&ds.columns).into_iter().map(|i| ds.columns[i].clone()).collect()
}

#[test]
fn shown_columns_keep_order_and_append_deviceid() {
    let ds = toh_html::parse_doc(FIXTURE);
    assert_eq!(
        keys_for(&ds, r#"{"shownColumns":["target","devicepage"]}"#),
        vec!["target", "devicepage", "deviceid"]
    );
}

#[test]
fn hidden_wins_over_shown() {
    let ds = toh_html::parse_doc(FIXTURE);
    let keys = keys_for(&ds, r#"{"shownColumns":["target","devicepage"],"hiddenColumns":["target"]}"#);
    assert_eq!(keys, vec!["devicepage", "deviceid"]);
}

#[test]
fn default_order_moves_deviceid_last() {
    let ds = DataSource::new(
        vec!["deviceid".into(), "brand".into(), "model".into()],
        vec!["".into(), "Brand".into(), "Model".into()],
        Vec::new(),
    );
    assert_eq!(keys_for(&ds, ""), vec!["brand", "model", "deviceid"]);
}

#[test]
fn hidden_column_is_absent_from_header_and_body() {
    let t = |s: &str| CellValue::Text(s.into());
    let ds = DataSource::new(
        vec!["brand".into(), "model".into(), "full_support_col".into()],
        vec!["Brand".into(), "Model".into(), "Full support".into()],
        vec![vec![t("TP-Link"), t("AC1750"), t("full")]],
    );
    let mut lp = LayeredProfile::named("default");
    lp.inline = embed::inline_layer(r#"{"hiddenColumns":["full_support_col"]}"#);
    let out = toh_embed::render::render(&ds, &lp.resolve(), "t");

    assert_eq!(out.keys, vec!["brand", "model"]);
    assert!(!out.html.contains("toh_full_support_col"));
    assert!(!out.html.contains("Full support"));
    assert!(!out.html.contains(">full<"));
    assert!(out.html.contains(">AC1750<"));
}

#[test]
fn bad_inline_json_falls_back_to_builtin() {
    let page = r#"<div class="wrap_toh" data-settings="{not json">x</div>"#;
    let ph = &find_placeholders(page)[0];
    let base = ph.base_layers();
    assert!(base.inline.is_none());
    assert_eq!(base.resolve(), LayeredProfile::named("default").resolve());
}

#[test]
fn layers_apply_in_precedence_order() {
    let ds = toh_html::parse_doc(FIXTURE);
    let page = rewrite_comment_placeholders(
        r#"<p><!-- ToH: {"pageLength": 10, "filterColumns": {"target": "^ath79$"}} --></p>"#,
    );
    let ph = &find_placeholders(&page)[0];

    let inline_only = ph.profile(&ds, None);
    assert_eq!(inline_only.page_length, 10);
    let view = TableView::build(&ds, &inline_only);
    assert_eq!(view.source_rows, vec![0]);

    // query beats inline
    let url = "https://openwrt.org/toh/views/toh_available?toh.filter.target=mvebu";
    let with_query = ph.profile(&ds, Some(url));
    assert_eq!(with_query.page_length, 10);
    let view = TableView::build(&ds, &with_query);
    assert_eq!(view.source_rows, vec![2]);
}

#[test]
fn page_length_all_rows_keeps_the_rest_of_the_settings() {
    let ds = toh_html::parse_doc(FIXTURE);
    let mut lp = LayeredProfile::named("default");
    lp.inline = embed::inline_layer(
        r#"{"pageLength":-1,"hiddenColumns":["model"],"filterColumns":{"brand":"^TP"}}"#,
    );
    assert!(lp.inline.is_some());
    let profile = lp.resolve();
    assert_eq!(profile.page_length, -1);

    let out = toh_embed::render::render(&ds, &profile, "t");
    assert!(!out.keys.iter().any(|k| k == "model"));
    assert_eq!(out.row_count, 1);
    assert!(out.html.contains(r#"data-page-length="-1""#));
}

#[test]
fn class_tokens_override_inline_settings() {
    let ds = toh_html::parse_doc(FIXTURE);
    let page = r#"<div class="wrap_toh wrap_toh_profile_full wrap_toh_hide_target wrap_toh_brand_Asus"
        data-settings='{"source":"min","shownColumns":["brand","target","model"]}'>Loading data...</div>"#;
    let ph = &find_placeholders(page)[0];
    let profile = ph.profile(&ds, None);

    // inline source beats the built-in profile
    assert_eq!(profile.source, SourceKind::Min);
    let view = TableView::build(&ds, &profile);
    assert_eq!(view.keys, vec!["brand", "model", "deviceid"]);
    assert_eq!(view.source_rows, vec![3]);
}

#[test]
fn placeholders_keep_independent_profiles() {
    let ds = toh_html::parse_doc(FIXTURE);
    let page = r#"
        <div class="wrap_toh wrap_toh_profile_supported_devices">a</div>
        <div class="wrap_toh">b</div>"#;
    let phs = find_placeholders(page);
    assert_eq!(phs.len(), 2);

    let first = phs[0].profile(&ds, None);
    let second = phs[1].profile(&ds, None);
    assert!(!first.paging);
    assert!(second.paging);
    assert!(second.filter_columns.is_empty());
    assert_eq!(TableView::build(&ds, &first).source_rows, vec![0]);
    assert_eq!(TableView::build(&ds, &second).row_count(), 4);
}

#[test]
fn layer_json_uses_camel_case_names() {
    let layer = ProfileLayer::from_json(
        r#"{"source":"json","dom":"frt","paging":false,"pageLength":25,"rotate":true,
            "filterColumns":{"brand":["a","!b"]}}"#,
    )
    .unwrap();
    assert_eq!(layer.source, Some(SourceKind::Json));
    assert_eq!(layer.page_length, Some(25));
    assert_eq!(layer.rotate, Some(true));
    assert_eq!(layer.filter_columns["brand"].patterns(), vec!["a", "!b"]);
}
