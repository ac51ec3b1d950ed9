// src/embed.rs
//! Page embedding.
//!
//! Finds `wrap_toh` placeholders in a page, resolves one profile per
//! placeholder, renders each table and splices the results back in.
//!
//! Pipeline for `render_page`:
//! 1. `<!-- ToH: {...} -->` comments become `<div class="wrap_toh">` containers;
//! 2. placeholders are collected (class token `wrap_toh` or `wrap_toh_full`);
//! 3. widget assets are prepared (an Inline fetch failure aborts here);
//! 4. each placeholder renders on its own scoped thread, waiting on its own
//!    source slot; a failed source leaves the loading text in place;
//! 5. assets go before `</head>`, the wiring block before `</body>`.

use std::error::Error;
use std::thread;

use url::Url;

use crate::assets::{AssetCache, PageAssets};
use crate::config::consts::*;
use crate::config::options::RenderOptions;
use crate::config::profile::{FilterSpec, LayeredProfile, Profile, ProfileLayer};
use crate::core::html::{
    Block, attr, class_tokens, comments, element_at, escape_attr, find_close_tag_ci, tag_end,
};
use crate::data::DataSource;
use crate::render::{RenderedTable, render};
use crate::sources::{FetchError, SourceCache};
use crate::wiring;

/// One embed location in a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub block: Block,
    pub tag: String,
    pub classes: Vec<String>,
    /// Raw inline settings JSON (`data-settings`).
    pub settings: Option<String>,
}

fn is_marker(classes: &[String]) -> bool {
    classes.iter().any(|c| c == EMBED_CLASS || c == FULL_EMBED_CLASS)
}

fn tag_name(open_tag: &str) -> String {
    open_tag[1..]
        .split(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Replace every `<!-- ToH: {...} -->` comment with an equivalent container.
pub fn rewrite_comment_placeholders(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut last = 0usize;

    for (start, end) in comments(doc) {
        let body = &doc[start + 4..end];
        let body = body.strip_suffix("-->").unwrap_or(body).trim();
        let Some(json) = body.strip_prefix(COMMENT_MARKER) else { continue };

        out.push_str(&doc[last..start]);
        out.push_str(&format!(
            r#"<div class="{}" {}="{}">{}</div>"#,
            EMBED_CLASS,
            SETTINGS_ATTR,
            escape_attr(json.trim()),
            LOADING_TEXT
        ));
        last = end;
    }
    out.push_str(&doc[last..]);
    out
}

/// Element placeholders in document order. Nested markers and markers inside
/// comments are skipped.
pub fn find_placeholders(doc: &str) -> Vec<Placeholder> {
    let b = doc.as_bytes();
    let comment_spans = comments(doc);
    let mut out = Vec::new();
    let mut i = 0usize;

    while let Some(rel) = doc[i..].find('<') {
        let lt = i + rel;
        if let Some(&(_, ce)) = comment_spans.iter().find(|(cs, _)| *cs == lt) {
            i = ce;
            continue;
        }
        let Some(end) = tag_end(doc, lt) else { break };
        i = end;

        if !b.get(lt + 1).is_some_and(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        let open = &doc[lt..end];
        let classes = class_tokens(open);
        if !is_marker(&classes) {
            continue;
        }
        let tag = tag_name(open);
        let Some(block) = element_at(doc, &tag, lt) else { continue };
        out.push(Placeholder { block, tag, classes, settings: attr(open, SETTINGS_ATTR) });
        i = block.end.max(end);
    }
    out
}

impl Placeholder {
    /// Built-in profile name from the class list.
    pub fn builtin_name(&self) -> &str {
        if self.classes.iter().any(|c| c == FULL_EMBED_CLASS) {
            return "full";
        }
        self.classes
            .iter()
            .find_map(|c| c.strip_prefix(PROFILE_CLASS_PREFIX))
            .unwrap_or("default")
    }

    /// Builtin and inline layers; enough to know which source to load.
    pub fn base_layers(&self) -> LayeredProfile {
        let mut lp = LayeredProfile::named(self.builtin_name());
        lp.inline = self.settings.as_deref().and_then(inline_layer);
        lp
    }

    /// All four layers resolved against the loaded source.
    pub fn profile(&self, ds: &DataSource, page_url: Option<&str>) -> Profile {
        let mut lp = self.base_layers();
        lp.classes = class_layer(&self.classes, ds);
        lp.query = query_layer(page_url);
        lp.resolve()
    }
}

/// Parse inline settings; malformed JSON is logged and ignored.
pub fn inline_layer(text: &str) -> Option<ProfileLayer> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match ProfileLayer::from_json(text) {
        Ok(layer) => Some(layer),
        Err(e) => {
            loge!("Embed: bad inline settings ({}): {}", e, text);
            None
        }
    }
}

/// `Brand Name` → `brand_name`, the way header captions name columns in
/// class tokens.
fn caption_slug(caption: &str) -> String {
    let mut out = String::with_capacity(caption.len());
    let mut gap = false;
    for c in caption.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-') {
            out.push(c);
            gap = false;
        } else if !gap {
            out.push('_');
            gap = true;
        }
    }
    out
}

/// Class-token layer. Column names in tokens are matched against the
/// source's keys and caption slugs, longest first.
pub fn class_layer(classes: &[String], ds: &DataSource) -> ProfileLayer {
    let mut names: Vec<(String, usize)> = Vec::new();
    for (ci, key) in ds.columns.iter().enumerate() {
        names.push((key.clone(), ci));
        let slug = caption_slug(&ds.captions[ci]);
        if !slug.is_empty() && slug != *key {
            names.push((slug, ci));
        }
    }
    names.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut layer = ProfileLayer::default();
    let mut filters: Vec<(String, Vec<String>)> = Vec::new();
    let mut add_filter = |key: &str, value: String| match filters.iter_mut().find(|(k, _)| k == key) {
        Some((_, vals)) => vals.push(value),
        None => filters.push((s!(key), vec![value])),
    };

    for token in classes {
        if let Some(rest) = token.strip_prefix(BRAND_CLASS_PREFIX) {
            add_filter("brand", format!("^{rest}$"));
        } else if let Some(rest) = token.strip_prefix(FILTER_CLASS_PREFIX) {
            let hit = names.iter().find_map(|(n, ci)| {
                rest.strip_prefix(n.as_str())
                    .and_then(|r| r.strip_prefix('_'))
                    .map(|v| (*ci, v))
            });
            match hit {
                Some((ci, v)) => add_filter(&ds.columns[ci], s!(v)),
                None => logd!("Embed: filter class {:?} names no column", token),
            }
        } else if let Some(rest) = token.strip_prefix(HIDE_CLASS_PREFIX) {
            if let Some((_, ci)) = names.iter().find(|(n, _)| n == rest) {
                push_key(&mut layer.hidden_columns, &ds.columns[*ci]);
            }
        } else if let Some(rest) = token.strip_prefix(SHOW_CLASS_PREFIX) {
            if let Some((_, ci)) = names.iter().find(|(n, _)| n == rest) {
                push_key(&mut layer.shown_columns, &ds.columns[*ci]);
            }
        }
    }

    for (key, vals) in filters {
        layer.filter_columns.insert(key, FilterSpec::One(vals.join("|")));
    }
    layer
}

fn push_key(into: &mut Vec<String>, key: &str) {
    if !into.iter().any(|k| k == key) {
        into.push(s!(key));
    }
}

/// `?toh.filter.<col>=<pattern>` parameters of the page URL.
pub fn query_layer(page_url: Option<&str>) -> ProfileLayer {
    let mut layer = ProfileLayer::default();
    let Some(raw) = page_url else { return layer };

    let parsed = Url::parse(raw).or_else(|_| Url::parse(WIKI_ORIGIN).and_then(|base| base.join(raw)));
    let url = match parsed {
        Ok(u) => u,
        Err(e) => {
            logw!("Embed: page url {:?} not parsable ({})", raw, e);
            return layer;
        }
    };

    for (k, v) in url.query_pairs() {
        if let Some(col) = k.strip_prefix(QUERY_FILTER_PREFIX) {
            if !col.is_empty() {
                layer.filter_columns.insert(s!(col), FilterSpec::One(v.into_owned()));
            }
        }
    }
    layer
}

/// Render one placeholder's table. Table ids are `toh_<source>_<index>`.
pub fn render_placeholder(
    ph: &Placeholder,
    index: usize,
    sources: &SourceCache,
    page_url: Option<&str>,
) -> Result<RenderedTable, FetchError> {
    let source = ph.base_layers().resolve().source;
    let ds = sources.load(source)?;
    let profile = ph.profile(&ds, page_url);
    let id = format!("toh_{}_{}", source.as_str(), index);
    Ok(render(&ds, &profile, &id))
}

/// Render every placeholder in `doc`. Pages without placeholders come back
/// unchanged.
pub fn render_page(
    doc: &str,
    opts: &RenderOptions,
    sources: &SourceCache,
    assets: &AssetCache,
) -> Result<String, Box<dyn Error>> {
    let doc = rewrite_comment_placeholders(doc);
    let placeholders = find_placeholders(&doc);
    if placeholders.is_empty() {
        logf!("Embed: no placeholders in page");
        return Ok(doc);
    }

    let head = PageAssets::new(opts.assets, assets).head_markup()?.unwrap_or_default();
    let page_url = opts.page_url.as_deref();

    let rendered: Vec<Option<RenderedTable>> = thread::scope(|scope| {
        let handles: Vec<_> = placeholders
            .iter()
            .enumerate()
            .map(|(i, ph)| scope.spawn(move || render_placeholder(ph, i, sources, page_url)))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(i, h)| match h.join() {
                Ok(Ok(table)) => Some(table),
                Ok(Err(e)) => {
                    loge!("Embed: placeholder {} left loading: {}", i, e);
                    None
                }
                Err(_) => {
                    loge!("Embed: placeholder {} render panicked", i);
                    None
                }
            })
            .collect()
    });

    let done = rendered.iter().filter(|r| r.is_some()).count();
    logf!("Embed: {}/{} placeholders rendered", done, placeholders.len());

    let mut page = doc;
    for (ph, table) in placeholders.iter().zip(rendered.iter()).rev() {
        let content = table.as_ref().map(|t| t.html.as_str()).unwrap_or(LOADING_TEXT);
        splice(&mut page, ph, content);
    }

    inject(&mut page, "head", &head, true);
    if !page.contains(wiring::SCRIPT_ID) {
        inject(&mut page, "body", &wiring::page_markup(), false);
    }
    Ok(page)
}

fn splice(page: &mut String, ph: &Placeholder, content: &str) {
    let b = ph.block;
    if b.open_end == b.end && b.close_start == b.end {
        // self-closing: rebuild as a container
        let open = page[b.start..b.open_end].trim_end_matches('>').trim_end_matches('/').trim_end();
        let rebuilt = format!("{}>{}</{}>", open, content, ph.tag);
        page.replace_range(b.start..b.end, &rebuilt);
    } else {
        page.replace_range(b.open_end..b.close_start, content);
    }
}

/// Insert before `</name>`; without one, at the start (`at_start`) or end.
fn inject(page: &mut String, name: &str, markup: &str, at_start: bool) {
    if markup.is_empty() {
        return;
    }
    match find_close_tag_ci(page, name, 0) {
        Some(pos) => page.insert_str(pos, markup),
        None if at_start => page.insert_str(0, markup),
        None => page.push_str(markup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;

    fn ds() -> DataSource {
        DataSource::new(
            strings!["brand", "model", "supportedcurrentrel", "column_3", "deviceid"],
            strings!["Brand", "Model", "Supported Current Rel", "Wireless b/g/n", ""],
            vec![vec![CellValue::Text(s!("x")); 5]],
        )
    }

    #[test]
    fn comment_becomes_container() {
        let page = r#"<p>a</p><!-- ToH: {"pageLength":10} --><!-- other -->"#;
        let out = rewrite_comment_placeholders(page);
        assert_eq!(
            out,
            r#"<p>a</p><div class="wrap_toh" data-settings="{&quot;pageLength&quot;:10}">Loading data...</div><!-- other -->"#
        );
        let phs = find_placeholders(&out);
        assert_eq!(phs.len(), 1);
        assert_eq!(phs[0].settings.as_deref(), Some(r#"{"pageLength":10}"#));
    }

    #[test]
    fn finds_marker_elements_only() {
        let page = r#"<div class="wrap_tohx"></div><div class="a wrap_toh wrap_toh_profile_full"><div>in</div></div><!-- <div class="wrap_toh"></div> --><span class="wrap_toh_full"/>"#;
        let phs = find_placeholders(page);
        assert_eq!(phs.len(), 2);
        assert_eq!(phs[0].builtin_name(), "full");
        assert_eq!(phs[0].block.inner(page), "<div>in</div>");
        assert_eq!(phs[1].tag, "span");
        assert_eq!(phs[1].builtin_name(), "full");
    }

    #[test]
    fn class_tokens_match_keys_and_caption_slugs() {
        let classes = strings![
            "wrap_toh",
            "wrap_toh_hide_model",
            "wrap_toh_show_brand",
            "wrap_toh_show_wireless_b_g_n",
            "wrap_toh_filter_supportedcurrentrel_23",
            "wrap_toh_filter_supportedcurrentrel_22",
            "wrap_toh_brand_tp-link",
            "wrap_toh_hide_nope"
        ];
        let layer = class_layer(&classes, &ds());
        assert_eq!(layer.hidden_columns, strings!["model"]);
        assert_eq!(layer.shown_columns, strings!["brand", "column_3"]);
        assert_eq!(
            layer.filter_columns.get("supportedcurrentrel"),
            Some(&FilterSpec::One(s!("23|22")))
        );
        assert_eq!(layer.filter_columns.get("brand"), Some(&FilterSpec::One(s!("^tp-link$"))));
    }

    #[test]
    fn query_parameters_become_filters() {
        let layer = query_layer(Some("https://openwrt.org/toh/start?x=1&toh.filter.target=ath79&toh.filter.=z"));
        assert_eq!(layer.filter_columns.len(), 1);
        assert_eq!(layer.filter_columns.get("target"), Some(&FilterSpec::One(s!("ath79"))));
        assert!(query_layer(Some("/toh/start?toh.filter.brand=%5ETP")).filter_columns.contains_key("brand"));
        assert!(query_layer(None).is_empty());
    }

    #[test]
    fn bad_inline_json_is_ignored() {
        assert!(inline_layer("{nope").is_none());
        assert!(inline_layer("  ").is_none());
        assert_eq!(inline_layer(r#"{"rotate":true}"#).and_then(|l| l.rotate), Some(true));
    }
}
