// src/assets.rs
//
// Widget stylesheets and script for a rendered page.
//
// Link mode references the CDN; Inline mode embeds the bodies, fetched once
// per process through the same slot-per-key scheme as `sources`.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::consts::{DATATABLES_CSS_URL, DATATABLES_JS_URL, SEARCHPANES_CSS_URL};
use crate::config::options::AssetMode;
use crate::core::html::escape_attr;
use crate::core::net::http_get;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Style,
    Script,
}

pub const ASSETS: &[(AssetKind, &str)] = &[
    (AssetKind::Style, DATATABLES_CSS_URL),
    (AssetKind::Style, SEARCHPANES_CSS_URL),
    (AssetKind::Script, DATATABLES_JS_URL),
];

type FetchFn = fn(&str) -> Result<String, Box<dyn Error>>;
type Slot = Arc<OnceLock<Result<Arc<str>, String>>>;

/// Asset bodies by URL, fetched at most once.
pub struct AssetCache {
    fetch: FetchFn,
    slots: Mutex<HashMap<String, Slot>>,
}

impl AssetCache {
    pub fn new(fetch: FetchFn) -> Self {
        Self { fetch, slots: Mutex::new(HashMap::new()) }
    }

    pub fn body(&self, url: &str) -> Result<Arc<str>, Box<dyn Error>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
            slots.entry(s!(url)).or_default().clone()
        };
        let res = slot.get_or_init(|| {
            (self.fetch)(url).map(Arc::from).map_err(|e| {
                loge!("Assets: {} failed: {}", url, e);
                e.to_string()
            })
        });
        match res {
            Ok(body) => Ok(body.clone()),
            Err(msg) => Err(format!("asset {url}: {msg}").into()),
        }
    }
}

pub fn global() -> &'static AssetCache {
    static CACHE: OnceLock<AssetCache> = OnceLock::new();
    CACHE.get_or_init(|| AssetCache::new(http_get))
}

/// Asset emission for one page render: markup is produced once.
pub struct PageAssets<'a> {
    mode: AssetMode,
    cache: &'a AssetCache,
    emitted: bool,
}

impl<'a> PageAssets<'a> {
    pub fn new(mode: AssetMode, cache: &'a AssetCache) -> Self {
        Self { mode, cache, emitted: false }
    }

    /// `Some(markup)` the first time, `None` after. Inline fetch errors
    /// propagate and leave the page un-emitted.
    pub fn head_markup(&mut self) -> Result<Option<String>, Box<dyn Error>> {
        if self.emitted {
            return Ok(None);
        }
        let mut out = String::new();
        for &(kind, url) in ASSETS {
            out.push_str(&self.tag(kind, url)?);
            out.push('\n');
        }
        self.emitted = true;
        Ok(Some(out))
    }

    fn tag(&self, kind: AssetKind, url: &str) -> Result<String, Box<dyn Error>> {
        Ok(match (self.mode, kind) {
            (AssetMode::Link, AssetKind::Style) => {
                format!(r#"<link rel="stylesheet" type="text/css" href="{}">"#, escape_attr(url))
            }
            (AssetMode::Link, AssetKind::Script) => {
                format!(r#"<script type="text/javascript" src="{}"></script>"#, escape_attr(url))
            }
            (AssetMode::Inline, AssetKind::Style) => {
                format!("<style>/* {} */\n{}</style>", url, self.cache.body(url)?)
            }
            (AssetMode::Inline, AssetKind::Script) => {
                format!("<script>/* {} */\n{}</script>", url, self.cache.body(url)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_fetch(url: &str) -> Result<String, Box<dyn Error>> {
        Ok(format!("body-of {url}"))
    }

    fn bad_fetch(_: &str) -> Result<String, Box<dyn Error>> {
        Err("offline".into())
    }

    #[test]
    fn markup_is_emitted_once() {
        let cache = AssetCache::new(bad_fetch);
        let mut pa = PageAssets::new(AssetMode::Link, &cache);
        let first = pa.head_markup().unwrap().unwrap();
        assert_eq!(first.matches("<link").count(), 2);
        assert!(first.contains(DATATABLES_JS_URL));
        assert!(pa.head_markup().unwrap().is_none());
    }

    #[test]
    fn inline_embeds_bodies() {
        let cache = AssetCache::new(ok_fetch);
        let mut pa = PageAssets::new(AssetMode::Inline, &cache);
        let m = pa.head_markup().unwrap().unwrap();
        assert!(m.contains(&format!("body-of {DATATABLES_CSS_URL}")));
        assert!(m.contains("<script>"));
    }

    #[test]
    fn inline_failure_is_an_error() {
        let cache = AssetCache::new(bad_fetch);
        let mut pa = PageAssets::new(AssetMode::Inline, &cache);
        assert!(pa.head_markup().is_err());
        // Failure is cached and still an error on retry.
        assert!(cache.body(DATATABLES_CSS_URL).is_err());
    }
}
