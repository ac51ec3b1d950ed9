// src/sources.rs
//
// Fetch-once cache of normalized data sources.
//
// Each SourceKind gets one slot. The slot is created under a short lock and
// then filled outside it, so concurrent callers for the same source block on
// the same OnceLock and the fetch runs exactly once. Errors are cached too;
// `invalidate` is the only way to try again.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::profile::SourceKind;
use crate::core::net::http_get;
use crate::data::DataSource;
use crate::specs;

/// Anything that can turn a source kind into its raw document text.
pub trait Fetch: Send + Sync {
    fn fetch(&self, kind: SourceKind) -> Result<String, Box<dyn Error>>;
}

/// Upstream HTTPS fetcher.
pub struct HttpFetcher;

impl Fetch for HttpFetcher {
    fn fetch(&self, kind: SourceKind) -> Result<String, Box<dyn Error>> {
        http_get(kind.url())
    }
}

/// A cached fetch/parse failure. Cloneable so every waiter gets a copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchError {
    pub source: SourceKind,
    pub message: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {}: {}", self.source.as_str(), self.message)
    }
}

impl Error for FetchError {}

type Slot = Arc<OnceLock<Result<Arc<DataSource>, FetchError>>>;

pub struct SourceCache {
    fetcher: Box<dyn Fetch>,
    slots: Mutex<HashMap<SourceKind, Slot>>,
}

impl SourceCache {
    pub fn new(fetcher: Box<dyn Fetch>) -> Self {
        Self { fetcher, slots: Mutex::new(HashMap::new()) }
    }

    fn slot(&self, kind: SourceKind) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        slots.entry(kind).or_default().clone()
    }

    /// Fetched and normalized source, fetching on first use.
    pub fn load(&self, kind: SourceKind) -> Result<Arc<DataSource>, FetchError> {
        let slot = self.slot(kind);
        slot.get_or_init(|| self.fetch_and_parse(kind)).clone()
    }

    /// Whether `kind` has already been loaded (successfully or not).
    pub fn is_loaded(&self, kind: SourceKind) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        slots.get(&kind).is_some_and(|s| s.get().is_some())
    }

    /// Drop every slot. In-flight loads finish into their old slot.
    pub fn invalidate(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        logf!("Sources: cache invalidated ({} slots)", slots.len());
        slots.clear();
    }

    fn fetch_and_parse(&self, kind: SourceKind) -> Result<Arc<DataSource>, FetchError> {
        logf!("Sources: fetching {} ({})", kind.as_str(), kind.url());
        let fail = |e: Box<dyn Error>| {
            let err = FetchError { source: kind, message: e.to_string() };
            loge!("Sources: {}", err);
            err
        };
        let text = self.fetcher.fetch(kind).map_err(fail)?;
        let ds = specs::parse(kind, &text).map_err(fail)?;
        logf!("Sources: {} ready, {} devices", kind.as_str(), ds.row_count());
        Ok(Arc::new(ds))
    }
}

/// Process-wide cache over the upstream HTTPS fetcher.
pub fn global() -> &'static SourceCache {
    static CACHE: OnceLock<SourceCache> = OnceLock::new();
    CACHE.get_or_init(|| SourceCache::new(Box::new(HttpFetcher)))
}
