// src/config/consts.rs

// Upstream data sources
pub const TOH_DATA_MIN_URL: &str = "https://openwrt.github.io/toh/toh/index.html";
pub const TOH_DATA_FULL_URL: &str = "https://openwrt.github.io/toh/toh-full/index.html";
pub const TOH_DATA_JSON_URL: &str = "https://openwrt.github.io/toh/toh.json";

// Element id of the device table inside the HTML sources
pub const DEVICE_TABLE_ID: &str = "devices";

// Widget assets
pub const DATATABLES_CSS_URL: &str = "https://cdn.datatables.net/1.13.7/css/jquery.dataTables.css";
pub const DATATABLES_JS_URL: &str = "https://cdn.datatables.net/1.13.7/js/jquery.dataTables.min.js";
pub const SEARCHPANES_CSS_URL: &str =
    "https://cdn.datatables.net/searchpanes/2.2.0/css/searchPanes.dataTables.min.css";

// Net config
pub const USER_AGENT: &str = concat!("toh_embed/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 15;

// Upstream wiki (links get rewritten into local colon paths)
pub const WIKI_ORIGIN: &str = "https://openwrt.org";
pub const RELEASES_PATH: &str = "/releases/";
pub const TARGETS_PATH: &str = "/docs/techref/targets/";
pub const COMMIT_URL_PREFIX: &str = "https://git.openwrt.org/?p=openwrt/openwrt.git;a=commit;h=";
pub const FCC_URL_PREFIX: &str = "https://fcc.report/FCC-ID/";
pub const COMMIT_LABEL_LEN: usize = 10;

// Placeholder markup contract
pub const EMBED_CLASS: &str = "wrap_toh";
pub const FULL_EMBED_CLASS: &str = "wrap_toh_full";
pub const PROFILE_CLASS_PREFIX: &str = "wrap_toh_profile_";
pub const HIDE_CLASS_PREFIX: &str = "wrap_toh_hide_";
pub const SHOW_CLASS_PREFIX: &str = "wrap_toh_show_";
pub const FILTER_CLASS_PREFIX: &str = "wrap_toh_filter_";
pub const BRAND_CLASS_PREFIX: &str = "wrap_toh_brand_";
pub const SETTINGS_ATTR: &str = "data-settings";
pub const COMMENT_MARKER: &str = "ToH:";
pub const QUERY_FILTER_PREFIX: &str = "toh.filter.";
pub const HEADER_CLASS_PREFIX: &str = "toh_";
pub const LOADING_TEXT: &str = "Loading data...";

// Render defaults
pub const DEFAULT_DOM: &str = "lfrtip";
pub const DEFAULT_PAGING: bool = true;
pub const DEFAULT_PAGE_LENGTH: i32 = 50;

// Local state
pub const STORE_DIR: &str = ".toh";
pub const LOG_FILE: &str = "debug.log";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "toh";
pub const DEVICES_SUBDIR: &str = "devices";
pub const CONTENT_SUBDIR: &str = "content";
pub const DEVICE_PAGE_DATE: &str = "2019-11-28";
