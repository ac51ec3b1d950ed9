// src/config/profile.rs
//! Embed profiles.
//!
//! A profile says which data source an embed shows, which columns are
//! visible, which rows are pre-filtered and how the widget lays out.
//!
//! Profiles are assembled from four layers, lowest precedence first:
//!
//! ```text
//! Builtin  (wrap_toh_profile_<name>)
//! Inline   (data-settings JSON / ToH: comment)
//! Classes  (wrap_toh_hide_* / _show_* / _filter_* / _brand_*)
//! Query    (?toh.filter.<col>=<pattern>)
//! ```
//!
//! `LayeredProfile::resolve` folds them into an immutable `Profile` once per
//! placeholder; nothing downstream sees the layers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Min,
    Full,
    Json,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Min, SourceKind::Full, SourceKind::Json];

    pub fn url(&self) -> &'static str {
        match self {
            SourceKind::Min => TOH_DATA_MIN_URL,
            SourceKind::Full => TOH_DATA_FULL_URL,
            SourceKind::Json => TOH_DATA_JSON_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Min => "min",
            SourceKind::Full => "full",
            SourceKind::Json => "json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Some(SourceKind::Min),
            "full" => Some(SourceKind::Full),
            "json" => Some(SourceKind::Json),
            _ => None,
        }
    }
}

/// Filter value for one column: a single pattern or a list of patterns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    One(String),
    Many(Vec<String>),
}

impl FilterSpec {
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            FilterSpec::One(p) => vec![p.as_str()],
            FilterSpec::Many(ps) => ps.iter().map(|p| p.as_str()).collect(),
        }
    }
}

/// One configuration layer. Every field is optional; unset fields defer to
/// lower layers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_length: Option<i32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filter_columns: BTreeMap<String, FilterSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hidden_columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shown_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<bool>,
}

impl ProfileLayer {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn is_empty(&self) -> bool {
        *self == ProfileLayer::default()
    }
}

pub const BUILTIN_PROFILES: &[&str] = &["default", "full", "supported_devices"];

/// Built-in named profiles. Unknown names return `None`.
pub fn builtin(name: &str) -> Option<ProfileLayer> {
    match name {
        "default" => Some(ProfileLayer {
            source: Some(SourceKind::Min),
            ..ProfileLayer::default()
        }),
        "full" => Some(ProfileLayer {
            source: Some(SourceKind::Full),
            ..ProfileLayer::default()
        }),
        "supported_devices" => Some(ProfileLayer {
            source: Some(SourceKind::Min),
            dom: Some(s!("frt")),
            paging: Some(false),
            filter_columns: BTreeMap::from([(
                s!("supportedcurrentrel"),
                FilterSpec::One(s!("!^(EOL|-|)$")),
            )]),
            ..ProfileLayer::default()
        }),
        _ => None,
    }
}

/// The four layers of one placeholder, in precedence order.
#[derive(Clone, Debug, Default)]
pub struct LayeredProfile {
    pub builtin: ProfileLayer,
    pub inline: Option<ProfileLayer>,
    pub classes: ProfileLayer,
    pub query: ProfileLayer,
}

impl LayeredProfile {
    /// Start from a built-in profile name; unknown names fall back to `default`.
    pub fn named(name: &str) -> Self {
        let builtin = builtin(name).unwrap_or_else(|| {
            logw!("Profile: unknown built-in {:?}, using default", name);
            builtin("default").unwrap_or_default()
        });
        Self { builtin, ..Self::default() }
    }

    fn layers(&self) -> impl Iterator<Item = &ProfileLayer> {
        std::iter::once(&self.builtin)
            .chain(self.inline.iter())
            .chain(std::iter::once(&self.classes))
            .chain(std::iter::once(&self.query))
    }

    /// Fold all layers into the final profile.
    /// Scalars: highest layer wins. Filters: merged per column.
    /// Hidden/shown lists: union in order of first appearance.
    pub fn resolve(&self) -> Profile {
        let mut out = Profile::default();

        for layer in self.layers() {
            if let Some(src) = layer.source { out.source = src; }
            if let Some(dom) = &layer.dom { out.dom = dom.clone(); }
            if let Some(p) = layer.paging { out.paging = p; }
            if let Some(n) = layer.page_length { out.page_length = n; }
            if let Some(r) = layer.rotate { out.rotate = r; }

            for (col, spec) in &layer.filter_columns {
                out.filter_columns.insert(col.clone(), spec.clone());
            }
            push_unique(&mut out.hidden_columns, &layer.hidden_columns);
            push_unique(&mut out.shown_columns, &layer.shown_columns);
        }
        out
    }
}

fn push_unique(into: &mut Vec<String>, items: &[String]) {
    for it in items {
        if !into.contains(it) {
            into.push(it.clone());
        }
    }
}

/// Resolved, immutable profile for one embed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub source: SourceKind,
    pub dom: String,
    pub paging: bool,
    pub page_length: i32,
    pub filter_columns: BTreeMap<String, FilterSpec>,
    pub hidden_columns: Vec<String>,
    pub shown_columns: Vec<String>,
    pub rotate: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            source: SourceKind::Min,
            dom: s!(DEFAULT_DOM),
            paging: DEFAULT_PAGING,
            page_length: DEFAULT_PAGE_LENGTH,
            filter_columns: BTreeMap::new(),
            hidden_columns: Vec::new(),
            shown_columns: Vec::new(),
            rotate: false,
        }
    }
}

impl Profile {
    /// Visible columns as indices into `columns`.
    ///
    /// Shown list (if any) in listed order, else every column but `deviceid`
    /// in source order. `deviceid` is appended last, then hidden columns are
    /// removed, so hiding always wins.
    pub fn column_order(&self, columns: &[String]) -> Vec<usize> {
        let index_of = |key: &str| columns.iter().position(|c| c == key);

        let mut order: Vec<usize> = if self.shown_columns.is_empty() {
            columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.as_str() != "deviceid")
                .map(|(i, _)| i)
                .collect()
        } else {
            let mut v = Vec::with_capacity(self.shown_columns.len() + 1);
            for key in &self.shown_columns {
                match index_of(key) {
                    Some(i) if !v.contains(&i) => v.push(i),
                    Some(_) => {}
                    None => logd!("Profile: shown column {:?} not in source", key),
                }
            }
            v
        };

        if let Some(i) = index_of("deviceid") {
            if !order.contains(&i) {
                order.push(i);
            }
        }

        order.retain(|&i| !self.hidden_columns.iter().any(|h| *h == columns[i]));
        order
    }
}
