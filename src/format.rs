// src/format.rs
//! Value formatting: (column, raw value) → text or link.
//!
//! Column keys map onto `ColumnKind`, each kind onto one `Rule`. Keys with
//! no special meaning fall through to `Rule::Auto`, which links bare URLs
//! and prints everything else as text.

use url::Url;

use crate::config::consts::{
    COMMIT_LABEL_LEN, COMMIT_URL_PREFIX, FCC_URL_PREFIX, RELEASES_PATH, TARGETS_PATH,
};
use crate::core::html::{escape_attr, escape_text};
use crate::core::sanitize::space_commas;
use crate::data::CellValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    DeviceId,
    DevicePage,
    SupportedCurrentRel,
    SupportedSinceRel,
    SupportedSinceCommit,
    FccId,
    Target,
    Other,
}

impl ColumnKind {
    pub fn of(key: &str) -> Self {
        match key {
            "deviceid" => ColumnKind::DeviceId,
            "devicepage" => ColumnKind::DevicePage,
            "supportedcurrentrel" => ColumnKind::SupportedCurrentRel,
            "supportedsincerel" => ColumnKind::SupportedSinceRel,
            "supportedsincecommit" => ColumnKind::SupportedSinceCommit,
            "fccid" => ColumnKind::FccId,
            "target" => ColumnKind::Target,
            _ => ColumnKind::Other,
        }
    }

    pub fn rule(self) -> Rule {
        match self {
            ColumnKind::DeviceId => Rule::EditLink,
            ColumnKind::DevicePage => Rule::PageLink,
            ColumnKind::SupportedCurrentRel | ColumnKind::SupportedSinceRel => Rule::ReleaseLink,
            ColumnKind::SupportedSinceCommit => Rule::CommitLink,
            ColumnKind::FccId => Rule::FccLink,
            ColumnKind::Target => Rule::TargetLink,
            ColumnKind::Other => Rule::Auto,
        }
    }

    /// Columns that get neither a filter input nor sorting in the widget.
    pub fn is_fixed(self) -> bool {
        matches!(self, ColumnKind::DeviceId | ColumnKind::DevicePage)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    EditLink,
    PageLink,
    ReleaseLink,
    CommitLink,
    FccLink,
    TargetLink,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkScope {
    /// Wiki-styled, colon-path title
    Internal,
    /// Off-site, not to be followed by indexers
    External,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub label: String,
    pub title: String,
    pub scope: LinkScope,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Link(Link),
    Seq(Vec<Fragment>),
}

impl Fragment {
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Text(t) => escape_text(t),
            Fragment::Link(l) => match l.scope {
                LinkScope::Internal => format!(
                    r#"<a href="{}" class="wikilink1" title="{}">{}</a>"#,
                    escape_attr(&l.href), escape_attr(&l.title), escape_text(&l.label)
                ),
                LinkScope::External => format!(
                    r#"<a href="{}" class="urlextern" rel="nofollow" title="{}">{}</a>"#,
                    escape_attr(&l.href), escape_attr(&l.title), escape_text(&l.label)
                ),
            },
            Fragment::Seq(parts) => parts.iter().map(|p| p.to_html()).collect::<Vec<_>>().join(", "),
        }
    }

    /// What a reader sees: link labels, joined lists.
    pub fn text(&self) -> String {
        match self {
            Fragment::Text(t) => t.clone(),
            Fragment::Link(l) => l.label.clone(),
            Fragment::Seq(parts) => parts.iter().map(|p| p.text()).collect::<Vec<_>>().join(", "),
        }
    }
}

/// Format one raw cell for the given column key.
pub fn format_value(key: &str, value: &CellValue) -> Fragment {
    let rule = ColumnKind::of(key).rule();
    match value {
        CellValue::Empty => Fragment::Text(s!()),
        CellValue::Text(s) => format_one(rule, s),
        CellValue::List(items) => Fragment::Seq(items.iter().map(|s| format_one(rule, s)).collect()),
    }
}

fn format_one(rule: Rule, raw: &str) -> Fragment {
    let v = raw.trim();
    if v.is_empty() {
        return Fragment::Text(s!());
    }
    match rule {
        Rule::EditLink => internal(format!("{}?do=edit", colon_to_path(v)), s!("Edit"), v),
        Rule::PageLink => {
            let label = v.rsplit(':').next().unwrap_or(v);
            internal(colon_to_path(v), s!(label), v)
        }
        Rule::ReleaseLink => {
            let version = if is_url(v) { release_segment(v) } else { v };
            if version.starts_with(|c: char| c.is_ascii_digit()) {
                let href = join!(RELEASES_PATH, version);
                internal(href, s!(version), &format!("releases:{version}"))
            } else {
                Fragment::Text(s!(v))
            }
        }
        Rule::CommitLink => {
            if is_url(v) {
                external(s!(v), short_hash(commit_hash(v)))
            } else if v.len() >= 7 && v.chars().all(|c| c.is_ascii_hexdigit()) {
                external(join!(COMMIT_URL_PREFIX, v), short_hash(v))
            } else {
                Fragment::Text(s!(v))
            }
        }
        Rule::FccLink => {
            if is_url(v) {
                external(s!(v), s!(last_segment(v)))
            } else {
                external(join!(FCC_URL_PREFIX, v), s!(v))
            }
        }
        Rule::TargetLink => {
            let target = if is_url(v) { last_segment(v) } else { v };
            internal(
                join!(TARGETS_PATH, target),
                s!(target),
                &format!("docs:techref:targets:{target}"),
            )
        }
        Rule::Auto => {
            if is_url(v) {
                let label = Url::parse(v)
                    .ok()
                    .and_then(|u| u.host_str().map(String::from))
                    .unwrap_or_else(|| s!(v));
                external(s!(v), label)
            } else {
                Fragment::Text(space_commas(v))
            }
        }
    }
}

fn internal(href: String, label: String, title: &str) -> Fragment {
    Fragment::Link(Link { href, label, title: s!(title), scope: LinkScope::Internal })
}

fn external(href: String, label: String) -> Fragment {
    Fragment::Link(Link { title: href.clone(), href, label, scope: LinkScope::External })
}

fn is_url(v: &str) -> bool {
    v.starts_with("http://") || v.starts_with("https://")
}

/// `toh:tp-link:archer_c7` → `/toh/tp-link/archer_c7`
fn colon_to_path(id: &str) -> String {
    join!("/", &id.trim_matches(':').replace(':', "/"))
}

fn last_segment(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

/// `.../releases/23.05/start` → `23.05`: first numeric segment after
/// `releases/`, else the last segment.
fn release_segment(url: &str) -> &str {
    url.split_once("releases/")
        .and_then(|(_, rest)| {
            rest.split(['/', '?', '#'])
                .find(|seg| seg.starts_with(|c: char| c.is_ascii_digit()))
        })
        .unwrap_or_else(|| last_segment(url))
}

/// gitweb (`...;h=<hash>`), cgit (`?id=<hash>`) or path style commit URLs.
fn commit_hash(url: &str) -> &str {
    for marker in [";h=", "?h=", "&h=", "?id=", "&id="] {
        if let Some(i) = url.rfind(marker) {
            let rest = &url[i + marker.len()..];
            return rest.split([';', '&', '#']).next().unwrap_or(rest);
        }
    }
    last_segment(url)
}

fn short_hash(h: &str) -> String {
    h.chars().take(COMMIT_LABEL_LEN).collect()
}
