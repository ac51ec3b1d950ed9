// src/filter.rs
//! Row filtering.
//!
//! Two independent mechanisms:
//! - `ColumnFilter`: static preset filters from a profile. Applied once,
//!   before rendering, and rows that fail never reach the widget.
//! - `LiveSearch`: per-keystroke column search with wildcard input, as the
//!   filter row of a rendered table does it in the browser.

use regex::{Regex, RegexBuilder};

use crate::config::profile::FilterSpec;
use crate::data::CellValue;

/// Preset patterns are written for the browser's regex dialect, so they
/// compile with `fancy_regex` (lookaround, backreferences).
#[derive(Clone, Debug)]
struct Pattern {
    re: fancy_regex::Regex,
    negated: bool,
}

impl Pattern {
    fn compile(raw: &str) -> Self {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let re = preset_regex(body).unwrap_or_else(|e| {
            loge!("Filter: bad pattern {:?} ({}), matching literally", body, e);
            preset_regex(&regex::escape(body)).unwrap_or_else(|_| match_nothing())
        });
        Self { re, negated }
    }

    fn accepts(&self, value: &str) -> bool {
        let hit = self.re.is_match(value).unwrap_or_else(|e| {
            logw!("Filter: {:?} gave up on {:?} ({})", self.re.as_str(), value, e);
            false
        });
        hit != self.negated
    }
}

fn preset_regex(pattern: &str) -> Result<fancy_regex::Regex, fancy_regex::Error> {
    fancy_regex::Regex::new(&format!("(?i){pattern}"))
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

fn match_nothing() -> fancy_regex::Regex {
    // `[^\s\S]` never matches and always compiles.
    fancy_regex::Regex::new(r"[^\s\S]").unwrap_or_else(|_| unreachable!())
}

/// Compiled preset filter for one column.
///
/// A value passes when it matches at least one plain pattern or fails to
/// match at least one `!`-negated pattern. A multi-valued cell passes when
/// any of its elements passes.
#[derive(Clone, Debug)]
pub struct ColumnFilter {
    patterns: Vec<Pattern>,
}

impl ColumnFilter {
    pub fn compile(spec: &FilterSpec) -> Self {
        Self { patterns: spec.patterns().into_iter().map(Pattern::compile).collect() }
    }

    pub fn accepts_str(&self, value: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.accepts(value))
    }

    pub fn accepts(&self, value: &CellValue) -> bool {
        value.parts().into_iter().any(|v| self.accepts_str(v))
    }
}

/// Translate a filter box's literal text into a regex:
/// `*` → `.*`, `?` → `.`, every other metacharacter escaped.
pub fn wildcard_to_regex(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    let mut buf = [0u8; 4];
    for ch in input.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out
}

/// One live search: unanchored, case-insensitive wildcard match.
#[derive(Clone, Debug, Default)]
pub struct Search {
    text: String,
    re: Option<Regex>,
}

impl Search {
    /// Empty text resets to "match everything".
    pub fn set(&mut self, text: &str) {
        if text == self.text {
            return;
        }
        self.text = s!(text);
        self.re = if text.is_empty() {
            None
        } else {
            case_insensitive(&wildcard_to_regex(text)).ok()
        };
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn is_active(&self) -> bool { self.re.is_some() }

    pub fn matches(&self, value: &str) -> bool {
        self.re.as_ref().is_none_or(|re| re.is_match(value))
    }
}

/// Column searches plus one global search, over display text.
///
/// Editing a column search never changes the global search and vice versa.
#[derive(Clone, Debug, Default)]
pub struct LiveSearch {
    columns: Vec<Search>,
    global: Search,
}

impl LiveSearch {
    pub fn new(ncols: usize) -> Self {
        Self { columns: vec![Search::default(); ncols], global: Search::default() }
    }

    pub fn set_column(&mut self, col: usize, text: &str) {
        if col >= self.columns.len() {
            self.columns.resize(col + 1, Search::default());
        }
        self.columns[col].set(text);
    }

    pub fn column_text(&self, col: usize) -> &str {
        self.columns.get(col).map(|s| s.text()).unwrap_or("")
    }

    pub fn set_global(&mut self, text: &str) {
        self.global.set(text);
    }

    pub fn global_text(&self) -> &str { self.global.text() }

    /// Row passes when every active column search and the global search match.
    pub fn matches_row<S: AsRef<str>>(&self, row: &[S]) -> bool {
        let cols_ok = self.columns.iter().enumerate().all(|(i, s)| {
            !s.is_active() || row.get(i).is_some_and(|v| s.matches(v.as_ref()))
        });
        cols_ok && (!self.global.is_active() || row.iter().any(|v| self.global.matches(v.as_ref())))
    }

    /// Indices of the rows that pass.
    pub fn visible_rows<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> Vec<usize> {
        rows.iter().enumerate().filter(|(_, r)| self.matches_row(r)).map(|(i, _)| i).collect()
    }
}
