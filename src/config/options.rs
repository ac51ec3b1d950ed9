// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::consts::*;
use super::profile::SourceKind;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub render: RenderOptions,
    pub export: ExportOptions,
}

/// How widget assets end up in a rendered page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetMode {
    /// `<link>`/`<script>` tags pointing at the CDN.
    #[default]
    Link,
    /// Fetch each asset once and inline its body.
    Inline,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub assets: AssetMode,
    /// Page URL used for `toh.filter.*` query overrides.
    pub page_url: Option<String>,
    /// Source for ad-hoc tables (CLI `table`, GUI) when no profile picks one.
    pub source: SourceKind,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { assets: AssetMode::Link, page_url: None, source: SourceKind::Min }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }

    /// Field separator for delimited formats.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Html => None,
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Some(ExportFormat::Html),
            "csv" => Some(ExportFormat::Csv),
            "tsv" => Some(ExportFormat::Tsv),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    out_path: OutputPath,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out_path: OutputPath::default(),
        }
    }
}

impl ExportOptions {
    /// `<dir>/<stem>.<ext>`, or the exact file the user typed if it had an extension.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        match &self.out_path.ext {
            Some(ext) => {
                let mut name = self.out_path.file_stem.clone();
                name.push(".");
                name.push(ext);
                path.push(name);
            }
            None => {
                let stem = self.out_path.file_stem.to_string_lossy().into_owned();
                path.push(join!(stem, ".", self.format.ext()));
            }
        }
        path
    }

    /// Parse user text into dir + stem (+ explicit extension, kept as typed).
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
        self.out_path.ext = p.extension().map(|e| e.to_os_string());
    }

    /// Directory for multi-file exports (per-device dumps).
    pub fn out_dir(&self) -> &Path {
        &self.out_path.dir
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
    ext: Option<OsString>,
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
            ext: None,
        }
    }
}
