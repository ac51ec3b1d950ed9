// src/cli.rs
use std::path::PathBuf;

use crate::config::options::{AssetMode, ExportFormat, ExportOptions, RenderOptions};
use crate::config::profile::SourceKind;

pub const HELP: &str = include_str!("cli_help.txt");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableArgs {
    pub source: Option<SourceKind>,
    pub profile: String,
    pub settings: Option<String>,
    pub hide: Vec<String>,
    pub show: Vec<String>,
    pub filters: Vec<(String, String)>,
    pub export: ExportOptions,
    /// `None` → stdout
    pub out: Option<String>,
}

impl Default for TableArgs {
    fn default() -> Self {
        let mut export = ExportOptions::default();
        export.include_headers = false;
        Self {
            source: None,
            profile: s!("default"),
            settings: None,
            hide: Vec::new(),
            show: Vec::new(),
            filters: Vec::new(),
            export,
            out: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Render { page: PathBuf, render: RenderOptions, out: Option<PathBuf> },
    Table(TableArgs),
    Columns { source: SourceKind },
    Devices { source: SourceKind, out_dir: Option<PathBuf> },
    Help,
}

/// Parse everything after the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, Box<dyn std::error::Error>> {
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else { return Ok(Command::Help) };

    match cmd.as_str() {
        "render" => {
            let mut page = None;
            let mut render = RenderOptions::default();
            let mut out = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--page" => page = Some(PathBuf::from(value(&mut args, "--page")?)),
                    "--url" => render.page_url = Some(value(&mut args, "--url")?),
                    "--inline-assets" => render.assets = AssetMode::Inline,
                    "-o" | "--out" => out = Some(PathBuf::from(value(&mut args, "--out")?)),
                    "-h" | "--help" => return Ok(Command::Help),
                    _ => return Err(format!("Unknown arg: {}", a).into()),
                }
            }
            let page = page.ok_or("render: --page <file> is required")?;
            Ok(Command::Render { page, render, out })
        }
        "table" => {
            let mut t = TableArgs::default();
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--source" => t.source = Some(parse_source(&value(&mut args, "--source")?)?),
                    "--profile" => t.profile = value(&mut args, "--profile")?,
                    "--settings" => t.settings = Some(value(&mut args, "--settings")?),
                    "--hide" => t.hide.push(value(&mut args, "--hide")?),
                    "--show" => t.show.push(value(&mut args, "--show")?),
                    "--filter" => {
                        let v = value(&mut args, "--filter")?;
                        let (col, pat) = v
                            .split_once('=')
                            .ok_or_else(|| format!("--filter expects <col>=<pattern>, got {:?}", v))?;
                        t.filters.push((s!(col.trim()), s!(pat)));
                    }
                    "--format" => {
                        let v = value(&mut args, "--format")?;
                        t.export.format = ExportFormat::parse(&v)
                            .ok_or_else(|| format!("Unknown format: {}", v))?;
                    }
                    "--include-headers" => t.export.include_headers = true,
                    "-o" | "--out" => t.out = Some(value(&mut args, "--out")?),
                    "-h" | "--help" => return Ok(Command::Help),
                    _ => return Err(format!("Unknown arg: {}", a).into()),
                }
            }
            if let Some(out) = &t.out {
                t.export.set_path(out);
            }
            Ok(Command::Table(t))
        }
        "columns" | "devices" => {
            let mut source = SourceKind::default();
            let mut out_dir = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--source" => source = parse_source(&value(&mut args, "--source")?)?,
                    "-o" | "--out" if cmd == "devices" => {
                        out_dir = Some(PathBuf::from(value(&mut args, "--out")?))
                    }
                    "-h" | "--help" => return Ok(Command::Help),
                    _ => return Err(format!("Unknown arg: {}", a).into()),
                }
            }
            Ok(if cmd == "columns" {
                Command::Columns { source }
            } else {
                Command::Devices { source, out_dir }
            })
        }
        "-h" | "--help" | "help" => Ok(Command::Help),
        other => Err(format!("Unknown command: {} (try --help)", other).into()),
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, Box<dyn std::error::Error>> {
    args.next().ok_or_else(|| format!("Missing value for {}", flag).into())
}

fn parse_source(v: &str) -> Result<SourceKind, Box<dyn std::error::Error>> {
    SourceKind::parse(v).ok_or_else(|| format!("Unknown source: {} (min|full|json)", v).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, Box<dyn std::error::Error>> {
        parse_args(args.iter().map(|s| s!(*s)))
    }

    #[test]
    fn table_flags() {
        let Command::Table(t) = parse(&[
            "table", "--source", "full", "--hide", "model", "--filter", "target=^ath79$",
            "--format", "tsv", "--include-headers", "-o", "out/devs.tsv",
        ]).unwrap() else { panic!("expected table") };
        assert_eq!(t.source, Some(SourceKind::Full));
        assert_eq!(t.hide, strings!["model"]);
        assert_eq!(t.filters, vec![(s!("target"), s!("^ath79$"))]);
        assert_eq!(t.export.format, ExportFormat::Tsv);
        assert!(t.export.include_headers);
        assert_eq!(t.export.out_path(), PathBuf::from("out/devs.tsv"));
    }

    #[test]
    fn render_requires_page() {
        assert!(parse(&["render"]).is_err());
        let Command::Render { render, .. } = parse(&["render", "--page", "p.html", "--inline-assets"]).unwrap()
        else { panic!("expected render") };
        assert_eq!(render.assets, AssetMode::Inline);
    }

    #[test]
    fn errors_on_bad_input() {
        assert!(parse(&["table", "--filter", "nope"]).is_err());
        assert!(parse(&["columns", "--source", "xml"]).is_err());
        assert!(parse(&["columns", "-o", "x"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
        assert_eq!(parse(&[]).unwrap(), Command::Help);
    }
}
