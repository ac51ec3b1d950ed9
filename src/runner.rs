// src/runner.rs
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    assets,
    cli::{Command, HELP, TableArgs},
    config::consts::DEFAULT_OUT_DIR,
    config::options::RenderOptions,
    config::profile::{FilterSpec, LayeredProfile, Profile, SourceKind},
    embed,
    export::export_string,
    file::{ensure_directory, write_device_dump, write_export_single},
    progress::Progress,
    render::{Layout, TableView},
    sources::{self, SourceCache},
};

/// Prints progress lines for the CLI.
struct StderrProgress;

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        eprintln!("{} entries", total);
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{}", msg);
    }
}

/// Execute one parsed CLI command against the process-wide caches.
pub fn run(cmd: Command) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => {
            print!("{}", HELP);
            Ok(())
        }
        Command::Render { page, render, out } => {
            let html = render_file(&page, &render, sources::global())?;
            emit(out.as_deref(), &html)
        }
        Command::Table(args) => run_table(&args, sources::global()),
        Command::Columns { source } => {
            for (key, caption) in list_columns(source, sources::global())? {
                println!("{}\t{}", key, caption);
            }
            Ok(())
        }
        Command::Devices { source, out_dir } => {
            let dir = out_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
            let ds = sources::global().load(source)?;
            let written = write_device_dump(&ds, &dir, Some(&mut StderrProgress))?;
            logf!("Devices: {} files under {}", written.len(), dir.display());
            Ok(())
        }
    }
}

/// Render every placeholder of a page file.
pub fn render_file(page: &Path, opts: &RenderOptions, cache: &SourceCache) -> Result<String, Box<dyn Error>> {
    let doc = fs::read_to_string(page)
        .map_err(|e| format!("Cannot read {}: {}", page.display(), e))?;
    logf!("Render: page {} ({} bytes)", page.display(), doc.len());
    embed::render_page(&doc, opts, cache, assets::global())
}

/// Profile for an ad-hoc table: built-in, then `--settings`, then
/// `--hide/--show`, then `--source/--filter` on top.
pub fn table_profile(args: &TableArgs) -> Profile {
    let mut lp = LayeredProfile::named(&args.profile);
    lp.inline = args.settings.as_deref().and_then(embed::inline_layer);
    lp.classes.hidden_columns = args.hide.clone();
    lp.classes.shown_columns = args.show.clone();
    lp.query.source = args.source;
    for (col, pat) in &args.filters {
        lp.query.filter_columns.insert(col.clone(), FilterSpec::One(pat.clone()));
    }
    lp.resolve()
}

pub fn run_table(args: &TableArgs, cache: &SourceCache) -> Result<(), Box<dyn Error>> {
    let profile = table_profile(args);
    let ds = cache.load(profile.source)?;
    let view = TableView::build(&ds, &profile);
    let layout = Layout::from(&profile);

    if args.out.is_some() {
        write_export_single(&args.export, &view, &layout)?;
        return Ok(());
    }
    emit(None, &export_string(&view, &layout, &args.export))
}

pub fn list_columns(source: SourceKind, cache: &SourceCache) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let ds = cache.load(source)?;
    Ok(ds.columns.iter().cloned().zip(ds.captions.iter().cloned()).collect())
}

fn emit(out: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    ensure_directory(parent)?;
                }
            }
            fs::write(path, text)?;
            logf!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
