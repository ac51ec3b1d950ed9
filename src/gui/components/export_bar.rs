// src/gui/components/export_bar.rs

use std::{path::PathBuf, sync::Arc, thread};

use eframe::egui;
use crate::{
    config::options::ExportFormat,
    export::export_string,
    file,
    gui::{app::App, progress::GuiProgress},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    {
        let export = &mut app.state.options.export;

        // --- Format + Include headers ---
        let prev_fmt = export.format;
        ui.horizontal(|ui| {
            ui.label("Format:");
            ui.selectable_value(&mut export.format, ExportFormat::Csv, "CSV");
            ui.selectable_value(&mut export.format, ExportFormat::Tsv, "TSV");
            ui.selectable_value(&mut export.format, ExportFormat::Html, "HTML");

            ui.separator();

            let before_headers = export.include_headers;
            ui.add_enabled(
                export.format != ExportFormat::Html,
                egui::Checkbox::new(&mut export.include_headers, "Include headers"),
            );
            if export.include_headers != before_headers {
                logf!("UI: Include_headers → {}", export.include_headers);
            }
        });

        if export.format != prev_fmt {
            logf!("UI: Export format → {:?}", export.format);
            if !app.out_path_dirty {
                app.out_path_text = export.out_path().to_string_lossy().into_owned();
            }
        }
    }

    // --- Output field ---
    ui.horizontal(|ui| {
        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text)
                .font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_path_dirty = true;
            logd!("UI: out_path_text changed (dirty=true) → {}", app.out_path_text);
        }
    });

    // --- Actions (Copy / Export / Dump devices) ---
    ui.horizontal(|ui| {
        if ui.button("Copy").clicked() {
            if app.model.visible.is_empty() {
                app.status("Nothing to copy");
                logd!("Copy: Clicked, but there's nothing to copy");
            } else {
                let view = app.model.visible_view();
                let txt = export_string(&view, &app.layout(), &app.state.options.export);
                logf!("Copy: rows={}, cols={}", view.row_count(), view.keys.len());
                ui.ctx().copy_text(txt);
                app.status("Copied to clipboard");
            }
        }

        if ui.button("Export").clicked() {
            if app.model.visible.is_empty() {
                app.status("Nothing to export");
                logd!("Export: Clicked, but there's nothing to export");
            } else {
                commit_out_path(app);
                let view = app.model.visible_view();
                match file::write_export_single(&app.state.options.export, &view, &app.layout()) {
                    Ok(path) => app.status(format!("Exported {} rows → {}", view.row_count(), path.display())),
                    Err(e) => {
                        loge!("Export: Error: {}", e);
                        app.status(format!("Export error: {e}"));
                    }
                }
            }
        }

        let dump = ui
            .add_enabled(app.data.is_some(), egui::Button::new("Dump devices"))
            .on_hover_text("One JSON file and one Markdown page per device, under the output folder");
        if dump.clicked() {
            commit_out_path(app);
            if let Some(ds) = app.data.as_ref().map(Arc::clone) {
                let out_dir: PathBuf = app.state.options.export.out_dir().to_path_buf();
                let status = Arc::clone(&app.status);
                let ctx = ui.ctx().clone();
                logf!("Dump: Begin {} devices → {}", ds.row_count(), out_dir.display());
                thread::spawn(move || {
                    let mut progress = GuiProgress::new(Arc::clone(&status));
                    if let Err(e) = file::write_device_dump(&ds, &out_dir, Some(&mut progress)) {
                        loge!("Dump: Error: {}", e);
                        if let Ok(mut s) = status.lock() {
                            *s = format!("Dump error: {e}");
                        }
                    }
                    ctx.request_repaint();
                });
            }
        }
    });
}

/// Apply a typed output path before writing.
fn commit_out_path(app: &mut App) {
    if app.out_path_dirty {
        app.state.options.export.set_path(&app.out_path_text);
        logf!("Export: Out path set → {}", app.state.options.export.out_path().display());
        app.out_path_dirty = false;
    }
}
