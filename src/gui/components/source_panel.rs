// src/gui/components/source_panel.rs
//
// Left panel: data source list, built-in profile picker, reload.
// Selection changes are applied directly to `app`.

use eframe::egui;
use crate::{
    config::profile::{builtin, SourceKind, BUILTIN_PROFILES},
    gui::app::App,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Source");

    let idle = !app.running;
    let current = app.state.options.render.source;
    let mut picked: Option<SourceKind> = None;

    ui.add_enabled_ui(idle, |ui| {
        for kind in SourceKind::ALL {
            let is_selected = current == kind;
            let resp = ui.selectable_label(is_selected, kind.as_str()).on_hover_text(kind.url());
            if resp.clicked() && !is_selected {
                picked = Some(kind);
            }
        }
    });

    ui.separator();
    ui.label("Profile:");

    let before = app.state.gui.profile_name.clone();
    ui.add_enabled_ui(idle, |ui| {
        egui::ComboBox::from_id_salt("profile_combo")
            .selected_text(before.as_str())
            .show_ui(ui, |ui| {
                for name in BUILTIN_PROFILES {
                    ui.selectable_value(&mut app.state.gui.profile_name, s!(*name), *name);
                }
            });
    });

    if app.state.gui.profile_name != before {
        logf!("UI: Profile → {}", app.state.gui.profile_name);
        // A profile may pin its own source; follow it.
        let pinned = builtin(&app.state.gui.profile_name).and_then(|l| l.source);
        match pinned {
            Some(kind) if kind != app.state.options.render.source => picked = Some(kind),
            _ => {
                app.state.gui.sort = None;
                app.rebuild_view();
            }
        }
    }

    if let Some(kind) = picked {
        logf!("UI: Source → {}", kind.as_str());
        app.state.options.render.source = kind;
        app.state.gui.sort = None;
        app.data = None;
        app.rebuild_view();
        app.fetch(ui.ctx().clone());
    }

    ui.separator();

    if ui
        .add_enabled(!app.running, egui::Button::new("Reload"))
        .on_hover_text("Drop cached sources and fetch again")
        .clicked()
    {
        logf!("UI: Reload");
        app.reload(ui.ctx().clone());
    }

    ui.separator();

    if let Some(ds) = &app.data {
        ui.label(format!("{} devices", ds.row_count()));
        ui.label(format!("{} columns", ds.column_count()));
        ui.label(format!("{} shown", app.model.visible.len()));
    } else if app.running {
        ui.add(egui::Spinner::new().size(16.0));
    } else {
        ui.label("No data");
    }
}
