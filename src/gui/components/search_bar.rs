// src/gui/components/search_bar.rs

use eframe::egui::{self, widgets::Spinner};
use crate::gui::app::App;

/// Global search box + status line.
pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        ui.label("Search:");
        let resp = ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.global_search)
                .hint_text("any column, wildcards * and ?")
                .desired_width(260.0),
        );
        if resp.changed() {
            app.model.set_global_search(&app.state.gui.global_search);
            logd!("UI: global search → {:?} ({} rows)", app.state.gui.global_search, app.model.visible.len());
        }
        if !app.state.gui.global_search.is_empty() && ui.small_button("✖").clicked() {
            app.state.gui.global_search.clear();
            app.model.set_global_search("");
        }

        ui.separator();

        if app.running {
            ui.add(Spinner::new().size(16.0));
        }
        ui.label(app.status_text());
    });
}
