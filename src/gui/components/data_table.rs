// src/gui/components/data_table.rs
//
// Draws the live table: sortable headers, one filter box per column,
// body rows from `model.visible`. Purely a view over `app.model`.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};
use crate::{
    config::consts::WIKI_ORIGIN,
    format::{Fragment, LinkScope},
    gui::app::App,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let cols = app.model.ncols();
    if cols == 0 {
        ui.centered_and_justified(|ui| {
            ui.label(if app.running { "Loading..." } else { "No data" });
        });
        return;
    }

    // Ensure scroll bars allocate space (not floating over content)
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.bar_inner_margin = 7.0;
        s.bar_outer_margin = 0.0;
        s.handle_min_length = 48.0;
        s.foreground_color = true;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    // Filter edits are collected here and applied once the table is drawn.
    let mut filters: Vec<String> = (0..cols).map(|c| s!(app.model.search.column_text(c))).collect();
    let mut sort_clicked: Option<usize> = None;
    let sort = app.model.sort();

    let avail_h = ui.available_height();
    egui::ScrollArea::new([true, false])
        .id_salt("toh_table_hscroll")
        .min_scrolled_height(avail_h)
        .max_height(avail_h)
        .show(ui, |ui| {
            let model = &app.model;
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .min_scrolled_height(0.0)
                .id_salt(("toh_table", &model.view.keys));
            for _ in 0..cols {
                table = table.column(Column::initial(120.0).resizable(true).clip(true).at_least(24.0));
            }

            table
                .header(46.0, |mut header| {
                    for ci in 0..cols {
                        header.col(|ui| {
                            ui.vertical(|ui| {
                                ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                                let caption = model.view.captions.get(ci).map(String::as_str).unwrap_or("");
                                let arrow = match sort {
                                    Some((c, true)) if c == ci => " ▲",
                                    Some((c, false)) if c == ci => " ▼",
                                    _ => "",
                                };
                                let label = RichText::new(join!(caption, arrow)).strong();
                                if model.is_orderable(ci) {
                                    if ui.add(egui::Button::new(label).frame(false)).clicked() {
                                        sort_clicked = Some(ci);
                                    }
                                    ui.add(
                                        egui::TextEdit::singleline(&mut filters[ci])
                                            .hint_text(caption)
                                            .desired_width(f32::INFINITY),
                                    );
                                } else {
                                    ui.label(label);
                                }
                            });
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, model.visible.len(), |mut row| {
                        let Some(&ri) = model.visible.get(row.index()) else { return };
                        let Some(cells) = model.view.rows.get(ri) else { return };
                        for frag in cells.iter().take(cols) {
                            row.col(|ui| {
                                ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                    draw_fragment(ui, frag);
                                });
                            });
                        }
                    });
                });
        });

    for (ci, text) in filters.iter().enumerate() {
        if text != app.model.search.column_text(ci) {
            app.model.set_column_search(ci, text);
            logd!("UI: column {} search → {:?} ({} rows)", ci, text, app.model.visible.len());
        }
    }
    if let Some(ci) = sort_clicked {
        app.model.toggle_sort(ci);
        app.state.gui.sort = app.model.sort();
        logd!("UI: sort → {:?}", app.state.gui.sort);
    }
}

fn draw_fragment(ui: &mut egui::Ui, frag: &Fragment) {
    match frag {
        Fragment::Text(t) => {
            ui.label(t);
        }
        Fragment::Link(l) => {
            let url = match l.scope {
                LinkScope::Internal if l.href.starts_with('/') => join!(WIKI_ORIGIN, &l.href),
                _ => l.href.clone(),
            };
            ui.hyperlink_to(&l.label, url).on_hover_text(&l.title);
        }
        Fragment::Seq(parts) => {
            ui.spacing_mut().item_spacing.x = 0.0;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    ui.label(", ");
                }
                draw_fragment(ui, part);
            }
        }
    }
}
