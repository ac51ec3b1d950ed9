// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
    thread,
};

use eframe::egui;

use crate::{
    config::{
        profile::{LayeredProfile, Profile, SourceKind},
        state::AppState,
    },
    data::DataSource,
    render::{Layout, TableView},
    sources::{self, FetchError},
};

use super::table_model::TableModel;

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "OpenWrt Table of Hardware",
        options,
        Box::new(|cc| Ok(Box::new(App::new(AppState::default(), &cc.egui_ctx)))),
    )?;
    Ok(())
}

type Loaded = Arc<Mutex<Option<(SourceKind, Result<Arc<DataSource>, FetchError>)>>>;

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // current source + what the table shows
    pub data: Option<Arc<DataSource>>,
    pub model: TableModel,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    loaded: Loaded,
}

impl App {
    pub fn new(state: AppState, ctx: &egui::Context) -> Self {
        let out_path_text = state.options.export.out_path().to_string_lossy().into();

        let mut app = Self {
            state,
            out_path_text,
            out_path_dirty: false,
            data: None,
            model: TableModel::default(),
            status: Arc::new(Mutex::new(s!("Idle"))),
            running: false,
            loaded: Arc::new(Mutex::new(None)),
        };
        logf!("Init: source={}, profile={}", app.state.options.render.source.as_str(), app.state.gui.profile_name);
        app.fetch(ctx.clone());
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Profile from the side panel: built-in name, with the selected source on top.
    pub fn profile(&self) -> Profile {
        let mut lp = LayeredProfile::named(&self.state.gui.profile_name);
        lp.query.source = Some(self.state.options.render.source);
        lp.resolve()
    }

    pub fn layout(&self) -> Layout {
        Layout::from(&self.profile())
    }

    /// Load the selected source on a worker thread. The UI picks the result
    /// up in `poll_loaded`.
    pub fn fetch(&mut self, ctx: egui::Context) {
        if self.running {
            return;
        }
        let kind = self.state.options.render.source;
        let status = Arc::clone(&self.status);
        let loaded = Arc::clone(&self.loaded);
        self.running = true;
        self.status(format!("Fetching {} ...", kind.as_str()));

        thread::spawn(move || {
            let res = sources::global().load(kind);
            let msg = match &res {
                Ok(ds) => format!("Loaded {}: {} devices", kind.as_str(), ds.row_count()),
                Err(e) => format!("Error: {}", e),
            };
            if let Ok(mut s) = status.lock() {
                *s = msg;
            }
            if let Ok(mut slot) = loaded.lock() {
                *slot = Some((kind, res));
            }
            ctx.request_repaint();
        });
    }

    /// Drop every cached source and fetch again.
    pub fn reload(&mut self, ctx: egui::Context) {
        sources::global().invalidate();
        self.fetch(ctx);
    }

    fn poll_loaded(&mut self) {
        if !self.running {
            return;
        }
        let Some((kind, res)) = self.loaded.lock().ok().and_then(|mut slot| slot.take()) else {
            return;
        };
        self.running = false;
        match res {
            Ok(ds) if kind == self.state.options.render.source => {
                self.data = Some(ds);
                self.rebuild_view();
            }
            Ok(_) => logd!("UI: dropped stale {} load", kind.as_str()),
            Err(e) => {
                self.data = None;
                self.rebuild_view();
                loge!("UI: {}", e);
            }
        }
    }

    /// Rebuild the table from the current source and profile, keeping the
    /// global search and sort where they still apply.
    pub fn rebuild_view(&mut self) {
        let Some(ds) = self.data.as_ref() else {
            self.model = TableModel::default();
            return;
        };
        let profile = self.profile();
        let mut model = TableModel::new(TableView::build(ds, &profile));
        model.set_global_search(&self.state.gui.global_search);
        model.set_sort(self.state.gui.sort);
        logd!(
            "UI: view rebuilt ({} of {} rows, {} cols)",
            model.nrows(),
            ds.row_count(),
            model.ncols()
        );
        self.model = model;
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loaded();

        eframe::egui::SidePanel::left("source")
            .resizable(false)
            .show(ctx, |ui| {
                crate::gui::components::source_panel::draw(ui, self);
            });

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::search_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::export_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::data_table::draw(ui, self);
        });
    }
}
