// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    /// Built-in profile picked in the side panel
    pub profile_name: String,

    pub window_w: u32,
    pub window_h: u32,

    /// Column sort: (display index, ascending)
    pub sort: Option<(usize, bool)>,

    /// Global search box (independent of the per-column filter row)
    pub global_search: String,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            profile_name: s!("default"),
            window_w: 1200,
            window_h: 720,
            sort: None,
            global_search: s!(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
