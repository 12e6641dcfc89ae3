use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QuakeMapApp {
    pub state: AppState,
}

impl QuakeMapApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for QuakeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: data preview ----
        egui::TopBottomPanel::bottom("preview_panel")
            .default_height(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Data Preview");
                table::preview_table(ui, &self.state.frame.grid);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Map");
            map::event_map(ui, &mut self.state);
        });
    }
}
