use eframe::egui;

use crate::remote::config::ServiceConfig;
use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BloomWatchApp {
    pub state: AppState,
}

impl BloomWatchApp {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for BloomWatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: query controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::control_panel(ui, &mut self.state);
            });

        // ---- Right side panel: about ----
        egui::SidePanel::right("about_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::about_panel(ui);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::map_view(ui, &self.state);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
