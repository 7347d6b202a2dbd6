mod app;
mod color;
mod data;
mod export;
mod remote;
mod state;
mod ui;

use std::path::Path;

use app::BloomWatchApp;
use eframe::egui;
use remote::config::ServiceConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ServiceConfig::load_or_default(Path::new("bloomwatch.json"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Plant Blooming Explorer",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the timelapse gif.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(BloomWatchApp::new(config)))
        }),
    )
}
