use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::model::{RegionChoice, VegIndex};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – query controls
// ---------------------------------------------------------------------------

/// Render the query control panel.
pub fn control_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Query");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Region ----
            ui.strong("Region");
            egui::ComboBox::from_id_salt("region")
                .selected_text(state.region_choice.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in RegionChoice::ALL {
                        if ui
                            .selectable_label(state.region_choice == choice, choice.label())
                            .clicked()
                        {
                            state.region_choice = choice;
                        }
                    }
                });

            if state.region_choice == RegionChoice::Custom {
                bounded_input(ui, "West longitude", &mut state.custom_west, -180.0..=180.0);
                bounded_input(ui, "South latitude", &mut state.custom_south, -90.0..=90.0);
                bounded_input(ui, "East longitude", &mut state.custom_east, -180.0..=180.0);
                bounded_input(ui, "North latitude", &mut state.custom_north, -90.0..=90.0);
            }
            ui.separator();

            // ---- Dates ----
            ui.strong("Date range");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Start");
                ui.add(DatePickerButton::new(&mut state.start_date).id_salt("start_date"));
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("End");
                ui.add(DatePickerButton::new(&mut state.end_date).id_salt("end_date"));
            });
            ui.separator();

            // ---- Index ----
            ui.strong("Vegetation index");
            egui::ComboBox::from_id_salt("index")
                .selected_text(state.index_choice.band_name())
                .show_ui(ui, |ui: &mut Ui| {
                    for index in VegIndex::ALL {
                        if ui
                            .selectable_label(state.index_choice == index, index.band_name())
                            .clicked()
                        {
                            state.index_choice = index;
                        }
                    }
                });
            ui.separator();

            // ---- Actions ----
            if ui.button("Update map").clicked() {
                state.update_map(ui.ctx());
            }
            if ui.button("Show timelapse animation").clicked() {
                state.export_timelapse(ui.ctx());
            }

            if let Some(timelapse) = &state.timelapse {
                ui.add_space(4.0);
                ui.add(
                    egui::Image::from_bytes(
                        timelapse.uri.clone(),
                        egui::load::Bytes::Shared(timelapse.bytes.clone()),
                    )
                    .max_width(ui.available_width()),
                );
                ui.label(format!(
                    "{} timelapse animation ({})",
                    state.index_choice.band_name(),
                    timelapse.path.display()
                ));
            }
        });
}

fn bounded_input(ui: &mut Ui, label: &str, value: &mut f64, range: RangeInclusive<f64>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(
            egui::DragValue::new(value)
                .range(range)
                .speed(0.1)
                .fixed_decimals(1),
        );
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: title, result counts, and any error message.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Global Plant Blooming Explorer");
        ui.separator();
        ui.label("Explore global plant blooming with NASA MODIS NDVI/EVI composites.");

        if let Some(layers) = &state.layers {
            ui.separator();
            ui.label(format!(
                "{} frames, {} blooming events",
                layers.frame_count, layers.bloom_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Right side panel – about
// ---------------------------------------------------------------------------

/// Render the educational panel.
pub fn about_panel(ui: &mut Ui) {
    ui.heading("About this app");
    ui.separator();

    ui.label("NDVI/EVI: satellite vegetation indices showing plant greenness and health.");
    ui.label("Blooming detection: sudden index rises mark leaf-out or bloom.");
    ui.label("Satellite data: NASA MODIS 16-day composites balance detail and revisit frequency.");
    ui.label("Timelapse: shows seasonal vegetation changes and phenology.");
    ui.label("Phenology: climate-driven seasonal plant and animal life cycle events.");

    ui.add_space(4.0);
    ui.hyperlink_to(
        "Learn more about phenology",
        "https://en.wikipedia.org/wiki/Phenology",
    );
}
