use eframe::egui::{self, Sense, Ui, vec2};
use egui_plot::{Legend, Plot, PlotImage, PlotPoint};

use crate::color::{Ramp, BLOOM_RAMP, MEAN_RAMP};
use crate::data::model::{IndexScale, VegIndex};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map view (central panel)
// ---------------------------------------------------------------------------

/// Render the map in the central panel: the two server-rendered raster
/// layers centered on the region centroid, with pan/zoom.
pub fn map_view(ui: &mut Ui, state: &AppState) {
    let Some(layers) = &state.layers else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick a region and dates, then press Update map");
        });
        return;
    };

    // legend row above the plot
    ui.horizontal(|ui: &mut Ui| {
        ramp_legend(ui, &mean_layer_name(layers.params.index), &MEAN_RAMP);
        ui.separator();
        ramp_legend(ui, "Blooming Hotspots", &BLOOM_RAMP);
        ui.separator();
        let (min, max) = IndexScale::DISPLAY_RANGE;
        ui.label(format!("stretch {min} to {max}"));
        if layers.bloom_texture.is_none() {
            ui.separator();
            ui.label("No blooming events in this range.");
        }
    });

    let bounds = layers.params.bounds;
    let (lat, lon) = bounds.centroid();
    let center = PlotPoint::new(lon, lat);
    let size = vec2(bounds.width() as f32, bounds.height() as f32);

    Plot::new("map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(
                PlotImage::new(layers.mean_texture.id(), center, size)
                    .name(mean_layer_name(layers.params.index)),
            );
            if let Some(texture) = &layers.bloom_texture {
                plot_ui.image(
                    PlotImage::new(texture.id(), center, size).name("Blooming Hotspots"),
                );
            }
        });
}

fn mean_layer_name(index: VegIndex) -> String {
    format!("Mean {index}")
}

/// A small horizontal gradient swatch with its label.
fn ramp_legend(ui: &mut Ui, label: &str, ramp: &Ramp) {
    let (rect, _) = ui.allocate_exact_size(vec2(64.0, 12.0), Sense::hover());
    let painter = ui.painter();
    let steps = 16;
    let slice_width = rect.width() / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1) as f32;
        let slice = egui::Rect::from_min_size(
            rect.min + vec2(i as f32 * slice_width, 0.0),
            vec2(slice_width, rect.height()),
        );
        painter.rect_filled(slice, egui::CornerRadius::ZERO, ramp.color_at(t));
    }
    ui.label(label);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_layer_is_named_after_the_index() {
        assert_eq!(mean_layer_name(VegIndex::Ndvi), "Mean NDVI");
        assert_eq!(mean_layer_name(VegIndex::Evi), "Mean EVI");
    }
}
