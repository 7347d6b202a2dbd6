use eframe::egui::Color32;
use palette::{Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed two-stop color ramps for the raster layers
// ---------------------------------------------------------------------------

/// The mean-index layer ramp. Fixed regardless of inputs.
pub const MEAN_RAMP: Ramp = Ramp {
    stops: [Color32::WHITE, Color32::from_rgb(0, 128, 0)],
};

/// The blooming-hotspot layer ramp. Fixed regardless of inputs.
pub const BLOOM_RAMP: Ramp = Ramp {
    stops: [Color32::from_rgb(255, 255, 0), Color32::from_rgb(255, 0, 0)],
};

/// A linear two-stop color ramp. Stop 0 maps to the display minimum, stop 1
/// to the display maximum; the service stretches values in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    stops: [Color32; 2],
}

impl Ramp {
    /// Hex RGB stops for the render request payload.
    pub fn hex_stops(&self) -> [String; 2] {
        let hex = |c: Color32| format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b());
        [hex(self.stops[0]), hex(self.stops[1])]
    }

    /// Interpolated color at `t` in [0, 1], mixed in linear light. Used for
    /// the on-screen legend; the service applies the same stops server-side.
    pub fn color_at(&self, t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let lin = |c: Color32| {
            Srgb::new(
                c.r() as f32 / 255.0,
                c.g() as f32 / 255.0,
                c.b() as f32 / 255.0,
            )
            .into_linear()
        };
        let mixed = lin(self.stops[0]).mix(lin(self.stops[1]), t);
        let srgb: Srgb<f32> = Srgb::from_linear(mixed);
        Color32::from_rgb(
            (srgb.red * 255.0).round() as u8,
            (srgb.green * 255.0).round() as u8,
            (srgb.blue * 255.0).round() as u8,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_are_white_green_and_yellow_red() {
        assert_eq!(MEAN_RAMP.hex_stops(), ["#ffffff".to_string(), "#008000".to_string()]);
        assert_eq!(BLOOM_RAMP.hex_stops(), ["#ffff00".to_string(), "#ff0000".to_string()]);
    }

    #[test]
    fn ramp_endpoints_hit_the_stops() {
        assert_eq!(MEAN_RAMP.color_at(0.0), Color32::WHITE);
        assert_eq!(MEAN_RAMP.color_at(1.0), Color32::from_rgb(0, 128, 0));
        assert_eq!(BLOOM_RAMP.color_at(0.0), Color32::from_rgb(255, 255, 0));
        assert_eq!(BLOOM_RAMP.color_at(1.0), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn out_of_range_t_clamps() {
        assert_eq!(MEAN_RAMP.color_at(-1.0), MEAN_RAMP.color_at(0.0));
        assert_eq!(MEAN_RAMP.color_at(2.0), MEAN_RAMP.color_at(1.0));
    }
}
