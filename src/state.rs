use chrono::NaiveDate;
use eframe::egui;

use crate::color;
use crate::data::bloom::{self, BloomCollection};
use crate::data::model::{
    BoundingBox, DateRange, IndexScale, ModelError, RegionChoice, VegIndex, DATASET,
};
use crate::export::{self, TimelapseExport};
use crate::remote::collection::CollectionQuery;
use crate::remote::config::ServiceConfig;
use crate::remote::error::{Result as ServiceResult, ServiceError};
use crate::remote::session::Session;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The inputs a map refresh is keyed by. Remote work only happens when the
/// submitted params differ from the ones the cached layers were built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryParams {
    pub bounds: BoundingBox,
    pub dates: DateRange,
    pub index: VegIndex,
}

/// Server-rendered layers for one set of params, decoded into GPU textures.
pub struct MapLayers {
    pub params: QueryParams,
    pub frame_count: usize,
    pub bloom_count: usize,
    pub mean_texture: egui::TextureHandle,
    /// None when the collection has fewer than two frames, so there are no
    /// consecutive pairs to difference.
    pub bloom_texture: Option<egui::TextureHandle>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ServiceConfig,
    session: Option<Session>,

    // widget inputs
    pub region_choice: RegionChoice,
    pub custom_west: f64,
    pub custom_south: f64,
    pub custom_east: f64,
    pub custom_north: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub index_choice: VegIndex,

    // fetched results, cached until the inputs change
    pub layers: Option<MapLayers>,
    pub timelapse: Option<TimelapseExport>,

    /// Error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            session: None,
            region_choice: RegionChoice::California,
            custom_west: -120.0,
            custom_south: 30.0,
            custom_east: -110.0,
            custom_north: 40.0,
            // the MODIS growing-season window the app opens on
            start_date: NaiveDate::from_ymd_opt(2023, 4, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2023, 7, 31).expect("valid date"),
            index_choice: VegIndex::Ndvi,
            layers: None,
            timelapse: None,
            status_message: None,
        }
    }

    /// The effective bounding box: preset table entry, or the four custom
    /// inputs validated in (west, south, east, north) order.
    pub fn bounds(&self) -> Result<BoundingBox, ModelError> {
        match self.region_choice.preset() {
            Some(bounds) => Ok(bounds),
            None => BoundingBox::new(
                self.custom_west,
                self.custom_south,
                self.custom_east,
                self.custom_north,
            ),
        }
    }

    /// Validate all inputs. Nothing downstream runs when this fails.
    pub fn params(&self) -> Result<QueryParams, ModelError> {
        let bounds = self.bounds()?;
        let dates = DateRange::new(self.start_date, self.end_date)?;
        Ok(QueryParams {
            bounds,
            dates,
            index: self.index_choice,
        })
    }

    /// Refresh the map layers for the current inputs. No-op when the cached
    /// layers already match; only the changed stage recomputes.
    pub fn update_map(&mut self, ctx: &egui::Context) {
        self.status_message = None;
        let params = match self.params() {
            Ok(params) => params,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };
        if self.layers.as_ref().is_some_and(|l| l.params == params) {
            return;
        }

        if let Err(e) = self.ensure_session() {
            self.status_message = Some(e.to_string());
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };

        match fetch_layers(session, &params, ctx) {
            Ok(layers) => {
                log::info!(
                    "rendered {} frames, {} blooming events",
                    layers.frame_count,
                    layers.bloom_count
                );
                self.layers = Some(layers);
            }
            Err(e) => {
                log::error!("map refresh failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Export and display the timelapse animation for the current inputs.
    pub fn export_timelapse(&mut self, ctx: &egui::Context) {
        self.status_message = None;
        let params = match self.params() {
            Ok(params) => params,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        if let Err(e) = self.ensure_session() {
            self.status_message = Some(e.to_string());
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let query = build_query(&params);
        match export::export_timelapse(session, &query, params.index) {
            Ok(exported) => {
                // drop any previously loaded animation under the same URI
                ctx.forget_image(&exported.uri);
                self.timelapse = Some(exported);
            }
            Err(e) => {
                log::error!("timelapse export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Close the service session. Called once on app exit.
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }

    fn ensure_session(&mut self) -> ServiceResult<()> {
        if self.session.is_none() {
            self.session = Some(Session::connect(&self.config)?);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Remote refresh pipeline
// ---------------------------------------------------------------------------

fn build_query(params: &QueryParams) -> CollectionQuery {
    CollectionQuery::new(DATASET)
        .filter_date(params.dates)
        .filter_bounds(params.bounds)
        .select(params.index)
}

fn fetch_layers(
    session: &Session,
    params: &QueryParams,
    ctx: &egui::Context,
) -> ServiceResult<MapLayers> {
    let query = build_query(params);
    let blooms: BloomCollection = bloom::detect_blooming(session, &query, IndexScale::BLOOM_DELTA)?;

    let mean_png = session.render_mean(&query, IndexScale::DISPLAY_RANGE, &color::MEAN_RAMP)?;
    let mean_texture = texture_from_png(ctx, "layer_mean", &mean_png)?;

    // a mean over zero bloom frames is undefined server-side; skip the layer
    let bloom_texture = if blooms.is_empty() {
        None
    } else {
        let png = session.render_bloom_mean(&blooms, IndexScale::DISPLAY_RANGE, &color::BLOOM_RAMP)?;
        Some(texture_from_png(ctx, "layer_bloom", &png)?)
    };

    Ok(MapLayers {
        params: *params,
        frame_count: blooms.source_len,
        bloom_count: blooms.len(),
        mean_texture,
        bloom_texture,
    })
}

fn texture_from_png(
    ctx: &egui::Context,
    name: &str,
    bytes: &[u8],
) -> ServiceResult<egui::TextureHandle> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ServiceError::MalformedResponse(format!("render is not an image: {e}")))?
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
    Ok(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_dates_halt_before_any_query_is_built() {
        let mut state = AppState::new(ServiceConfig::default());
        state.start_date = NaiveDate::from_ymd_opt(2023, 7, 31).unwrap();
        state.end_date = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        assert!(matches!(state.params(), Err(ModelError::DateOrder { .. })));
    }

    #[test]
    fn custom_region_flows_through_in_entry_order() {
        let mut state = AppState::new(ServiceConfig::default());
        state.region_choice = RegionChoice::Custom;
        let params = state.params().unwrap();
        assert_eq!(
            (
                params.bounds.west,
                params.bounds.south,
                params.bounds.east,
                params.bounds.north
            ),
            (-120.0, 30.0, -110.0, 40.0)
        );
    }

    #[test]
    fn scenario_california_ndvi_query() {
        let state = AppState::new(ServiceConfig::default());
        let params = state.params().unwrap();
        let json = serde_json::to_value(build_query(&params)).unwrap();
        assert_eq!(json["dataset"], "MODIS/006/MOD13A2");
        assert_eq!(json["band"], "NDVI");
        assert_eq!(json["start_date"], "2023-04-01");
        assert_eq!(json["end_date"], "2023-07-31");
        assert_eq!(json["bounds"]["west"], -124.4);

        let (lat, lon) = params.bounds.centroid();
        assert!((lat - 37.25).abs() < 1e-9);
        assert!((lon - -119.25).abs() < 1e-9);
    }
}
