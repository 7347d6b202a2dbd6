use serde::Serialize;

use crate::data::bloom::{BloomCollection, BloomFrame};
use crate::data::model::{BoundingBox, DateRange, VegIndex};

// ---------------------------------------------------------------------------
// CollectionQuery – lazy handle over a server-side image collection
// ---------------------------------------------------------------------------

/// A filtered view of a hosted image collection. Purely local request
/// construction: nothing is sent to the service until one of the `Session`
/// materialize calls (`collection_size`, `render_*`) takes this handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionQuery {
    dataset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    band: Option<String>,
}

impl CollectionQuery {
    pub fn new(dataset: impl Into<String>) -> Self {
        CollectionQuery {
            dataset: dataset.into(),
            start_date: None,
            end_date: None,
            bounds: None,
            band: None,
        }
    }

    /// Keep only frames inside the date range.
    pub fn filter_date(mut self, range: DateRange) -> Self {
        self.start_date = Some(range.start);
        self.end_date = Some(range.end);
        self
    }

    /// Keep only frames intersecting the box; renders are clipped to it.
    pub fn filter_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Select a single band of the collection.
    pub fn select(mut self, index: VegIndex) -> Self {
        self.band = Some(index.band_name().to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Render / timelapse request payloads
// ---------------------------------------------------------------------------

/// Request for a server-rendered composite raster, clipped to the query
/// bounds: the mean of the raw frames, or, when `bloom_frames` is present,
/// the mean of those masked pairwise differences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub query: CollectionQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bloom_frames: Option<Vec<BloomFrame>>,
    pub min: i32,
    pub max: i32,
    /// Two-stop color ramp, hex RGB.
    pub palette: [String; 2],
}

impl RenderRequest {
    pub fn mean(query: CollectionQuery, (min, max): (i32, i32), palette: [String; 2]) -> Self {
        RenderRequest {
            query,
            bloom_frames: None,
            min,
            max,
            palette,
        }
    }

    pub fn bloom_mean(blooms: BloomCollection, (min, max): (i32, i32), palette: [String; 2]) -> Self {
        RenderRequest {
            query: blooms.query,
            bloom_frames: Some(blooms.frames),
            min,
            max,
            palette,
        }
    }
}

/// Request for a rendered animation over the full (band-selected) collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelapseRequest {
    pub query: CollectionQuery,
    pub fps: u8,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{self, IndexScale};
    use crate::data::bloom::pairwise_frames;
    use chrono::NaiveDate;

    fn california_query() -> CollectionQuery {
        let bounds = model::RegionChoice::California.preset().unwrap();
        let dates = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 7, 31).unwrap(),
        )
        .unwrap();
        CollectionQuery::new(model::DATASET)
            .filter_date(dates)
            .filter_bounds(bounds)
            .select(VegIndex::Ndvi)
    }

    #[test]
    fn query_payload_carries_all_filters() {
        let json = serde_json::to_value(california_query()).unwrap();
        assert_eq!(json["dataset"], "MODIS/006/MOD13A2");
        assert_eq!(json["start_date"], "2023-04-01");
        assert_eq!(json["end_date"], "2023-07-31");
        assert_eq!(json["band"], "NDVI");
        assert_eq!(json["bounds"]["west"], -124.4);
        assert_eq!(json["bounds"]["north"], 42.0);
    }

    #[test]
    fn unfiltered_query_serializes_dataset_only() {
        let json = serde_json::to_value(CollectionQuery::new(model::DATASET)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(json["dataset"], "MODIS/006/MOD13A2");
    }

    #[test]
    fn mean_render_request_has_no_bloom_frames() {
        let req = RenderRequest::mean(
            california_query(),
            IndexScale::DISPLAY_RANGE,
            ["#ffffff".to_string(), "#008000".to_string()],
        );
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("bloom_frames").is_none());
        assert_eq!(json["min"], 0);
        assert_eq!(json["max"], 9000);
    }

    #[test]
    fn bloom_render_request_carries_pairwise_frames() {
        let query = california_query();
        let blooms = BloomCollection {
            frames: pairwise_frames(4, IndexScale::BLOOM_DELTA),
            source_len: 4,
            query: query.clone(),
        };
        let req = RenderRequest::bloom_mean(
            blooms,
            IndexScale::DISPLAY_RANGE,
            ["#ffff00".to_string(), "#ff0000".to_string()],
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["bloom_frames"].as_array().unwrap().len(), 3);
        assert_eq!(json["query"]["band"], "NDVI");
    }
}
