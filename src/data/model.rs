use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Hosted dataset
// ---------------------------------------------------------------------------

/// Hosted image collection queried for every map refresh and export:
/// MODIS Terra 16-day vegetation index composites, 1 km resolution.
pub const DATASET: &str = "MODIS/006/MOD13A2";

// ---------------------------------------------------------------------------
// Input validation errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeRange(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeRange(f64),

    #[error("west edge {west} must be less than east edge {east}")]
    BoxEastWest { west: f64, east: f64 },

    #[error("south edge {south} must be less than north edge {north}")]
    BoxNorthSouth { south: f64, north: f64 },

    #[error("start date {start} must not be after end date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

// ---------------------------------------------------------------------------
// BoundingBox – longitude/latitude box in degrees
// ---------------------------------------------------------------------------

/// A geographic bounding box, (west, south, east, north) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Validate and build a box. Longitudes must lie in [-180, 180], latitudes
    /// in [-90, 90], and the edges must be properly ordered (west < east,
    /// south < north).
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ModelError> {
        for lon in [west, east] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ModelError::LongitudeRange(lon));
            }
        }
        for lat in [south, north] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ModelError::LatitudeRange(lat));
            }
        }
        if west >= east {
            return Err(ModelError::BoxEastWest { west, east });
        }
        if south >= north {
            return Err(ModelError::BoxNorthSouth { south, north });
        }
        Ok(BoundingBox {
            west,
            south,
            east,
            north,
        })
    }

    /// Center of the box as (latitude, longitude) – the map view centers here.
    pub fn centroid(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// Extent in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Extent in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

// ---------------------------------------------------------------------------
// Region presets
// ---------------------------------------------------------------------------

/// Region selector choices: two fixed presets plus a user-entered box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionChoice {
    California,
    Amazon,
    Custom,
}

impl RegionChoice {
    pub const ALL: [RegionChoice; 3] = [
        RegionChoice::California,
        RegionChoice::Amazon,
        RegionChoice::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegionChoice::California => "California",
            RegionChoice::Amazon => "Amazon",
            RegionChoice::Custom => "Custom",
        }
    }

    /// The static preset box, or `None` for `Custom`.
    pub fn preset(&self) -> Option<BoundingBox> {
        match self {
            RegionChoice::California => Some(BoundingBox {
                west: -124.4,
                south: 32.5,
                east: -114.1,
                north: 42.0,
            }),
            RegionChoice::Amazon => Some(BoundingBox {
                west: -74.0,
                south: -6.0,
                east: -54.0,
                north: 0.0,
            }),
            RegionChoice::Custom => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// An inclusive date range with start ≤ end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::DateOrder { start, end });
        }
        Ok(DateRange { start, end })
    }
}

// ---------------------------------------------------------------------------
// Vegetation index selection
// ---------------------------------------------------------------------------

/// The two selectable vegetation index bands of the MOD13A2 product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VegIndex {
    Ndvi,
    Evi,
}

impl VegIndex {
    pub const ALL: [VegIndex; 2] = [VegIndex::Ndvi, VegIndex::Evi];

    /// Band name as it appears in the hosted dataset.
    pub fn band_name(&self) -> &'static str {
        match self {
            VegIndex::Ndvi => "NDVI",
            VegIndex::Evi => "EVI",
        }
    }
}

impl std::fmt::Display for VegIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.band_name())
    }
}

// ---------------------------------------------------------------------------
// Index scale
// ---------------------------------------------------------------------------

/// Scale constants for the raw (non-normalized) MOD13A2 integer product.
/// NDVI/EVI are stored as index × 10000, so vegetated land spans roughly
/// 0..9000 on this scale. These values are not valid for other products.
pub struct IndexScale;

impl IndexScale {
    /// Strict lower bound on a frame-to-frame index rise that counts as a
    /// blooming event. A rise of exactly this value is not a bloom.
    pub const BLOOM_DELTA: i32 = 400;

    /// Fixed (min, max) stretch applied to both rendered map layers,
    /// regardless of region, dates, or index.
    pub const DISPLAY_RANGE: (i32, i32) = (0, 9000);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_boxes_match_static_table() {
        let ca = RegionChoice::California.preset().unwrap();
        assert_eq!(
            (ca.west, ca.south, ca.east, ca.north),
            (-124.4, 32.5, -114.1, 42.0)
        );

        let amazon = RegionChoice::Amazon.preset().unwrap();
        assert_eq!(
            (amazon.west, amazon.south, amazon.east, amazon.north),
            (-74.0, -6.0, -54.0, 0.0)
        );

        assert_eq!(RegionChoice::Custom.preset(), None);
    }

    #[test]
    fn custom_box_keeps_entry_order() {
        // (west, south, east, north) exactly as entered
        let b = BoundingBox::new(-120.0, 30.0, -110.0, 40.0).unwrap();
        assert_eq!(
            (b.west, b.south, b.east, b.north),
            (-120.0, 30.0, -110.0, 40.0)
        );
    }

    #[test]
    fn box_rejects_out_of_range_coordinates() {
        assert!(matches!(
            BoundingBox::new(-200.0, 0.0, 10.0, 10.0),
            Err(ModelError::LongitudeRange(_))
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 0.0, 200.0, 10.0),
            Err(ModelError::LongitudeRange(_))
        ));
        assert!(matches!(
            BoundingBox::new(0.0, -100.0, 10.0, 10.0),
            Err(ModelError::LatitudeRange(_))
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 0.0, 10.0, 100.0),
            Err(ModelError::LatitudeRange(_))
        ));
    }

    #[test]
    fn box_rejects_misordered_edges() {
        assert!(matches!(
            BoundingBox::new(10.0, 0.0, -10.0, 10.0),
            Err(ModelError::BoxEastWest { .. })
        ));
        assert!(matches!(
            BoundingBox::new(0.0, 10.0, 10.0, -10.0),
            Err(ModelError::BoxNorthSouth { .. })
        ));
    }

    #[test]
    fn california_centroid() {
        let ca = RegionChoice::California.preset().unwrap();
        let (lat, lon) = ca.centroid();
        assert!((lat - 37.25).abs() < 1e-9);
        assert!((lon - -119.25).abs() < 1e-9);
    }

    #[test]
    fn date_range_rejects_start_after_end() {
        let start = NaiveDate::from_ymd_opt(2023, 7, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        assert!(matches!(
            DateRange::new(start, end),
            Err(ModelError::DateOrder { .. })
        ));
        // equal dates are allowed
        assert!(DateRange::new(end, end).is_ok());
    }

    #[test]
    fn band_names() {
        assert_eq!(VegIndex::Ndvi.band_name(), "NDVI");
        assert_eq!(VegIndex::Evi.band_name(), "EVI");
        assert_eq!(VegIndex::Evi.to_string(), "EVI");
    }
}
