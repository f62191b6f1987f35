use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, used by the haversine distance.
const EARTH_RADIUS: f64 = 6378137.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Calculates the distance to another LatLng in meters using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A single reported geographic position with accuracy and timestamp.
///
/// Immutable once created; fixes are compared only by reported accuracy
/// (lower is better) and recency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub coord: LatLng,
    /// Reported horizontal accuracy in meters; providers may omit it.
    pub accuracy_m: Option<f64>,
    /// Acquisition time in unix-epoch milliseconds.
    pub timestamp_ms: i64,
}

impl GeoFix {
    pub fn new(lat: f64, lng: f64, accuracy_m: Option<f64>, timestamp_ms: i64) -> Self {
        Self {
            coord: LatLng::new(lat, lng),
            accuracy_m,
            timestamp_ms,
        }
    }

    /// Validates the coordinate and, when present, the accuracy value
    pub fn is_valid(&self) -> bool {
        self.coord.is_valid()
            && self
                .accuracy_m
                .map(|a| a.is_finite() && a >= 0.0)
                .unwrap_or(true)
    }

    /// Age of this fix relative to `now_ms`
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp_ms
    }

    /// Whether the reported accuracy is at or below `ceiling_m`.
    /// A missing accuracy never meets any ceiling.
    pub fn meets_accuracy(&self, ceiling_m: f64) -> bool {
        matches!(self.accuracy_m, Some(a) if a.is_finite() && a <= ceiling_m)
    }

    fn effective_accuracy(&self) -> f64 {
        // Missing or non-finite accuracy counts as worst-possible
        self.accuracy_m
            .filter(|a| a.is_finite())
            .unwrap_or(f64::INFINITY)
    }
}

/// Picks the fix with the better (lower) reported accuracy.
///
/// `b` wins only if its accuracy is strictly better than `a`'s, so the
/// selection agrees for strictly ordered pairs regardless of argument order.
pub fn pick_better(a: GeoFix, b: GeoFix) -> GeoFix {
    if a.effective_accuracy() <= b.effective_accuracy() {
        a
    } else {
        b
    }
}

/// A request to move the map's viewport.
///
/// Ephemeral: not persisted, consumed once by the map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub center: LatLng,
    /// Target zoom; `None` keeps the renderer's current zoom.
    pub zoom: Option<f64>,
    pub animation_ms: u64,
}

impl CameraTarget {
    pub fn new(center: LatLng) -> Self {
        Self {
            center,
            zoom: None,
            animation_ms: 0,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn animated(mut self, animation_ms: u64) -> Self {
        self.animation_ms = animation_ms;
        self
    }
}

/// A viewport snapshot: where the map is actually centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: Option<f64>,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: Option<f64>) -> Self {
        Self { center, zoom }
    }
}
