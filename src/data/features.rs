//! Opaque point features for on-map markers (heritage sites, metro stations).
//!
//! The crate does not interpret feature payloads; it only needs a valid
//! point geometry to center the camera on when a marker is tapped.
//! Properties stay as free-form JSON for the UI layer to render.

use crate::core::geo::LatLng;
use crate::Result;
use serde::{Deserialize, Serialize};

/// GeoJSON geometry, reduced to what marker layers carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureGeometry {
    Point { coordinates: [f64; 2] },
}

/// A single GeoJSON feature with geometry and opaque properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<FeatureGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
}

/// Root GeoJSON object for marker data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureDocument {
    Feature(RawFeature),
    FeatureCollection { features: Vec<RawFeature> },
}

/// A tappable on-map point with its display payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    pub id: Option<String>,
    pub center: LatLng,
    pub properties: serde_json::Value,
}

impl PointFeature {
    fn from_raw(raw: RawFeature) -> Option<Self> {
        let FeatureGeometry::Point { coordinates } = raw.geometry?;
        // GeoJSON order is [lon, lat]
        let center = LatLng::new(coordinates[1], coordinates[0]);
        if !center.is_valid() {
            log::warn!("skipping point feature with invalid coordinates");
            return None;
        }
        Some(Self {
            id: raw.id.map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            center,
            properties: raw.properties.unwrap_or(serde_json::Value::Null),
        })
    }
}

/// Parses marker features from a raw GeoJSON string.
///
/// Features without a point geometry or with out-of-range coordinates are
/// skipped (and logged), not treated as errors; one bad row must not take
/// the whole layer down.
pub fn parse_point_features(geojson: &str) -> Result<Vec<PointFeature>> {
    let document: FeatureDocument = serde_json::from_str(geojson)?;

    let raw = match document {
        FeatureDocument::Feature(feature) => vec![feature],
        FeatureDocument::FeatureCollection { features } => features,
    };

    Ok(raw.into_iter().filter_map(PointFeature::from_raw).collect())
}
