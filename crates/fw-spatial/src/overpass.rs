//! Overpass API JSON ingestion.
//!
//! # Usage
//!
//! ```ignore
//! use fw_spatial::overpass;
//!
//! let roads = overpass::read_overpass(Path::new("danang.json"), Some(&area))?;
//! let graph: RoadGraph = roads.into_iter().collect();
//! ```
//!
//! # What is loaded
//!
//! Every `way` element that carries inline geometry (`out geom tags`).
//! Geometry is clipped to the service area point by point, the way the map
//! limits itself to a fixed radius; ways left with fewer than two points are
//! dropped.  Fetching the document is the caller's business;
//! [`overpass_query`] only produces the query text.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use fw_core::{GeoPoint, ServiceArea, WayId};

use crate::{RawRoad, SpatialResult};

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: u64,
    // Overpass emits `null` for way nodes it could not resolve.
    #[serde(default)]
    geometry: Option<Vec<Option<OverpassPoint>>>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Deserialize, Copy, Clone)]
struct OverpassPoint {
    lat: f64,
    lon: f64,
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Parse an Overpass JSON document into roads ready for the graph builder.
pub fn parse_overpass(json: &str, area: Option<&ServiceArea>) -> SpatialResult<Vec<RawRoad>> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    let total = response.elements.len();

    let roads: Vec<RawRoad> = response
        .elements
        .into_iter()
        .filter(|el| el.kind == "way")
        .filter_map(|el| {
            let geometry = el.geometry?;
            let points: Vec<GeoPoint> = geometry
                .into_iter()
                .flatten()
                .map(|p| GeoPoint::new(p.lat, p.lon))
                .collect();
            let points = match area {
                Some(area) => clip_to_area(&points, area),
                None => points,
            };
            if points.len() < 2 {
                return None;
            }
            Some(RawRoad { id: WayId(el.id), points, tags: el.tags })
        })
        .collect();

    log::info!("overpass: kept {} of {} elements as roads", roads.len(), total);
    Ok(roads)
}

/// Read and parse an Overpass JSON file.
pub fn read_overpass(path: &Path, area: Option<&ServiceArea>) -> SpatialResult<Vec<RawRoad>> {
    let text = std::fs::read_to_string(path)?;
    parse_overpass(&text, area)
}

/// Keep only the points within the area's radius, preserving order.
pub fn clip_to_area(points: &[GeoPoint], area: &ServiceArea) -> Vec<GeoPoint> {
    points.iter().copied().filter(|p| area.contains(*p)).collect()
}

/// Overpass QL selecting every `highway=*` way around the area.
pub fn overpass_query(area: &ServiceArea) -> String {
    format!(
        "[out:json];\n(\n  way[\"highway\"](around:{},{},{});\n);\nout geom tags;\n",
        area.radius_km * 1000.0,
        area.center.lat,
        area.center.lon,
    )
}
