//! Road records and tag interpretation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fw_core::{GeoPoint, WayId};

const MPH_TO_KMH: f64 = 1.609_344;

// ── RawRoad ───────────────────────────────────────────────────────────────────

/// One road as ingested: stable id, ordered geometry, and raw tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRoad {
    pub id: WayId,
    pub points: Vec<GeoPoint>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl RawRoad {
    pub fn new(id: u64, points: Vec<GeoPoint>) -> Self {
        Self { id: WayId(id), points, tags: BTreeMap::new() }
    }

    /// Builder-style tag insertion, mostly for tests and synthetic networks.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_owned(), value.to_owned());
        self
    }
}

// ── OneWay ────────────────────────────────────────────────────────────────────

/// Direction(s) in which a road may be traversed, relative to its geometry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OneWay {
    /// Bidirectional.
    #[default]
    None,
    /// Only in geometry order.
    Forward,
    /// Only against geometry order.
    Backward,
}

impl OneWay {
    /// `oneway=yes|1` is forward, `oneway=-1` is backward, anything else
    /// (including an absent tag) is bidirectional.
    pub fn from_tag(value: Option<&str>) -> Self {
        match value {
            Some("yes" | "1") => OneWay::Forward,
            Some("-1")        => OneWay::Backward,
            _                 => OneWay::None,
        }
    }
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// A road in the graph's road arena.  Every edge produced from this road
/// refers to it by `RoadId`.
///
/// The blocked flag is not stored here: it lives in
/// [`BlockingRegistry`](crate::BlockingRegistry), indexed by the same
/// `RoadId`, so the record itself is immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Road {
    pub way: WayId,
    pub tags: BTreeMap<String, String>,
    pub oneway: OneWay,
    /// Parsed `maxspeed` in km/h; only positive values are kept.
    pub maxspeed_kmh: Option<f64>,
}

impl Road {
    pub fn from_tags(way: WayId, tags: BTreeMap<String, String>) -> Self {
        let oneway = OneWay::from_tag(tags.get("oneway").map(String::as_str));
        let maxspeed_kmh = tags.get("maxspeed").and_then(|v| parse_maxspeed(v));
        Self { way, tags, oneway, maxspeed_kmh }
    }

    /// The `highway=*` classification, if tagged.
    #[inline]
    pub fn highway(&self) -> Option<&str> {
        self.tags.get("highway").map(String::as_str)
    }
}

/// Parse an OSM `maxspeed` value into km/h.
///
/// Takes the leading integer (`"45"`, `"50;30"`, `"60 km/h"`), converting
/// when followed by `mph`.  Non-numeric values such as `"none"` or
/// `"signals"` and zero yield `None`.
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let digits_end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(i, _)| i);
    let value: u32 = raw[..digits_end].parse().ok()?;
    if value == 0 {
        return None;
    }
    let kmh = if raw[digits_end..].trim_start().starts_with("mph") {
        value as f64 * MPH_TO_KMH
    } else {
        value as f64
    };
    Some(kmh)
}
