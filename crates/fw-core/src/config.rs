//! Router configuration.
//!
//! Typically loaded from a JSON file by the application crate and handed to
//! the engine.  Every field has a default, so `{}` is a valid document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, GeoPoint, WayId};

// ── ServiceArea ───────────────────────────────────────────────────────────────

/// Fixed circular area the map is limited to.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl ServiceArea {
    pub fn new(center: GeoPoint, radius_km: f64) -> Self {
        Self { center, radius_km }
    }

    /// `true` if `p` lies within `radius_km` of the center (inclusive).
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.center.distance_km(p) <= self.radius_km
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self {
            center:    GeoPoint::new(16.073128, 108.224769),
            radius_km: 2.0,
        }
    }
}

// ── HeuristicKind ─────────────────────────────────────────────────────────────

/// A* remaining-cost estimate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Straight-line distance divided by the fastest speed in the network,
    /// in minutes.  Never overestimates, so routes are time-optimal.
    #[default]
    TimeLowerBound,
    /// Raw straight-line kilometres added to a cost in minutes.  Not
    /// admissible; kept for reproducing legacy routes.
    Distance,
}

// ── RouterConfig ──────────────────────────────────────────────────────────────

/// Top-level router configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Area to which route endpoints (and ingested geometry) are limited.
    /// `None` disables the check.
    pub area: Option<ServiceArea>,

    /// Speed used when a road's class is missing from the mode's table.
    pub fallback_speed_kmh: f64,

    /// Upper bound on A* node expansions.  Hitting it is reported as "no
    /// route", never as a fault.
    pub max_search_steps: usize,

    pub heuristic: HeuristicKind,

    /// Flood-status polling cadence in milliseconds.
    pub flood_poll_interval_ms: u64,

    /// Roads blocked while the flood feed reports "flooded".
    pub flood_ways: Vec<WayId>,

    /// Water level (cm) strictly above which a sensor reading means flooded.
    pub flood_threshold_cm: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            area:                   Some(ServiceArea::default()),
            fallback_speed_kmh:     10.0,
            max_search_steps:       1_000_000,
            heuristic:              HeuristicKind::default(),
            flood_poll_interval_ms: 3_000,
            flood_ways:             vec![WayId(1_279_915_923)],
            flood_threshold_cm:     1.5,
        }
    }
}

impl RouterConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> CoreResult<Self> {
        let config: RouterConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("loaded router config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would make routing undefined.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.fallback_speed_kmh.is_finite() && self.fallback_speed_kmh > 0.0) {
            return Err(CoreError::Config(format!(
                "fallback_speed_kmh must be positive, got {}",
                self.fallback_speed_kmh
            )));
        }
        if self.max_search_steps == 0 {
            return Err(CoreError::Config("max_search_steps must be at least 1".into()));
        }
        if let Some(area) = &self.area {
            if !area.center.is_finite() {
                return Err(CoreError::Config(format!("area center {} is not finite", area.center)));
            }
            if !(area.radius_km.is_finite() && area.radius_km > 0.0) {
                return Err(CoreError::Config(format!(
                    "area radius_km must be positive, got {}",
                    area.radius_km
                )));
            }
        }
        if self.flood_poll_interval_ms == 0 {
            return Err(CoreError::Config("flood_poll_interval_ms must be at least 1".into()));
        }
        Ok(())
    }

    /// Flood polling cadence as a `Duration`.
    pub fn flood_poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.flood_poll_interval_ms)
    }
}
