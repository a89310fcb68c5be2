//! Travel mode enum shared by the speed model, router, and engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The means by which a route is travelled.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Private motor vehicle.  The only mode that honours `maxspeed` tags.
    #[default]
    Car,
    /// Bicycle.
    Bike,
    /// On foot.
    Foot,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Car, TravelMode::Bike, TravelMode::Foot];

    /// `true` for the motorized mode.
    #[inline]
    pub fn is_motorized(self) -> bool {
        matches!(self, TravelMode::Car)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Car  => "car",
            TravelMode::Bike => "bike",
            TravelMode::Foot => "foot",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" | "drive"          => Ok(TravelMode::Car),
            "bike" | "bicycle"       => Ok(TravelMode::Bike),
            "foot" | "walk"          => Ok(TravelMode::Foot),
            other => Err(CoreError::Parse(format!("unknown travel mode `{other}`"))),
        }
    }
}
