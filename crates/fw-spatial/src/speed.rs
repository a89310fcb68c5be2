//! Per-mode travel speed model.
//!
//! | Class          | Car | Bike | Foot |
//! |----------------|-----|------|------|
//! | motorway       | 80  |      |      |
//! | trunk          | 70  |      |      |
//! | primary        | 60  | 20   |      |
//! | secondary      | 50  | 18   |      |
//! | tertiary       | 40  | 16   |      |
//! | residential    | 30  | 15   | 4    |
//! | service        | 20  | 12   | 4    |
//! | unclassified   | 40  | 15   | 4    |
//! | cycleway       |     | 20   |      |
//! | footway        |     |      | 5    |
//! | pedestrian     |     |      | 5    |
//! | path           |     |      | 5    |
//!
//! Anything not in a mode's column travels at the fallback speed.

use rustc_hash::FxHashMap;

use fw_core::TravelMode;

use crate::{Road, SpatialError, SpatialResult};

const CAR: &[(&str, f64)] = &[
    ("motorway", 80.0),
    ("trunk", 70.0),
    ("primary", 60.0),
    ("secondary", 50.0),
    ("tertiary", 40.0),
    ("residential", 30.0),
    ("service", 20.0),
    ("unclassified", 40.0),
];

const BIKE: &[(&str, f64)] = &[
    ("primary", 20.0),
    ("secondary", 18.0),
    ("tertiary", 16.0),
    ("residential", 15.0),
    ("service", 12.0),
    ("cycleway", 20.0),
    ("unclassified", 15.0),
];

const FOOT: &[(&str, f64)] = &[
    ("footway", 5.0),
    ("pedestrian", 5.0),
    ("path", 5.0),
    ("residential", 4.0),
    ("service", 4.0),
    ("unclassified", 4.0),
];

pub const DEFAULT_FALLBACK_KMH: f64 = 10.0;

/// Travel speeds in km/h by `(mode, highway class)`.
///
/// Every stored speed, including the fallback, is finite and positive, so
/// [`speed_kmh`](Self::speed_kmh) never returns a value ≤ 0.
#[derive(Clone, Debug)]
pub struct SpeedTable {
    by_mode:      [FxHashMap<String, f64>; 3],
    fallback_kmh: f64,
}

impl SpeedTable {
    /// An empty table: every road travels at `fallback_kmh`.
    pub fn empty(fallback_kmh: f64) -> SpatialResult<Self> {
        check_speed(TravelMode::Car, "<fallback>", fallback_kmh)?;
        Ok(Self {
            by_mode: Default::default(),
            fallback_kmh,
        })
    }

    /// The standard urban table with the given fallback speed.
    pub fn standard(fallback_kmh: f64) -> SpatialResult<Self> {
        let mut table = Self::empty(fallback_kmh)?;
        for (mode, rows) in [(TravelMode::Car, CAR), (TravelMode::Bike, BIKE), (TravelMode::Foot, FOOT)] {
            for &(class, kmh) in rows {
                table.set(mode, class, kmh)?;
            }
        }
        Ok(table)
    }

    /// Set the speed for `class` under `mode`.
    pub fn set(&mut self, mode: TravelMode, class: &str, kmh: f64) -> SpatialResult<()> {
        check_speed(mode, class, kmh)?;
        self.by_mode[slot(mode)].insert(class.to_owned(), kmh);
        Ok(())
    }

    /// Table entry for `(mode, class)`, without fallback.
    pub fn lookup(&self, mode: TravelMode, class: &str) -> Option<f64> {
        self.by_mode[slot(mode)].get(class).copied()
    }

    pub fn fallback_kmh(&self) -> f64 {
        self.fallback_kmh
    }

    /// Traversal speed of `road` for `mode`.
    ///
    /// A declared `maxspeed` wins for the motorized mode; otherwise the
    /// class lookup, otherwise the fallback.
    pub fn speed_kmh(&self, road: &Road, mode: TravelMode) -> f64 {
        if mode.is_motorized() {
            if let Some(kmh) = road.maxspeed_kmh {
                return kmh;
            }
        }
        road.highway()
            .and_then(|class| self.lookup(mode, class))
            .unwrap_or(self.fallback_kmh)
    }

    /// Minutes to travel `length_km` along `road`.
    #[inline]
    pub fn traversal_min(&self, road: &Road, length_km: f64, mode: TravelMode) -> f64 {
        length_km / self.speed_kmh(road, mode) * 60.0
    }

    /// Fastest speed any table entry (or the fallback) allows for `mode`.
    /// Declared `maxspeed` values are not included.
    pub fn max_table_kmh(&self, mode: TravelMode) -> f64 {
        self.by_mode[slot(mode)]
            .values()
            .copied()
            .fold(self.fallback_kmh, f64::max)
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self::standard(DEFAULT_FALLBACK_KMH).expect("built-in speed table is valid")
    }
}

#[inline]
fn slot(mode: TravelMode) -> usize {
    match mode {
        TravelMode::Car  => 0,
        TravelMode::Bike => 1,
        TravelMode::Foot => 2,
    }
}

fn check_speed(mode: TravelMode, class: &str, kmh: f64) -> SpatialResult<()> {
    if kmh.is_finite() && kmh > 0.0 {
        Ok(())
    } else {
        Err(SpatialError::InvalidSpeed { mode, class: class.to_owned(), kmh })
    }
}
