//! Synthetic Đà Nẵng street grid used when no Overpass export is given.
//!
//! A 3 × 3 grid of ~600 m blocks centred on the default service area, with
//! one one-way street and the flood-prone riverside way carrying its real
//! OSM id so the flood feed has something to close.

use fw_core::GeoPoint;
use fw_spatial::RawRoad;

/// OSM id of the riverside street the flood feed closes by default.
pub const RIVERSIDE_WAY: u64 = 1_279_915_923;

const CENTER_LAT: f64 = 16.073128;
const CENTER_LON: f64 = 108.224769;
const STEP_DEG:   f64 = 0.0055; // ~600 m

fn grid(row: i32, col: i32) -> GeoPoint {
    GeoPoint::new(
        CENTER_LAT + row as f64 * STEP_DEG,
        CENTER_LON + col as f64 * STEP_DEG,
    )
}

/// Build the demo roads.
///
/// Returns `(roads, [south_west, north_east])`, two corners to route between.
pub fn build_roads() -> (Vec<RawRoad>, [GeoPoint; 2]) {
    let mut roads = Vec::new();
    let mut next_id = 1_000_u64;

    // East-west streets.
    for row in -1..=1 {
        let points = (-1..=1).map(|col| grid(row, col)).collect();
        let class = if row == 0 { "primary" } else { "residential" };
        roads.push(RawRoad::new(next_id, points).with_tag("highway", class));
        next_id += 1;
    }

    // North-south streets; the eastern one runs along the river.
    for col in -1..=1 {
        let points = (-1..=1).map(|row| grid(row, col)).collect();
        let road = if col == 1 {
            RawRoad::new(RIVERSIDE_WAY, points)
                .with_tag("highway", "secondary")
                .with_tag("maxspeed", "50")
        } else if col == 0 {
            RawRoad::new(next_id, points)
                .with_tag("highway", "tertiary")
                .with_tag("oneway", "yes")
        } else {
            RawRoad::new(next_id, points).with_tag("highway", "residential")
        };
        roads.push(road);
        next_id += 1;
    }

    // A footpath cutting the south-west block diagonally.
    roads.push(
        RawRoad::new(next_id, vec![grid(-1, -1), grid(0, 0)]).with_tag("highway", "footway"),
    );

    (roads, [grid(-1, -1), grid(1, 1)])
}
