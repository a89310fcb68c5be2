//! `fw-core` — foundational types for the `floodway` router.
//!
//! This crate is a dependency of every other `fw-*` crate.  It has no `fw-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `RoadId`, `WayId`                 |
//! | [`geo`]         | `GeoPoint`, haversine distance in kilometres          |
//! | [`transport`]   | `TravelMode` enum                                     |
//! | [`config`]      | `RouterConfig`, `ServiceArea`, `HeuristicKind`        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{HeuristicKind, RouterConfig, ServiceArea};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId, RoadId, WayId};
pub use transport::TravelMode;
