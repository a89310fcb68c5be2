//! `fw-spatial` — road graph, speed model, blocking, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`road`]     | `Road`, `RawRoad`, `OneWay`, tag parsing                     |
//! | [`network`]  | `RoadGraph` (CSR + road arena), `RoadGraphBuilder`           |
//! | [`speed`]    | `SpeedTable` — per-mode, per-class travel speeds             |
//! | [`blocking`] | `BlockingRegistry` — lock-free per-road blocked flags        |
//! | [`router`]   | `Router` trait, `Route`, `AStarRouter`                       |
//! | [`metrics`]  | `RouteMetrics` — distance/time re-walk of a path             |
//! | [`overpass`] | Overpass JSON ingestion and service-area clipping            |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Nearest-node snapping scans nodes on Rayon's thread pool. |

pub mod blocking;
pub mod error;
pub mod metrics;
pub mod network;
pub mod overpass;
pub mod road;
pub mod router;
pub mod speed;

#[cfg(test)]
mod tests;

pub use blocking::BlockingRegistry;
pub use error::{SpatialError, SpatialResult};
pub use metrics::RouteMetrics;
pub use network::{RoadGraph, RoadGraphBuilder};
pub use road::{OneWay, RawRoad, Road};
pub use router::{AStarRouter, Route, Router};
pub use speed::SpeedTable;
