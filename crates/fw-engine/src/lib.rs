//! `fw-engine` — the single context object a presentation layer talks to.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`engine`]   | `Engine<R>` — build / block / route / metrics commands        |
//! | [`builder`]  | `EngineBuilder` — speeds, router, and observers before build  |
//! | [`observer`] | `BlockingObserver`, `BlockingChange`, `LogObserver`           |
//! | [`flood`]    | `FloodMonitor`, `FloodStatusSource`, background polling       |
//! | [`error`]    | `EngineError`, `EngineResult<T>`                              |
//!
//! # Commands
//!
//! ```text
//! buildGraph(roads)            → EngineBuilder::build / Engine::new
//! setBlocked(way, bool)        → Engine::set_blocked
//! findRoute(start, end, mode)  → Engine::find_route  (Err(NoRoute) = "no route available")
//! routeMetrics(path, mode)     → Engine::route_metrics / Engine::path_metrics
//! ```
//!
//! The flood monitor issues the very same `set_blocked` command a user
//! click does; there is no separate code path for automated blocking.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fw_core::{RouterConfig, TravelMode};
//! use fw_engine::Engine;
//!
//! let engine = Engine::new(roads, RouterConfig::default())?;
//! engine.set_blocked(WayId(1_279_915_923), true)?;
//! let planned = engine.find_route(start, end, TravelMode::Car)?;
//! println!("{}", planned.metrics);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod flood;
pub mod observer;


pub use builder::EngineBuilder;
pub use engine::{Engine, PlannedRoute};
pub use error::{EngineError, EngineResult};
pub use flood::{FloodMonitor, FloodMonitorHandle, FloodStatus, FloodStatusSource, FloodTransition, JsonFileSource, WaterLevelSource};
pub use observer::{BlockingChange, BlockingObserver, LogObserver};
