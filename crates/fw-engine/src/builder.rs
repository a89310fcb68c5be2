//! Fluent builder for constructing an [`Engine`].

use std::sync::Mutex;

use fw_core::RouterConfig;
use fw_spatial::{AStarRouter, BlockingRegistry, RawRoad, RoadGraph, Router, SpeedTable};

use crate::{BlockingObserver, Engine, EngineResult};

/// Fluent builder for [`Engine<R>`].
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                             |
/// |------------------|-----------------------------------------------------|
/// | `.speeds(t)`     | Standard table with `config.fallback_speed_kmh`     |
/// | `.router(r)`     | `AStarRouter::from_config(&config)`                 |
/// | `.observer(o)`   | none                                                |
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new(config)
///     .observer(LogObserver)
///     .build(roads)?;
/// ```
pub struct EngineBuilder<R: Router = AStarRouter> {
    config:    RouterConfig,
    speeds:    Option<SpeedTable>,
    router:    R,
    observers: Vec<Box<dyn BlockingObserver>>,
}

impl EngineBuilder<AStarRouter> {
    pub fn new(config: RouterConfig) -> Self {
        let router = AStarRouter::from_config(&config);
        Self { config, speeds: None, router, observers: Vec::new() }
    }
}

impl<R: Router> EngineBuilder<R> {
    /// Replace the speed table.
    pub fn speeds(mut self, speeds: SpeedTable) -> Self {
        self.speeds = Some(speeds);
        self
    }

    /// Swap in a different routing algorithm.
    pub fn router<R2: Router>(self, router: R2) -> EngineBuilder<R2> {
        EngineBuilder {
            config:    self.config,
            speeds:    self.speeds,
            router,
            observers: self.observers,
        }
    }

    /// Subscribe to blocking-state changes.
    pub fn observer(mut self, observer: impl BlockingObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Validate the config, build the road graph once, and return a ready
    /// engine with every road unblocked.
    pub fn build(self, roads: impl IntoIterator<Item = RawRoad>) -> EngineResult<Engine<R>> {
        self.config.validate()?;

        let speeds = match self.speeds {
            Some(s) => s,
            None => SpeedTable::standard(self.config.fallback_speed_kmh)?,
        };
        let graph: RoadGraph = roads.into_iter().collect();
        let blocking = BlockingRegistry::new(graph.road_count());

        Ok(Engine {
            config:    self.config,
            graph,
            speeds,
            blocking,
            router:    self.router,
            observers: self.observers,
            mutation:  Mutex::new(()),
        })
    }
}
