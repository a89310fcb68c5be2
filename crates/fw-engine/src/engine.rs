//! The engine context: graph, speeds, blocking state, and router together.

use std::sync::{Mutex, MutexGuard, PoisonError};

use fw_core::{GeoPoint, NodeId, RouterConfig, TravelMode, WayId};
use fw_spatial::{AStarRouter, BlockingRegistry, RawRoad, RoadGraph, Route, RouteMetrics, Router, SpeedTable};

use crate::{BlockingChange, BlockingObserver, EngineBuilder, EngineError, EngineResult};

/// A found route with everything needed to draw and describe it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedRoute {
    /// Node the start coordinate snapped to.
    pub start: NodeId,
    /// Node the end coordinate snapped to.
    pub end: NodeId,
    pub route: Route,
    /// Polyline through the route's nodes.
    pub coordinates: Vec<GeoPoint>,
    pub metrics: RouteMetrics,
}

/// Graph, registry, and search state behind one object.
///
/// Every command takes `&self`: the graph and speeds are read-only after
/// build and the blocking registry is atomic, so an `Arc<Engine>` can serve
/// searches and toggles from several threads.  A search reads each road's
/// flag as it relaxes that road's edges.
///
/// Blocking commands are serialized with their observer notifications, so
/// observers see changes in the order the registry applied them.
pub struct Engine<R: Router = AStarRouter> {
    pub(crate) config:    RouterConfig,
    pub(crate) graph:     RoadGraph,
    pub(crate) speeds:    SpeedTable,
    pub(crate) blocking:  BlockingRegistry,
    pub(crate) router:    R,
    pub(crate) observers: Vec<Box<dyn BlockingObserver>>,
    /// Held across a flag change and its notification.
    pub(crate) mutation:  Mutex<()>,
}

impl Engine<AStarRouter> {
    /// Build the graph from `roads` with default speeds and A*.
    pub fn new(roads: impl IntoIterator<Item = RawRoad>, config: RouterConfig) -> EngineResult<Self> {
        EngineBuilder::new(config).build(roads)
    }
}

impl<R: Router> Engine<R> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    pub fn blocking(&self) -> &BlockingRegistry {
        &self.blocking
    }

    // ── Blocking ──────────────────────────────────────────────────────────

    /// Block or unblock every edge of `way`.  Returns `true` if the state
    /// changed; repeating the current state is a silent no-op.
    pub fn set_blocked(&self, way: WayId, blocked: bool) -> EngineResult<bool> {
        let road = self.graph.road_id(way).ok_or(EngineError::UnknownRoad(way))?;
        let _guard = self.lock_mutation();
        let changed = self.blocking.set_blocked(road, blocked);
        if changed {
            self.notify(BlockingChange { way, blocked });
        }
        Ok(changed)
    }

    /// Flip `way`'s state and return the new one.
    pub fn toggle_blocked(&self, way: WayId) -> EngineResult<bool> {
        let road = self.graph.road_id(way).ok_or(EngineError::UnknownRoad(way))?;
        let _guard = self.lock_mutation();
        let blocked = self.blocking.toggle(road);
        self.notify(BlockingChange { way, blocked });
        Ok(blocked)
    }

    /// Unblock every road.  Returns how many were blocked.
    pub fn clear_blocked(&self) -> usize {
        let _guard = self.lock_mutation();
        let blocked: Vec<_> = self.blocking.blocked().collect();
        let mut cleared = 0;
        for road in blocked {
            if self.blocking.set_blocked(road, false) {
                cleared += 1;
                self.notify(BlockingChange { way: self.graph.road(road).way, blocked: false });
            }
        }
        cleared
    }

    pub fn is_blocked(&self, way: WayId) -> EngineResult<bool> {
        let road = self.graph.road_id(way).ok_or(EngineError::UnknownRoad(way))?;
        Ok(self.blocking.is_blocked(road))
    }

    /// External ids of all blocked roads, ascending.
    pub fn blocked_roads(&self) -> Vec<WayId> {
        let mut ways: Vec<WayId> = self
            .blocking
            .blocked()
            .map(|r| self.graph.road(r).way)
            .collect();
        ways.sort_unstable();
        ways
    }

    /// The lock only orders changes; a panicking observer leaves no state
    /// behind it, so a poisoned lock is still usable.
    fn lock_mutation(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, change: BlockingChange) {
        for observer in &self.observers {
            observer.on_blocking_changed(change);
        }
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Resolve an arbitrary coordinate to the closest graph node.
    ///
    /// # Errors
    ///
    /// Non-finite coordinates, coordinates outside the configured service
    /// area, and an empty graph.
    pub fn snap(&self, pos: GeoPoint) -> EngineResult<NodeId> {
        if !pos.is_finite() {
            log::warn!("rejecting non-finite coordinate {pos}");
            return Err(EngineError::NonFiniteCoordinate(pos));
        }
        if let Some(area) = &self.config.area {
            if !area.contains(pos) {
                return Err(EngineError::OutsideArea(pos));
            }
        }
        self.graph.nearest_node(pos).ok_or(EngineError::EmptyGraph)
    }

    /// Snap both endpoints and find the fastest route for `mode`.
    ///
    /// `Err(e)` with `e.is_no_route()` means blocking or one-way direction
    /// disconnects the endpoints.
    pub fn find_route(&self, start: GeoPoint, end: GeoPoint, mode: TravelMode) -> EngineResult<PlannedRoute> {
        let from = self.snap(start)?;
        let to = self.snap(end)?;
        let route = self.route_between(from, to, mode)?;
        let metrics = self.route_metrics(&route, mode);
        let coordinates = route.coordinates(&self.graph);
        Ok(PlannedRoute { start: from, end: to, route, coordinates, metrics })
    }

    /// Route between two nodes under the current blocking state.
    pub fn route_between(&self, from: NodeId, to: NodeId, mode: TravelMode) -> EngineResult<Route> {
        Ok(self.router.route(&self.graph, &self.speeds, &self.blocking, from, to, mode)?)
    }

    // ── Metrics ───────────────────────────────────────────────────────────

    /// Distance and time of a route found by this engine.
    pub fn route_metrics(&self, route: &Route, mode: TravelMode) -> RouteMetrics {
        RouteMetrics::for_route(&self.graph, &self.speeds, route, mode)
    }

    /// Distance and time of a bare node path.
    pub fn path_metrics(&self, path: &[NodeId], mode: TravelMode) -> EngineResult<RouteMetrics> {
        Ok(RouteMetrics::for_path(&self.graph, &self.speeds, path, mode)?)
    }
}
