//! Routing trait and default A* implementation.
//!
//! # Cost units
//!
//! Edge cost is travel time in **minutes**: `length_km / speed_kmh * 60`.
//! Edges whose road is blocked are skipped when relaxing, so blocking never
//! edits the graph.
//!
//! # Heuristic
//!
//! [`HeuristicKind::TimeLowerBound`] divides the straight-line distance to
//! the goal by the fastest speed reachable in the network for the mode,
//! which never overestimates and keeps routes time-optimal.
//! [`HeuristicKind::Distance`] adds raw kilometres to a cost in minutes; it
//! is not admissible and may return slower routes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fw_core::{EdgeId, GeoPoint, HeuristicKind, NodeId, RouterConfig, TravelMode};

use crate::{BlockingRegistry, RoadGraph, SpatialError, SpeedTable};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, `start` first and `goal` last.
    pub nodes: Vec<NodeId>,
    /// The edge taken between each consecutive pair of `nodes`.
    pub edges: Vec<EdgeId>,
    /// Accumulated travel time in minutes.
    pub total_time_min: f64,
}

impl Route {
    /// `true` if the start and goal are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Node positions along the route, for drawing a polyline.
    pub fn coordinates(&self, graph: &RoadGraph) -> Vec<GeoPoint> {
        self.nodes.iter().map(|n| graph.node_pos[n.index()]).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so a single router can serve
/// concurrent searches over a shared graph.
pub trait Router: Send + Sync {
    /// Compute the minimum-time route from `from` to `to` for `mode`,
    /// ignoring every road `blocking` reports as blocked.
    ///
    /// `from == to` yields a single-node route, never an error.
    fn route(
        &self,
        graph: &RoadGraph,
        speeds: &SpeedTable,
        blocking: &BlockingRegistry,
        from: NodeId,
        to: NodeId,
        mode: TravelMode,
    ) -> Result<Route, SpatialError>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the CSR road graph with a bound on node expansions.
#[derive(Copy, Clone, Debug)]
pub struct AStarRouter {
    pub heuristic: HeuristicKind,
    /// Expansions allowed before giving up with [`SpatialError::NoRoute`].
    pub max_steps: usize,
}

impl AStarRouter {
    pub fn new(heuristic: HeuristicKind, max_steps: usize) -> Self {
        Self { heuristic, max_steps }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(config.heuristic, config.max_search_steps)
    }

    /// Factor turning straight-line kilometres into heuristic units.
    fn heuristic_scale(&self, graph: &RoadGraph, speeds: &SpeedTable, mode: TravelMode) -> f64 {
        match self.heuristic {
            HeuristicKind::Distance => 1.0,
            HeuristicKind::TimeLowerBound => {
                let mut vmax = speeds.max_table_kmh(mode);
                if mode.is_motorized() {
                    if let Some(declared) = graph.max_declared_speed_kmh() {
                        vmax = vmax.max(declared);
                    }
                }
                60.0 / vmax
            }
        }
    }
}

impl Default for AStarRouter {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        graph: &RoadGraph,
        speeds: &SpeedTable,
        blocking: &BlockingRegistry,
        from: NodeId,
        to: NodeId,
        mode: TravelMode,
    ) -> Result<Route, SpatialError> {
        for node in [from, to] {
            if !graph.contains_node(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        if from == to {
            return Ok(Route { nodes: vec![from], edges: vec![], total_time_min: 0.0 });
        }

        let goal_pos = graph.node_pos[to.index()];
        let scale = self.heuristic_scale(graph, speeds, mode);
        let h = |n: NodeId| graph.node_pos[n.index()].distance_km(goal_pos) * scale;

        let n = graph.node_count();
        // g[v] = best known travel time (min) to reach v.
        let mut g = vec![f64::INFINITY; n];
        // prev_edge[v] = edge that reached v; INVALID for unreached nodes.
        let mut prev_edge = vec![EdgeId::INVALID; n];

        g[from.index()] = 0.0;
        let mut open = BinaryHeap::new();
        open.push(Frontier { f: h(from), g: 0.0, node: from });

        let mut steps = 0usize;
        while let Some(Frontier { g: cost, node, .. }) = open.pop() {
            // Stale entry: a cheaper path to `node` was found after this push.
            if cost > g[node.index()] {
                continue;
            }
            if node == to {
                log::debug!("A* {from} -> {to} ({mode}): {steps} expansions, {cost:.3} min");
                return Ok(reconstruct(graph, &prev_edge, from, to, cost));
            }

            steps += 1;
            if steps > self.max_steps {
                log::warn!(
                    "A* {from} -> {to} ({mode}) hit the step bound of {}; reporting no route",
                    self.max_steps
                );
                break;
            }

            for edge in graph.out_edges(node) {
                let road_id = graph.edge_road[edge.index()];
                if blocking.is_blocked(road_id) {
                    continue;
                }
                let next = graph.edge_to[edge.index()];
                let time = speeds.traversal_min(
                    graph.road(road_id),
                    graph.edge_length_km[edge.index()],
                    mode,
                );
                let tentative = cost + time;

                if tentative < g[next.index()] {
                    g[next.index()] = tentative;
                    prev_edge[next.index()] = edge;
                    open.push(Frontier { f: tentative + h(next), g: tentative, node: next });
                }
            }
        }

        Err(SpatialError::NoRoute { from, to })
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct Frontier {
    f: f64,
    g: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

// Min-heap on `f`; `NodeId` breaks ties deterministically.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct(
    graph: &RoadGraph,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_time_min: f64,
) -> Route {
    let mut nodes = vec![to];
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "predecessor chain broken at {cur}");
        edges.push(e);
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    edges.reverse();
    Route { nodes, edges, total_time_min }
}
