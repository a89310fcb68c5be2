//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_*[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays are sorted by source node with a *stable* sort, so each
//! node's edges keep the order in which the builder emitted them.
//!
//! Roads live in a separate arena (`roads`, indexed by `RoadId`).  Edges
//! store only a `RoadId`; every segment of a long road shares one record.
//!
//! # Node identity
//!
//! Nodes are keyed by their coordinate rounded to six decimals.  That key is
//! the only thing that connects two roads meeting at an endpoint.

use rustc_hash::FxHashMap;

use fw_core::{EdgeId, GeoPoint, NodeId, RoadId, WayId};

use crate::road::{OneWay, RawRoad, Road};

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus its road arena.
///
/// Built once per load and never structurally modified afterwards; blocking
/// is a traversal-time check against [`BlockingRegistry`](crate::BlockingRegistry).
/// Use [`RoadGraphBuilder`] to construct one.
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node: the first coordinate seen for its key.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Great-circle length in kilometres.
    pub edge_length_km: Vec<f64>,
    pub edge_road: Vec<RoadId>,

    // ── Road arena ────────────────────────────────────────────────────────
    pub roads: Vec<Road>,

    road_index: FxHashMap<WayId, RoadId>,
    node_index: FxHashMap<(i64, i64), NodeId>,
    max_declared_speed_kmh: Option<f64>,
}

impl RoadGraph {
    /// Construct an empty graph.  Every routing request against it fails.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing edges of `node`, in emission order.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All edges `from → to`, in emission order.  More than one exists when
    /// several roads join the same pair of coordinates.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from).filter(move |e| self.edge_to[e.index()] == to)
    }

    #[inline]
    pub fn edge_road(&self, edge: EdgeId) -> &Road {
        &self.roads[self.edge_road[edge.index()].index()]
    }

    // ── Roads ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id.index()]
    }

    /// Arena id of the road with external id `way`.
    pub fn road_id(&self, way: WayId) -> Option<RoadId> {
        self.road_index.get(&way).copied()
    }

    /// Highest positive `maxspeed` declared by any road, in km/h.
    pub fn max_declared_speed_kmh(&self) -> Option<f64> {
        self.max_declared_speed_kmh
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Node whose rounded key equals that of `pos`, if any.
    pub fn node_at(&self, pos: GeoPoint) -> Option<NodeId> {
        self.node_index.get(&pos.node_key()).copied()
    }

    /// The node closest to `pos` by great-circle distance.
    ///
    /// Linear scan over all nodes; ties resolve to the lowest `NodeId`
    /// (first created).  Returns `None` only for an empty graph.
    #[cfg(not(feature = "parallel"))]
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        let mut best: Option<(f64, usize)> = None;
        for (i, &p) in self.node_pos.iter().enumerate() {
            let d = pos.distance_km(p);
            if best.is_none_or(|(min, _)| d < min) {
                best = Some((d, i));
            }
        }
        best.map(|(_, i)| NodeId(i as u32))
    }

    /// The node closest to `pos` by great-circle distance.
    ///
    /// Parallel scan; `min_by` keeps the first of equal minima, so ties still
    /// resolve to the lowest `NodeId`.
    #[cfg(feature = "parallel")]
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        use rayon::prelude::*;

        self.node_pos
            .par_iter()
            .enumerate()
            .map(|(i, &p)| (pos.distance_km(p), i))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, i)| NodeId(i as u32))
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] from roads, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fw_core::GeoPoint;
/// use fw_spatial::{RawRoad, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_road(
///     RawRoad::new(1, vec![GeoPoint::new(16.07, 108.22), GeoPoint::new(16.08, 108.22)])
///         .with_tag("highway", "residential"),
/// );
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:      Vec<GeoPoint>,
    node_index: FxHashMap<(i64, i64), NodeId>,
    roads:      Vec<Road>,
    road_index: FxHashMap<WayId, RoadId>,
    raw_edges:  Vec<RawEdge>,
    skipped:    usize,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_km: f64,
    road:      RoadId,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:      Vec::new(),
            node_index: FxHashMap::default(),
            roads:      Vec::new(),
            road_index: FxHashMap::default(),
            raw_edges:  Vec::new(),
            skipped:    0,
        }
    }

    /// Resolve `pos` to a node, creating it the first time its rounded key
    /// is seen.  Later calls with a coincident coordinate return the same id.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let next = NodeId(self.nodes.len() as u32);
        let id = *self.node_index.entry(pos.node_key()).or_insert(next);
        if id == next {
            self.nodes.push(pos);
        }
        id
    }

    /// Add a **directed** edge of `length_km` belonging to `road`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_km: f64, road: RoadId) {
        debug_assert!(from.index() < self.nodes.len() && to.index() < self.nodes.len());
        self.raw_edges.push(RawEdge { from, to, length_km, road });
    }

    /// Add one road: a node per coordinate and edges per consecutive pair,
    /// directed according to its `oneway` tag.
    ///
    /// Roads with fewer than two points, or with any non-finite coordinate,
    /// are skipped and `None` is returned.  A way id seen before reuses the
    /// existing road record.
    pub fn add_road(&mut self, raw: RawRoad) -> Option<RoadId> {
        if raw.points.len() < 2 {
            log::debug!("skipping {}: {} point(s)", raw.id, raw.points.len());
            self.skipped += 1;
            return None;
        }
        if let Some(bad) = raw.points.iter().find(|p| !p.is_finite()) {
            log::warn!("rejecting {}: non-finite coordinate {bad}", raw.id);
            self.skipped += 1;
            return None;
        }

        let road = match self.road_index.get(&raw.id) {
            Some(&existing) => existing,
            None => {
                let id = RoadId(self.roads.len() as u32);
                self.roads.push(Road::from_tags(raw.id, raw.tags));
                self.road_index.insert(raw.id, id);
                id
            }
        };
        let oneway = self.roads[road.index()].oneway;

        for pair in raw.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let na = self.add_node(a);
            let nb = self.add_node(b);
            let length_km = a.distance_km(b);

            match oneway {
                OneWay::Forward => self.add_directed_edge(na, nb, length_km, road),
                OneWay::Backward => self.add_directed_edge(nb, na, length_km, road),
                OneWay::None => {
                    self.add_directed_edge(na, nb, length_km, road);
                    self.add_directed_edge(nb, na, length_km, road);
                }
            }
        }
        Some(road)
    }

    /// Add every road in order.
    pub fn add_roads(&mut self, roads: impl IntoIterator<Item = RawRoad>) {
        for raw in roads {
            self.add_road(raw);
        }
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }
    /// Roads rejected by [`add_road`](Self::add_road) so far.
    pub fn skipped_count(&self) -> usize { self.skipped }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the stable edge sort.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable: preserves per-node emission order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:      Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_km: Vec<f64>    = raw.iter().map(|e| e.length_km).collect();
        let edge_road:      Vec<RoadId> = raw.iter().map(|e| e.road).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let max_declared_speed_kmh = self
            .roads
            .iter()
            .filter_map(|r| r.maxspeed_kmh)
            .reduce(f64::max);

        log::info!(
            "built road graph: {} nodes, {} edges, {} roads ({} skipped)",
            node_count,
            edge_count,
            self.roads.len(),
            self.skipped,
        );

        RoadGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_km,
            edge_road,
            roads: self.roads,
            road_index: self.road_index,
            node_index: self.node_index,
            max_declared_speed_kmh,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<RawRoad> for RoadGraph {
    fn from_iter<I: IntoIterator<Item = RawRoad>>(iter: I) -> Self {
        let mut b = RoadGraphBuilder::new();
        b.add_roads(iter);
        b.build()
    }
}
