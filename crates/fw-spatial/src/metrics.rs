//! Distance and travel-time totals for a found route.

use std::fmt;

use fw_core::{NodeId, TravelMode};

use crate::{RoadGraph, Route, SpatialError, SpeedTable};

/// Totals shown alongside a drawn route.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub time_min: f64,
}

impl RouteMetrics {
    /// Sum the edges a [`Route`] actually took.
    pub fn for_route(graph: &RoadGraph, speeds: &SpeedTable, route: &Route, mode: TravelMode) -> Self {
        let mut totals = Self::default();
        for &edge in &route.edges {
            let length_km = graph.edge_length_km[edge.index()];
            totals.distance_km += length_km;
            totals.time_min += speeds.traversal_min(graph.edge_road(edge), length_km, mode);
        }
        totals
    }

    /// Re-walk a bare node path.
    ///
    /// Between each consecutive pair the cheapest edge for `mode` is used,
    /// so parallel edges from different roads cannot inflate the totals.
    ///
    /// # Errors
    ///
    /// [`SpatialError::MissingEdge`] if some consecutive pair is not joined
    /// by any edge, [`SpatialError::NodeNotFound`] for an unknown node.
    pub fn for_path(
        graph: &RoadGraph,
        speeds: &SpeedTable,
        path: &[NodeId],
        mode: TravelMode,
    ) -> Result<Self, SpatialError> {
        if let Some(&bad) = path.iter().find(|n| !graph.contains_node(**n)) {
            return Err(SpatialError::NodeNotFound(bad));
        }

        let mut totals = Self::default();
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let (length_km, time_min) = graph
                .edges_between(from, to)
                .map(|e| {
                    let length_km = graph.edge_length_km[e.index()];
                    (length_km, speeds.traversal_min(graph.edge_road(e), length_km, mode))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .ok_or(SpatialError::MissingEdge { from, to })?;
            totals.distance_km += length_km;
            totals.time_min += time_min;
        }
        Ok(totals)
    }
}

impl fmt::Display for RouteMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km, {:.1} min", self.distance_km, self.time_min)
    }
}
