//! Unit tests for fw-spatial.
//!
//! All tests use hand-crafted roads so they run without any map download.

#[cfg(test)]
mod helpers {
    use std::f64::consts::PI;

    use fw_core::{GeoPoint, NodeId};

    use crate::{BlockingRegistry, RawRoad, RoadGraph};

    /// Degrees of latitude spanning exactly 1 km along a meridian.
    pub const KM_LAT: f64 = 180.0 / (fw_core::geo::EARTH_RADIUS_KM * PI);

    pub fn pt(km_north: f64, km_east: f64) -> GeoPoint {
        // Near the equator a degree of longitude is ~ a degree of latitude.
        GeoPoint::new(km_north * KM_LAT, km_east * KM_LAT)
    }

    pub fn residential(id: u64, points: Vec<GeoPoint>) -> RawRoad {
        RawRoad::new(id, points).with_tag("highway", "residential")
    }

    /// A ── B ── C, two bidirectional residential roads of 1 km each.
    ///
    /// Road 1 is A–B, road 2 is B–C.
    pub fn line() -> (RoadGraph, BlockingRegistry, [NodeId; 3]) {
        let graph: RoadGraph = [
            residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
            residential(2, vec![pt(1.0, 0.0), pt(2.0, 0.0)]),
        ]
        .into_iter()
        .collect();
        let blocking = BlockingRegistry::new(graph.road_count());
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let b = graph.node_at(pt(1.0, 0.0)).unwrap();
        let c = graph.node_at(pt(2.0, 0.0)).unwrap();
        (graph, blocking, [a, b, c])
    }

    /// The line plus a detour A ── D ── C through a point 1 km east of B.
    ///
    /// Road 3 is A–D, road 4 is D–C.
    pub fn line_with_detour() -> (RoadGraph, BlockingRegistry, [NodeId; 4]) {
        let graph: RoadGraph = [
            residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]),
            residential(2, vec![pt(1.0, 0.0), pt(2.0, 0.0)]),
            residential(3, vec![pt(0.0, 0.0), pt(1.0, 1.0)]),
            residential(4, vec![pt(1.0, 1.0), pt(2.0, 0.0)]),
        ]
        .into_iter()
        .collect();
        let blocking = BlockingRegistry::new(graph.road_count());
        let ids = [pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(1.0, 1.0)]
            .map(|p| graph.node_at(p).unwrap());
        (graph, blocking, ids)
    }
}

// ── Tags ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tags {
    use crate::OneWay;
    use crate::road::parse_maxspeed;

    #[test]
    fn oneway_values() {
        assert_eq!(OneWay::from_tag(Some("yes")), OneWay::Forward);
        assert_eq!(OneWay::from_tag(Some("1")), OneWay::Forward);
        assert_eq!(OneWay::from_tag(Some("-1")), OneWay::Backward);
        assert_eq!(OneWay::from_tag(Some("no")), OneWay::None);
        assert_eq!(OneWay::from_tag(Some("reversible")), OneWay::None);
        assert_eq!(OneWay::from_tag(None), OneWay::None);
    }

    #[test]
    fn maxspeed_values() {
        assert_eq!(parse_maxspeed("45"), Some(45.0));
        assert_eq!(parse_maxspeed(" 60 km/h"), Some(60.0));
        assert_eq!(parse_maxspeed("50;30"), Some(50.0));
        assert_eq!(parse_maxspeed("none"), None);
        assert_eq!(parse_maxspeed("signals"), None);
        assert_eq!(parse_maxspeed("0"), None);
        assert_eq!(parse_maxspeed("-5"), None);
        let mph = parse_maxspeed("30 mph").unwrap();
        assert!((mph - 48.28).abs() < 0.01, "got {mph}");
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fw_core::{GeoPoint, WayId};

    use super::helpers::{pt, residential};
    use crate::{OneWay, RawRoad, RoadGraphBuilder};

    #[test]
    fn empty_build() {
        let graph = RoadGraphBuilder::new().build();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn coincident_endpoints_share_one_node() {
        let mut b = RoadGraphBuilder::new();
        b.add_road(residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]));
        // Same endpoint, jittered below the 6th decimal.
        let jittered = GeoPoint::new(pt(1.0, 0.0).lat + 2e-8, 0.0);
        b.add_road(residential(2, vec![jittered, pt(2.0, 0.0)]));
        let graph = b.build();

        assert_eq!(graph.node_count(), 3);
        let shared = graph.node_at(pt(1.0, 0.0)).unwrap();
        // One edge back along road 1, one forward along road 2.
        assert_eq!(graph.out_degree(shared), 2);
        let ways: Vec<WayId> = graph.out_edges(shared).map(|e| graph.edge_road(e).way).collect();
        assert_eq!(ways, vec![WayId(1), WayId(2)]);
    }

    #[test]
    fn forward_oneway_emits_single_edge() {
        let mut b = RoadGraphBuilder::new();
        b.add_road(residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("oneway", "yes"));
        let graph = b.build();
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let c = graph.node_at(pt(1.0, 0.0)).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.out_degree(a), 1);
        assert_eq!(graph.out_degree(c), 0);
        assert_eq!(graph.roads[0].oneway, OneWay::Forward);
    }

    #[test]
    fn backward_oneway_reverses_geometry() {
        let mut b = RoadGraphBuilder::new();
        b.add_road(residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("oneway", "-1"));
        let graph = b.build();
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let c = graph.node_at(pt(1.0, 0.0)).unwrap();
        assert_eq!(graph.out_degree(a), 0);
        assert_eq!(graph.edges_between(c, a).count(), 1);
    }

    #[test]
    fn bidirectional_edges_share_road_and_length() {
        let (graph, _, [a, b, _]) = super::helpers::line();
        let ab = graph.edges_between(a, b).next().unwrap();
        let ba = graph.edges_between(b, a).next().unwrap();
        assert_eq!(graph.edge_road[ab.index()], graph.edge_road[ba.index()]);
        assert_eq!(graph.edge_length_km[ab.index()], graph.edge_length_km[ba.index()]);
        assert!((graph.edge_length_km[ab.index()] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn every_edge_destination_exists() {
        let (graph, _, _) = super::helpers::line_with_detour();
        for (i, to) in graph.edge_to.iter().enumerate() {
            assert!(graph.contains_node(*to), "edge {i} points outside the graph");
        }
    }

    #[test]
    fn long_road_shares_one_record() {
        let mut b = RoadGraphBuilder::new();
        let road = b
            .add_road(residential(9, vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(3.0, 0.0)]))
            .unwrap();
        let graph = b.build();
        assert_eq!(graph.road_count(), 1);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.edge_road.iter().all(|r| *r == road));
        assert_eq!(graph.road_id(WayId(9)), Some(road));
    }

    #[test]
    fn degenerate_roads_are_skipped() {
        let mut b = RoadGraphBuilder::new();
        assert!(b.add_road(residential(1, vec![pt(0.0, 0.0)])).is_none());
        assert!(b.add_road(RawRoad::new(2, vec![])).is_none());
        assert!(
            b.add_road(residential(3, vec![pt(0.0, 0.0), GeoPoint::new(f64::NAN, 0.0)]))
                .is_none()
        );
        assert_eq!(b.skipped_count(), 3);
        let graph = b.build();
        assert!(graph.is_empty());
        assert_eq!(graph.road_count(), 0);
    }

    #[test]
    fn zero_length_segment_is_kept() {
        let mut b = RoadGraphBuilder::new();
        b.add_road(residential(1, vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(1.0, 0.0)]));
        let graph = b.build();
        assert_eq!(graph.node_count(), 2);
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let self_loops: Vec<_> = graph.edges_between(a, a).collect();
        assert_eq!(self_loops.len(), 2);
        assert!(self_loops.iter().all(|e| graph.edge_length_km[e.index()] == 0.0));
    }

    #[test]
    fn repeated_way_reuses_record() {
        let mut b = RoadGraphBuilder::new();
        let first = b.add_road(residential(5, vec![pt(0.0, 0.0), pt(1.0, 0.0)]));
        let second = b.add_road(residential(5, vec![pt(1.0, 0.0), pt(2.0, 0.0)]));
        assert_eq!(first, second);
        assert_eq!(b.road_count(), 1);
    }

    #[test]
    fn max_declared_speed() {
        let mut b = RoadGraphBuilder::new();
        b.add_road(residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("maxspeed", "45"));
        b.add_road(residential(2, vec![pt(1.0, 0.0), pt(2.0, 0.0)]).with_tag("maxspeed", "90"));
        b.add_road(residential(3, vec![pt(2.0, 0.0), pt(3.0, 0.0)]));
        assert_eq!(b.build().max_declared_speed_kmh(), Some(90.0));
    }
}

// ── Nearest-node snapping ─────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use super::helpers::pt;
    use crate::RoadGraphBuilder;

    #[test]
    fn snap_exact_position() {
        let (graph, _, [a, ..]) = super::helpers::line();
        assert_eq!(graph.nearest_node(pt(0.0, 0.0)), Some(a));
    }

    #[test]
    fn snap_nearest() {
        let (graph, _, [a, b, c]) = super::helpers::line();
        assert_eq!(graph.nearest_node(pt(0.4, 0.1)), Some(a));
        assert_eq!(graph.nearest_node(pt(0.6, 0.1)), Some(b));
        assert_eq!(graph.nearest_node(pt(5.0, 0.0)), Some(c));
    }

    #[test]
    fn tie_goes_to_first_created() {
        let (graph, _, [a, b, _]) = super::helpers::line();
        // Exactly halfway between A and B.
        assert_eq!(graph.nearest_node(pt(0.5, 0.0)), Some(a));
        let _ = b;
    }

    #[test]
    fn empty_graph_returns_none() {
        let graph = RoadGraphBuilder::new().build();
        assert!(graph.nearest_node(pt(0.0, 0.0)).is_none());
    }
}

#[cfg(all(test, feature = "parallel"))]
mod parallel_snap {
    use fw_core::{GeoPoint, NodeId};

    use super::helpers::pt;
    use crate::{RawRoad, RoadGraph};

    /// Latitude step of the chain; a power of two keeps the midpoints exact.
    const STEP: f64 = 1.0 / 1024.0;

    #[test]
    fn tie_goes_to_first_created() {
        let (graph, _, [a, _, _]) = super::helpers::line();
        assert_eq!(graph.nearest_node(pt(0.5, 0.0)), Some(a));
    }

    #[test]
    fn tie_deep_in_a_long_chain() {
        let points: Vec<GeoPoint> = (0..4096).map(|i| GeoPoint::new(i as f64 * STEP, 0.0)).collect();
        let graph: RoadGraph = std::iter::once(RawRoad::new(1, points)).collect();
        assert_eq!(graph.node_count(), 4096);

        // Halfway between nodes 3000 and 3001.
        let query = GeoPoint::new(3000.5 * STEP, 0.0);
        assert_eq!(graph.nearest_node(query), Some(NodeId(3000)));
    }
}

// ── Speed model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use fw_core::{TravelMode, WayId};

    use crate::{Road, SpatialError, SpeedTable};

    fn road(tags: &[(&str, &str)]) -> Road {
        let tags = tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Road::from_tags(WayId(1), tags)
    }

    #[test]
    fn class_lookup_per_mode() {
        let table = SpeedTable::default();
        let r = road(&[("highway", "residential")]);
        assert_eq!(table.speed_kmh(&r, TravelMode::Car), 30.0);
        assert_eq!(table.speed_kmh(&r, TravelMode::Bike), 15.0);
        assert_eq!(table.speed_kmh(&r, TravelMode::Foot), 4.0);
    }

    #[test]
    fn maxspeed_overrides_for_car_only() {
        let table = SpeedTable::default();
        let r = road(&[("highway", "residential"), ("maxspeed", "45")]);
        assert_eq!(table.speed_kmh(&r, TravelMode::Car), 45.0);
        assert_eq!(table.speed_kmh(&r, TravelMode::Bike), 15.0);
    }

    #[test]
    fn unparseable_maxspeed_falls_back_to_class() {
        let table = SpeedTable::default();
        let r = road(&[("highway", "primary"), ("maxspeed", "none")]);
        assert_eq!(table.speed_kmh(&r, TravelMode::Car), 60.0);
    }

    #[test]
    fn unknown_class_uses_fallback() {
        let table = SpeedTable::default();
        assert_eq!(table.speed_kmh(&road(&[("highway", "footway")]), TravelMode::Car), 10.0);
        assert_eq!(table.speed_kmh(&road(&[("highway", "motorway")]), TravelMode::Foot), 10.0);
        assert_eq!(table.speed_kmh(&road(&[]), TravelMode::Bike), 10.0);
    }

    #[test]
    fn speeds_are_always_positive() {
        let table = SpeedTable::default();
        for class in ["motorway", "cycleway", "path", "steps", ""] {
            for mode in TravelMode::ALL {
                assert!(table.speed_kmh(&road(&[("highway", class)]), mode) > 0.0);
            }
        }
    }

    #[test]
    fn rejects_non_positive_speeds() {
        let mut table = SpeedTable::default();
        let err = table.set(TravelMode::Car, "track", 0.0).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidSpeed { .. }));
        assert!(table.set(TravelMode::Car, "track", -3.0).is_err());
        assert!(table.set(TravelMode::Car, "track", f64::NAN).is_err());
        assert!(SpeedTable::empty(0.0).is_err());
        assert_eq!(table.lookup(TravelMode::Car, "track"), None);
    }

    #[test]
    fn traversal_minutes() {
        let table = SpeedTable::default();
        let r = road(&[("highway", "residential")]);
        assert!((table.traversal_min(&r, 1.0, TravelMode::Car) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn max_table_speed() {
        let table = SpeedTable::default();
        assert_eq!(table.max_table_kmh(TravelMode::Car), 80.0);
        assert_eq!(table.max_table_kmh(TravelMode::Bike), 20.0);
        // Fallback (10) beats every foot entry.
        assert_eq!(table.max_table_kmh(TravelMode::Foot), 10.0);
    }
}

// ── Blocking registry ─────────────────────────────────────────────────────────

#[cfg(test)]
mod blocking {
    use fw_core::RoadId;

    use crate::BlockingRegistry;

    #[test]
    fn set_is_idempotent() {
        let reg = BlockingRegistry::new(3);
        assert!(reg.set_blocked(RoadId(1), true));
        assert!(!reg.set_blocked(RoadId(1), true));
        assert!(reg.is_blocked(RoadId(1)));
        assert_eq!(reg.blocked_count(), 1);
    }

    #[test]
    fn unblocking_never_blocked_is_noop() {
        let reg = BlockingRegistry::new(3);
        assert!(!reg.set_blocked(RoadId(2), false));
        assert_eq!(reg.blocked_count(), 0);
    }

    #[test]
    fn toggle_flips() {
        let reg = BlockingRegistry::new(2);
        assert!(reg.toggle(RoadId(0)));
        assert!(reg.is_blocked(RoadId(0)));
        assert!(!reg.toggle(RoadId(0)));
        assert!(!reg.is_blocked(RoadId(0)));
    }

    #[test]
    fn blocked_list_matches_flags() {
        let reg = BlockingRegistry::new(4);
        reg.set_blocked(RoadId(3), true);
        reg.set_blocked(RoadId(0), true);
        reg.set_blocked(RoadId(3), false);
        reg.set_blocked(RoadId(2), true);
        let blocked: Vec<_> = reg.blocked().collect();
        assert_eq!(blocked, vec![RoadId(0), RoadId(2)]);
    }

    #[test]
    fn out_of_range_reads_open() {
        let reg = BlockingRegistry::new(1);
        assert!(!reg.is_blocked(RoadId(7)));
        assert!(!reg.is_blocked(RoadId::INVALID));
    }
}

// ── A* routing ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use fw_core::{HeuristicKind, NodeId, RoadId, TravelMode, WayId};

    use super::helpers::{pt, residential};
    use crate::{
        AStarRouter, BlockingRegistry, RawRoad, RoadGraph, RouteMetrics, Router, SpatialError,
        SpeedTable,
    };

    #[test]
    fn trivial_same_node() {
        let (graph, blocking, [a, ..]) = super::helpers::line();
        let route = AStarRouter::default()
            .route(&graph, &SpeedTable::default(), &blocking, a, a, TravelMode::Car)
            .unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.nodes, vec![a]);
        assert_eq!(route.total_time_min, 0.0);
    }

    #[test]
    fn line_route_and_metrics() {
        let (graph, blocking, [a, b, c]) = super::helpers::line();
        let speeds = SpeedTable::default();
        let route = AStarRouter::default()
            .route(&graph, &speeds, &blocking, a, c, TravelMode::Car)
            .unwrap();

        assert_eq!(route.nodes, vec![a, b, c]);
        assert_eq!(route.edges.len(), 2);
        assert!((route.total_time_min - 4.0).abs() < 1e-9);

        let m = RouteMetrics::for_route(&graph, &speeds, &route, TravelMode::Car);
        assert!((m.distance_km - 2.0).abs() < 1e-9, "got {}", m.distance_km);
        assert!((m.time_min - 4.0).abs() < 1e-9, "got {}", m.time_min);
    }

    #[test]
    fn blocked_road_without_alternative_is_no_route() {
        let (graph, blocking, [a, _, c]) = super::helpers::line();
        blocking.set_blocked(RoadId(0), true);
        let err = AStarRouter::default()
            .route(&graph, &SpeedTable::default(), &blocking, a, c, TravelMode::Car)
            .unwrap_err();
        assert!(err.is_no_route());
    }

    #[test]
    fn blocking_reroutes_and_unblocking_restores() {
        let (graph, blocking, [a, b, c, d]) = super::helpers::line_with_detour();
        let speeds = SpeedTable::default();
        let router = AStarRouter::default();

        let direct = router.route(&graph, &speeds, &blocking, a, c, TravelMode::Car).unwrap();
        assert_eq!(direct.nodes, vec![a, b, c]);

        let road_ab = graph.road_id(WayId(1)).unwrap();
        blocking.set_blocked(road_ab, true);
        let detour = router.route(&graph, &speeds, &blocking, a, c, TravelMode::Car).unwrap();
        assert_eq!(detour.nodes, vec![a, d, c]);
        assert!(detour.total_time_min > direct.total_time_min);

        blocking.set_blocked(road_ab, false);
        let restored = router.route(&graph, &speeds, &blocking, a, c, TravelMode::Car).unwrap();
        assert_eq!(restored, direct);
    }

    #[test]
    fn oneway_blocks_reverse_direction() {
        let graph: RoadGraph =
            [residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("oneway", "yes")]
                .into_iter()
                .collect();
        let blocking = BlockingRegistry::new(graph.road_count());
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let c = graph.node_at(pt(1.0, 0.0)).unwrap();
        let speeds = SpeedTable::default();
        let router = AStarRouter::default();

        assert!(router.route(&graph, &speeds, &blocking, a, c, TravelMode::Car).is_ok());
        let err = router.route(&graph, &speeds, &blocking, c, a, TravelMode::Car).unwrap_err();
        assert!(matches!(err, SpatialError::NoRoute { .. }));
    }

    #[test]
    fn maxspeed_overrides_cost() {
        let graph: RoadGraph =
            [residential(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("maxspeed", "45")]
                .into_iter()
                .collect();
        let blocking = BlockingRegistry::new(graph.road_count());
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let c = graph.node_at(pt(1.0, 0.0)).unwrap();
        let route = AStarRouter::default()
            .route(&graph, &SpeedTable::default(), &blocking, a, c, TravelMode::Car)
            .unwrap();
        // 1 km at 45 km/h, not the residential 30 km/h.
        assert!((route.total_time_min - 60.0 / 45.0).abs() < 1e-9);
    }

    #[test]
    fn fastest_not_shortest() {
        // Direct 2 km footway vs a 2.4 km primary detour for a car:
        // footway is 10 km/h (fallback) = 12 min, primary 60 km/h ≈ 2.5 min.
        let graph: RoadGraph = [
            RawRoad::new(1, vec![pt(0.0, 0.0), pt(2.0, 0.0)]).with_tag("highway", "footway"),
            RawRoad::new(2, vec![pt(0.0, 0.0), pt(1.0, 0.66), pt(2.0, 0.0)])
                .with_tag("highway", "primary"),
        ]
        .into_iter()
        .collect();
        let blocking = BlockingRegistry::new(graph.road_count());
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let c = graph.node_at(pt(2.0, 0.0)).unwrap();
        let mid = graph.node_at(pt(1.0, 0.66)).unwrap();
        let speeds = SpeedTable::default();

        let car = AStarRouter::default()
            .route(&graph, &speeds, &blocking, a, c, TravelMode::Car)
            .unwrap();
        assert_eq!(car.nodes, vec![a, mid, c]);

        // On foot the footway is 5 km/h and primary is off-table (10 km/h):
        // the longer primary still wins on time.
        let foot = AStarRouter::default()
            .route(&graph, &speeds, &blocking, a, c, TravelMode::Foot)
            .unwrap();
        assert_eq!(foot.nodes, vec![a, mid, c]);
    }

    #[test]
    fn step_bound_reports_no_route() {
        let (graph, blocking, [a, _, c]) = super::helpers::line();
        let router = AStarRouter::new(HeuristicKind::TimeLowerBound, 1);
        let err = router
            .route(&graph, &SpeedTable::default(), &blocking, a, c, TravelMode::Car)
            .unwrap_err();
        assert!(err.is_no_route());
    }

    #[test]
    fn distance_heuristic_still_finds_route() {
        let (graph, blocking, [a, b, c]) = super::helpers::line();
        let router = AStarRouter::new(HeuristicKind::Distance, 1_000);
        let route = router
            .route(&graph, &SpeedTable::default(), &blocking, a, c, TravelMode::Bike)
            .unwrap();
        assert_eq!(route.nodes, vec![a, b, c]);
        // 2 km at 15 km/h.
        assert!((route.total_time_min - 8.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_node_is_an_error_not_no_route() {
        let (graph, blocking, [a, ..]) = super::helpers::line();
        let err = AStarRouter::default()
            .route(&graph, &SpeedTable::default(), &blocking, a, NodeId(99), TravelMode::Car)
            .unwrap_err();
        assert!(matches!(err, SpatialError::NodeNotFound(NodeId(99))));
        assert!(!err.is_no_route());
    }

    #[test]
    fn route_coordinates_follow_nodes() {
        let (graph, blocking, [a, _, c]) = super::helpers::line();
        let route = AStarRouter::default()
            .route(&graph, &SpeedTable::default(), &blocking, a, c, TravelMode::Car)
            .unwrap();
        let coords = route.coordinates(&graph);
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0], pt(0.0, 0.0));
        assert_eq!(coords[2], pt(2.0, 0.0));
    }
}

// ── Route metrics ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use fw_core::{NodeId, TravelMode};

    use super::helpers::{pt, residential};
    use crate::{RawRoad, RoadGraph, RouteMetrics, SpatialError, SpeedTable};

    #[test]
    fn path_rewalk() {
        let (graph, _, [a, b, c]) = super::helpers::line();
        let m = RouteMetrics::for_path(&graph, &SpeedTable::default(), &[a, b, c], TravelMode::Foot)
            .unwrap();
        assert!((m.distance_km - 2.0).abs() < 1e-9);
        // 2 km at 4 km/h.
        assert!((m.time_min - 30.0).abs() < 1e-9);
    }

    #[test]
    fn single_node_path_is_zero() {
        let (graph, _, [a, ..]) = super::helpers::line();
        let m = RouteMetrics::for_path(&graph, &SpeedTable::default(), &[a], TravelMode::Car).unwrap();
        assert_eq!(m, RouteMetrics::default());
    }

    #[test]
    fn parallel_edges_use_cheapest() {
        // Two roads between the same coordinates: a slow service road added
        // first, then a primary.
        let graph: RoadGraph = [
            RawRoad::new(1, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("highway", "service"),
            RawRoad::new(2, vec![pt(0.0, 0.0), pt(1.0, 0.0)]).with_tag("highway", "primary"),
        ]
        .into_iter()
        .collect();
        let a = graph.node_at(pt(0.0, 0.0)).unwrap();
        let b = graph.node_at(pt(1.0, 0.0)).unwrap();
        assert_eq!(graph.edges_between(a, b).count(), 2);

        let m = RouteMetrics::for_path(&graph, &SpeedTable::default(), &[a, b], TravelMode::Car).unwrap();
        assert!((m.time_min - 1.0).abs() < 1e-9, "got {}", m.time_min);
    }

    #[test]
    fn missing_edge_is_reported() {
        let (graph, _, [a, _, c]) = super::helpers::line();
        let err = RouteMetrics::for_path(&graph, &SpeedTable::default(), &[a, c], TravelMode::Car)
            .unwrap_err();
        assert!(matches!(err, SpatialError::MissingEdge { from, to } if from == a && to == c));
    }

    #[test]
    fn unknown_node_in_path() {
        let (graph, _, [a, ..]) = super::helpers::line();
        let err = RouteMetrics::for_path(&graph, &SpeedTable::default(), &[a, NodeId(50)], TravelMode::Car)
            .unwrap_err();
        assert!(matches!(err, SpatialError::NodeNotFound(_)));
    }

    #[test]
    fn display_format() {
        let m = RouteMetrics { distance_km: 2.0, time_min: 4.0 };
        assert_eq!(m.to_string(), "2.00 km, 4.0 min");
        let _ = residential;
    }
}

// ── Overpass ingestion ────────────────────────────────────────────────────────

#[cfg(test)]
mod overpass {
    use std::io::Write;

    use fw_core::{GeoPoint, ServiceArea, WayId};

    use crate::overpass::{clip_to_area, overpass_query, parse_overpass, read_overpass};

    const DOC: &str = r#"{
        "version": 0.6,
        "elements": [
            { "type": "way", "id": 11,
              "geometry": [ {"lat": 16.0731, "lon": 108.2247}, {"lat": 16.0741, "lon": 108.2247} ],
              "tags": { "highway": "residential", "oneway": "yes" } },
            { "type": "way", "id": 12,
              "geometry": [ {"lat": 16.0731, "lon": 108.2247}, null, {"lat": 16.0731, "lon": 108.2257} ],
              "tags": { "highway": "primary" } },
            { "type": "way", "id": 13, "tags": { "highway": "service" } },
            { "type": "node", "id": 14, "lat": 16.0, "lon": 108.0 },
            { "type": "way", "id": 15,
              "geometry": [ {"lat": 16.0731, "lon": 108.2247}, {"lat": 16.2, "lon": 108.2247} ],
              "tags": { "highway": "trunk" } }
        ]
    }"#;

    fn area() -> ServiceArea {
        ServiceArea::new(GeoPoint::new(16.073128, 108.224769), 2.0)
    }

    #[test]
    fn parses_ways_and_clips() {
        let roads = parse_overpass(DOC, Some(&area())).unwrap();
        let ids: Vec<WayId> = roads.iter().map(|r| r.id).collect();
        // 13 has no geometry, 14 is a node, 15 leaves the area after one point.
        assert_eq!(ids, vec![WayId(11), WayId(12)]);
        assert_eq!(roads[0].tags.get("oneway").map(String::as_str), Some("yes"));
        // The null geometry entry is dropped.
        assert_eq!(roads[1].points.len(), 2);
    }

    #[test]
    fn without_area_keeps_everything_with_geometry() {
        let roads = parse_overpass(DOC, None).unwrap();
        assert_eq!(roads.len(), 3);
    }

    #[test]
    fn clip_filters_points() {
        let area = area();
        let pts = vec![area.center, GeoPoint::new(17.0, 108.0), area.center];
        assert_eq!(clip_to_area(&pts, &area), vec![area.center, area.center]);
    }

    #[test]
    fn malformed_document_is_error() {
        assert!(parse_overpass("{ \"elements\": 3 }", None).is_err());
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let roads = read_overpass(file.path(), Some(&area())).unwrap();
        assert_eq!(roads.len(), 2);
    }

    #[test]
    fn query_mentions_radius_and_center() {
        let q = overpass_query(&area());
        assert!(q.contains("around:2000,16.073128,108.224769"), "{q}");
        assert!(q.contains("out geom tags;"));
    }
}
