//! Shortest-distance itineraries over the computed route table.
//!
//! Every airport that appears in a row with a distance becomes a node; every
//! such row becomes a directed edge weighted by its great-circle distance.
//! Because each leg is itself a great-circle distance, the straight-line
//! distance to the destination never overestimates the remaining cost and
//! is used as the A* heuristic.

use crate::domain::geo::{Distance, GeoPoint};
use crate::domain::model::RouteDistance;
use crate::utils::error::{EtlError, Result};
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// Path finding algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Algorithm {
    #[default]
    Dijkstra,
    #[cfg_attr(feature = "cli", value(name = "astar"))]
    AStar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    pub airports: Vec<String>,
    pub total: Distance,
}

impl PlannedPath {
    pub fn legs(&self) -> usize {
        self.airports.len().saturating_sub(1)
    }
}

#[derive(Debug)]
pub struct RouteGraph {
    graph: StableDiGraph<String, Distance>,
    node_indices: HashMap<String, NodeIndex>,
    points: HashMap<NodeIndex, GeoPoint>,
}

impl RouteGraph {
    /// Builds the graph from output rows. Rows without a distance are
    /// ignored; of several routes between the same pair one edge is kept.
    pub fn from_rows(rows: &[RouteDistance]) -> Result<Self> {
        let mut route_graph = Self {
            graph: StableDiGraph::new(),
            node_indices: HashMap::new(),
            points: HashMap::new(),
        };

        for row in rows {
            let (Some(_), Some(src_lat), Some(src_lon), Some(dst_lat), Some(dst_lon)) = (
                row.distance_km,
                row.source_latitude,
                row.source_longitude,
                row.destination_latitude,
                row.destination_longitude,
            ) else {
                continue;
            };

            let source = GeoPoint::new(src_lat, src_lon)?;
            let destination = GeoPoint::new(dst_lat, dst_lon)?;
            let from = route_graph.node(&row.source_airport, source);
            let to = route_graph.node(&row.destination_airport, destination);

            if route_graph.graph.find_edge(from, to).is_none() {
                let leg = route_graph.points[&from].distance_to(&route_graph.points[&to]);
                route_graph.graph.add_edge(from, to, leg);
            }
        }

        tracing::debug!(
            "Route graph: {} airports, {} legs",
            route_graph.airport_count(),
            route_graph.leg_count()
        );
        Ok(route_graph)
    }

    /// The first coordinates seen for a code are used for every leg touching it.
    fn node(&mut self, code: &str, point: GeoPoint) -> NodeIndex {
        if let Some(index) = self.node_indices.get(code) {
            return *index;
        }
        let index = self.graph.add_node(code.to_string());
        self.node_indices.insert(code.to_string(), index);
        self.points.insert(index, point);
        index
    }

    pub fn airport_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn leg_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.node_indices.contains_key(code)
    }

    /// Finds the shortest itinerary by total distance.
    ///
    /// Returns `Ok(None)` when the destination is unreachable and
    /// [`EtlError::UnknownAirport`] when either code is not in the graph.
    pub fn shortest_path(
        &self,
        from: &str,
        to: &str,
        algorithm: Algorithm,
    ) -> Result<Option<PlannedPath>> {
        let start = self.index_of(from)?;
        let goal = self.index_of(to)?;
        let goal_point = self.points[&goal];

        let heuristic = |node: NodeIndex| -> f64 {
            match algorithm {
                Algorithm::Dijkstra => 0.0,
                Algorithm::AStar => self.points[&node].distance_to(&goal_point).kilometers(),
            }
        };

        let found = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| edge.weight().kilometers(),
            heuristic,
        );

        Ok(found.map(|(_, path)| self.planned_path(&path)))
    }

    fn index_of(&self, code: &str) -> Result<NodeIndex> {
        self.node_indices
            .get(code)
            .copied()
            .ok_or_else(|| EtlError::UnknownAirport {
                code: code.to_string(),
            })
    }

    fn planned_path(&self, path: &[NodeIndex]) -> PlannedPath {
        let total = path
            .windows(2)
            .filter_map(|leg| self.graph.find_edge(leg[0], leg[1]))
            .filter_map(|edge| self.graph.edge_weight(edge).copied())
            .fold(Distance::ZERO, |acc, leg| acc + leg);

        let airports = path
            .iter()
            .map(|index| self.graph[*index].clone())
            .collect();

        PlannedPath { airports, total }
    }
}

/// Decodes the pipeline's CSV output.
pub fn read_rows(data: &[u8]) -> Result<Vec<RouteDistance>> {
    let mut reader = csv::Reader::from_reader(data);
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<RouteDistance>, csv::Error>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::haversine_km;

    const LHR: (f64, f64) = (51.4700, -0.4543);
    const JFK: (f64, f64) = (40.6413, -73.7781);
    const KEF: (f64, f64) = (63.985, -22.6056);
    const CDG: (f64, f64) = (49.012798, 2.55);
    const SYD: (f64, f64) = (-33.9461, 151.1772);

    fn row(src: &str, s: (f64, f64), dst: &str, d: (f64, f64)) -> RouteDistance {
        RouteDistance {
            airline: "XX".to_string(),
            airline_id: None,
            source_airport: src.to_string(),
            source_airport_id: None,
            destination_airport: dst.to_string(),
            destination_airport_id: None,
            codeshare: None,
            stops: Some(0),
            equipment: None,
            source_latitude: Some(s.0),
            source_longitude: Some(s.1),
            destination_latitude: Some(d.0),
            destination_longitude: Some(d.1),
            distance_km: Some(haversine_km(s.0, s.1, d.0, d.1).unwrap()),
        }
    }

    fn network() -> Vec<RouteDistance> {
        vec![
            row("CDG", CDG, "LHR", LHR),
            row("LHR", LHR, "KEF", KEF),
            row("KEF", KEF, "JFK", JFK),
            row("CDG", CDG, "KEF", KEF),
            row("LHR", LHR, "JFK", JFK),
            row("LHR", LHR, "JFK", JFK),
        ]
    }

    #[test]
    fn test_graph_deduplicates_parallel_routes() {
        let graph = RouteGraph::from_rows(&network()).unwrap();
        assert_eq!(graph.airport_count(), 4);
        assert_eq!(graph.leg_count(), 5);
        assert!(graph.contains("KEF"));
        assert!(!graph.contains("SYD"));
    }

    #[test]
    fn test_rows_without_distance_are_ignored() {
        let mut rows = network();
        let mut unmatched = row("SYD", SYD, "LHR", LHR);
        unmatched.distance_km = None;
        unmatched.source_latitude = None;
        rows.push(unmatched);

        let graph = RouteGraph::from_rows(&rows).unwrap();
        assert!(!graph.contains("SYD"));
    }

    #[test]
    fn test_dijkstra_and_astar_agree() {
        let graph = RouteGraph::from_rows(&network()).unwrap();

        let dijkstra = graph
            .shortest_path("CDG", "JFK", Algorithm::Dijkstra)
            .unwrap()
            .unwrap();
        let astar = graph
            .shortest_path("CDG", "JFK", Algorithm::AStar)
            .unwrap()
            .unwrap();

        assert_eq!(dijkstra.airports, vec!["CDG", "LHR", "JFK"]);
        assert_eq!(dijkstra.legs(), 2);
        assert_eq!(astar.airports, dijkstra.airports);
        assert!((astar.total.kilometers() - dijkstra.total.kilometers()).abs() < 1e-9);

        let expected = haversine_km(CDG.0, CDG.1, LHR.0, LHR.1).unwrap()
            + haversine_km(LHR.0, LHR.1, JFK.0, JFK.1).unwrap();
        assert!((dijkstra.total.kilometers() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_destination() {
        let graph = RouteGraph::from_rows(&network()).unwrap();
        assert_eq!(graph.shortest_path("JFK", "CDG", Algorithm::AStar).unwrap(), None);
    }

    #[test]
    fn test_unknown_airport() {
        let graph = RouteGraph::from_rows(&network()).unwrap();
        let err = graph
            .shortest_path("CDG", "SYD", Algorithm::Dijkstra)
            .unwrap_err();
        assert!(matches!(err, EtlError::UnknownAirport { code } if code == "SYD"));
    }

    #[test]
    fn test_same_airport_is_zero_length_path() {
        let graph = RouteGraph::from_rows(&network()).unwrap();
        let path = graph
            .shortest_path("LHR", "LHR", Algorithm::Dijkstra)
            .unwrap()
            .unwrap();
        assert_eq!(path.airports, vec!["LHR"]);
        assert_eq!(path.legs(), 0);
        assert_eq!(path.total, Distance::ZERO);
    }

    #[test]
    fn test_read_rows_from_csv() {
        let data = "Airline,Airline ID,Source Airport,Source Airport ID,Destination Airport,\
Destination Airport ID,Codeshare,Stops,Equipment,Latitude,Longitude,\
Latitude_destination,Longitude_destination,Distance\n\
BA,1355,LHR,507,JFK,3797,,0,744,51.47,-0.4543,40.6413,-73.7781,5540.011317976542\n\
XX,,LHR,507,ZZZ,,,0,738,,,,,\n";

        let rows = read_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].airline_id, Some(1355));
        assert_eq!(rows[1].distance_km, None);

        let graph = RouteGraph::from_rows(&rows).unwrap();
        assert_eq!(graph.leg_count(), 1);
    }
}
