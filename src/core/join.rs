use crate::domain::geo;
use crate::domain::model::{Airport, JoinStats, Route, RouteDistance, UnmatchedPolicy};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Airport coordinates keyed by IATA code.
#[derive(Debug, Default)]
pub struct AirportIndex {
    by_iata: HashMap<String, (f64, f64)>,
}

impl AirportIndex {
    /// Airports without an IATA code are not indexed; on duplicate codes the
    /// first row wins.
    pub fn build(airports: &[Airport]) -> Self {
        let mut by_iata = HashMap::with_capacity(airports.len());

        for airport in airports {
            let Some(code) = airport.iata.as_deref() else {
                continue;
            };
            if by_iata.contains_key(code) {
                tracing::debug!(
                    "Duplicate IATA code {} (airport {}), keeping first",
                    code,
                    airport.airport_id
                );
                continue;
            }
            by_iata.insert(code.to_string(), (airport.latitude, airport.longitude));
        }

        Self { by_iata }
    }

    pub fn coordinates(&self, code: &str) -> Option<(f64, f64)> {
        self.by_iata.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.by_iata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iata.is_empty()
    }
}

/// Joins every route to its endpoint coordinates and computes its distance.
///
/// Output preserves route order. An airport with an out-of-range coordinate
/// fails the whole join.
pub fn join_routes(
    index: &AirportIndex,
    routes: Vec<Route>,
    policy: UnmatchedPolicy,
) -> Result<(Vec<RouteDistance>, JoinStats)> {
    let mut stats = JoinStats {
        routes_read: routes.len(),
        ..JoinStats::default()
    };
    let mut rows = Vec::with_capacity(routes.len());

    for route in routes {
        let source = index.coordinates(&route.source_airport);
        let destination = index.coordinates(&route.destination_airport);

        if source.is_none() {
            stats.unmatched_source += 1;
        }
        if destination.is_none() {
            stats.unmatched_destination += 1;
        }

        let (Some((src_lat, src_lon)), Some((dst_lat, dst_lon))) = (source, destination) else {
            match policy {
                UnmatchedPolicy::Drop => stats.dropped += 1,
                UnmatchedPolicy::Keep => rows.push(RouteDistance::from_route(route)),
            }
            continue;
        };

        let distance_km = geo::haversine_km(src_lat, src_lon, dst_lat, dst_lon).inspect_err(|e| {
            tracing::error!(
                "❌ Route {} {} -> {}: {}",
                route.airline,
                route.source_airport,
                route.destination_airport,
                e
            );
        })?;

        stats.matched += 1;
        let mut row = RouteDistance::from_route(route);
        row.source_latitude = Some(src_lat);
        row.source_longitude = Some(src_lon);
        row.destination_latitude = Some(dst_lat);
        row.destination_longitude = Some(dst_lon);
        row.distance_km = Some(distance_km);
        rows.push(row);
    }

    Ok((rows, stats))
}
