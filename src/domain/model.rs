use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Null marker used by the OpenFlights `.dat` files.
pub const NULL_MARKER: &str = "\\N";

/// One row of `airports.dat`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Airport {
    pub airport_id: u32,
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(deserialize_with = "nullable", default)]
    pub iata: Option<String>,
    #[serde(deserialize_with = "nullable", default)]
    pub icao: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(deserialize_with = "nullable", default)]
    pub altitude_ft: Option<f64>,
    #[serde(deserialize_with = "nullable", default)]
    pub timezone: Option<f64>,
    #[serde(deserialize_with = "nullable", default)]
    pub dst: Option<String>,
    #[serde(deserialize_with = "nullable", default)]
    pub tz_database: Option<String>,
    #[serde(deserialize_with = "nullable", default)]
    pub kind: Option<String>,
    #[serde(deserialize_with = "nullable", default)]
    pub source: Option<String>,
}

/// One row of `routes.dat`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    pub airline: String,
    #[serde(deserialize_with = "nullable", default)]
    pub airline_id: Option<u32>,
    pub source_airport: String,
    #[serde(deserialize_with = "nullable", default)]
    pub source_airport_id: Option<u32>,
    pub destination_airport: String,
    #[serde(deserialize_with = "nullable", default)]
    pub destination_airport_id: Option<u32>,
    #[serde(deserialize_with = "nullable", default)]
    pub codeshare: Option<String>,
    #[serde(deserialize_with = "nullable", default)]
    pub stops: Option<u32>,
    #[serde(deserialize_with = "nullable", default)]
    pub equipment: Option<String>,
}

/// Output row: a route augmented with both endpoints' coordinates and the
/// great-circle distance in kilometers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDistance {
    #[serde(rename = "Airline")]
    pub airline: String,
    #[serde(rename = "Airline ID")]
    pub airline_id: Option<u32>,
    #[serde(rename = "Source Airport")]
    pub source_airport: String,
    #[serde(rename = "Source Airport ID")]
    pub source_airport_id: Option<u32>,
    #[serde(rename = "Destination Airport")]
    pub destination_airport: String,
    #[serde(rename = "Destination Airport ID")]
    pub destination_airport_id: Option<u32>,
    #[serde(rename = "Codeshare")]
    pub codeshare: Option<String>,
    #[serde(rename = "Stops")]
    pub stops: Option<u32>,
    #[serde(rename = "Equipment")]
    pub equipment: Option<String>,
    #[serde(rename = "Latitude")]
    pub source_latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub source_longitude: Option<f64>,
    #[serde(rename = "Latitude_destination")]
    pub destination_latitude: Option<f64>,
    #[serde(rename = "Longitude_destination")]
    pub destination_longitude: Option<f64>,
    #[serde(rename = "Distance")]
    pub distance_km: Option<f64>,
}

impl RouteDistance {
    /// Row carrying only the route columns; coordinates and distance are
    /// filled in by the join.
    pub fn from_route(route: Route) -> Self {
        Self {
            airline: route.airline,
            airline_id: route.airline_id,
            source_airport: route.source_airport,
            source_airport_id: route.source_airport_id,
            destination_airport: route.destination_airport,
            destination_airport_id: route.destination_airport_id,
            codeshare: route.codeshare,
            stops: route.stops,
            equipment: route.equipment,
            source_latitude: None,
            source_longitude: None,
            destination_latitude: None,
            destination_longitude: None,
            distance_km: None,
        }
    }
}

/// What to do with a route whose source or destination code has no airport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Leave the route out of the output (inner join).
    #[default]
    Drop,
    /// Keep the route with empty coordinate and distance cells.
    Keep,
}

/// Both tables as decoded from the remote `.dat` files.
#[derive(Debug, Clone, Default)]
pub struct FlightTables {
    pub airports: Vec<Airport>,
    pub routes: Vec<Route>,
    pub skipped_airport_rows: usize,
    pub skipped_route_rows: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub routes_read: usize,
    pub matched: usize,
    pub unmatched_source: usize,
    pub unmatched_destination: usize,
    pub dropped: usize,
}

impl JoinStats {
    pub fn unmatched(&self) -> usize {
        self.routes_read - self.matched
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<RouteDistance>,
    pub stats: JoinStats,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() || raw == NULL_MARKER {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(de::Error::custom)
}
