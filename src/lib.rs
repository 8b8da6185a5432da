pub mod config;
pub mod core;
pub mod domain;
pub mod planner;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::EtlEngine, pipeline::RouteDistancePipeline};
pub use domain::geo::{distance, haversine_km, Distance, GeoPoint, EARTH_RADIUS_KM};
pub use planner::{Algorithm, PlannedPath, RouteGraph};
pub use utils::error::{EtlError, Result};
