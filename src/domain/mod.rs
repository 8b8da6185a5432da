// Domain layer: flight data models, the geodesic core and the ports the
// pipeline is written against.

pub mod geo;
pub mod model;
pub mod ports;
