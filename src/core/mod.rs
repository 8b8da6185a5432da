pub mod etl;
pub mod join;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{FlightTables, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
