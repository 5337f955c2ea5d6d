pub mod config;
pub mod decomposition;
pub mod error;
pub mod flux;
pub mod growth;
pub mod kinetics;
pub mod outputs;
pub mod pipeline;
pub mod statistics;

pub use eddyflux_parser::{SensorField, SensorRecord, SensorSeries};
