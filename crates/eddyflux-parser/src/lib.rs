pub mod errors;
pub mod model;
mod reader;

pub use errors::ParserError;
pub use model::{FileMetadata, ParsedSensorFile, SensorField, SensorRecord, SensorSeries};
pub use reader::{parse_sensor_bytes, parse_sensor_file};

#[cfg(test)]
mod tests;
