use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Columns of an eddy-covariance record, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    U,
    V,
    W,
    #[serde(alias = "temp", alias = "t")]
    Temperature,
    #[serde(alias = "co2", alias = "c")]
    Co2Density,
    #[serde(alias = "h2o")]
    H2oDensity,
}

impl SensorField {
    pub const ALL: [SensorField; 6] = [
        SensorField::U,
        SensorField::V,
        SensorField::W,
        SensorField::Temperature,
        SensorField::Co2Density,
        SensorField::H2oDensity,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            SensorField::U => "u",
            SensorField::V => "v",
            SensorField::W => "w",
            SensorField::Temperature => "temperature",
            SensorField::Co2Density => "co2_density",
            SensorField::H2oDensity => "h2o_density",
        }
    }

    /// Zero-based column position in the delimited source.
    pub fn column_index(&self) -> usize {
        match self {
            SensorField::U => 0,
            SensorField::V => 1,
            SensorField::W => 2,
            SensorField::Temperature => 3,
            SensorField::Co2Density => 4,
            SensorField::H2oDensity => 5,
        }
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for SensorField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "u" => Ok(SensorField::U),
            "v" => Ok(SensorField::V),
            "w" => Ok(SensorField::W),
            "temperature" | "temp" | "t" => Ok(SensorField::Temperature),
            "co2_density" | "co2" | "c" => Ok(SensorField::Co2Density),
            "h2o_density" | "h2o" => Ok(SensorField::H2oDensity),
            other => Err(format!("unknown sensor field '{other}'")),
        }
    }
}

impl TryFrom<&str> for SensorField {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One high-frequency observation: wind components, air temperature and
/// the two gas densities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorRecord {
    pub u: f64,
    pub v: f64,
    pub w: f64,
    pub temperature: f64,
    pub co2_density: f64,
    pub h2o_density: f64,
}

impl SensorRecord {
    pub fn new(
        u: f64,
        v: f64,
        w: f64,
        temperature: f64,
        co2_density: f64,
        h2o_density: f64,
    ) -> Self {
        Self {
            u,
            v,
            w,
            temperature,
            co2_density,
            h2o_density,
        }
    }

    pub fn value(&self, field: SensorField) -> f64 {
        match field {
            SensorField::U => self.u,
            SensorField::V => self.v,
            SensorField::W => self.w,
            SensorField::Temperature => self.temperature,
            SensorField::Co2Density => self.co2_density,
            SensorField::H2oDensity => self.h2o_density,
        }
    }
}

/// Records in sampling order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSeries {
    records: Vec<SensorRecord>,
}

impl SensorSeries {
    pub fn new(records: Vec<SensorRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SensorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self, field: SensorField) -> Vec<f64> {
        self.records.iter().map(|record| record.value(field)).collect()
    }
}

impl From<Vec<SensorRecord>> for SensorSeries {
    fn from(records: Vec<SensorRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<SensorRecord> for SensorSeries {
    fn from_iter<I: IntoIterator<Item = SensorRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub header: Vec<String>,
    pub data_rows: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedSensorFile {
    pub file_hash: String,
    pub file_metadata: FileMetadata,
    pub series: SensorSeries,
}
