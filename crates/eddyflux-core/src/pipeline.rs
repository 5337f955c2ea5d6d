use std::path::Path;

use eddyflux_parser::{parse_sensor_bytes, SensorField, SensorSeries};
use tracing::{debug, info, warn};

use crate::decomposition::{decompose, Decomposition};
use crate::error::{Result, StatsResult};
use crate::flux::{FluxEstimate, FluxEstimator};
use crate::statistics::{analyze, BivariatePair, RegressionOptions, RegressionResult};

/// Which fields play predictor and response, and how to fit and convert.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub predictor: SensorField,
    pub response: SensorField,
    pub regression: RegressionOptions,
    pub flux: FluxEstimator,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            predictor: SensorField::W,
            response: SensorField::Co2Density,
            regression: RegressionOptions::default(),
            flux: FluxEstimator::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetInput {
    pub name: String,
    pub file_hash: Option<String>,
    pub series: SensorSeries,
}

impl DatasetInput {
    pub fn new(name: impl Into<String>, series: SensorSeries) -> Self {
        Self {
            name: name.into(),
            file_hash: None,
            series,
        }
    }

    /// Reads and parses one delimited file; the dataset is named after the file stem.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let parsed = parse_sensor_bytes(&bytes)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(
            dataset = %name,
            rows = parsed.file_metadata.data_rows,
            skipped = parsed.file_metadata.skipped_rows,
            "parsed sensor file"
        );

        Ok(Self {
            name,
            file_hash: Some(parsed.file_hash),
            series: parsed.series,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub record_count: usize,
    pub predictor: Decomposition,
    pub response: Decomposition,
    pub regression: RegressionResult,
    pub flux: FluxEstimate,
}

#[derive(Debug)]
pub struct DatasetOutcome {
    pub name: String,
    pub file_hash: Option<String>,
    pub result: StatsResult<DatasetReport>,
}

/// Decompose both fields, relate their fluctuations, convert the covariance.
pub fn analyze_series(
    series: &SensorSeries,
    settings: &AnalysisSettings,
) -> StatsResult<DatasetReport> {
    let predictor = decompose(series, settings.predictor)?;
    let response = decompose(series, settings.response)?;

    let pair = BivariatePair::new(
        predictor.fluctuations.as_slice(),
        response.fluctuations.as_slice(),
    );
    let regression = analyze(pair, &settings.regression)?;
    let flux = settings.flux.estimate(regression.covariance)?;

    Ok(DatasetReport {
        record_count: series.len(),
        predictor,
        response,
        regression,
        flux,
    })
}

/// Each dataset is analysed in isolation; a failure is recorded against
/// its own outcome and the remaining datasets still run.
pub fn analyze_datasets(
    inputs: &[DatasetInput],
    settings: &AnalysisSettings,
) -> Vec<DatasetOutcome> {
    inputs
        .iter()
        .map(|input| {
            info!(
                dataset = %input.name,
                records = input.series.len(),
                predictor = %settings.predictor,
                response = %settings.response,
                "analysing dataset"
            );
            let result = analyze_series(&input.series, settings);
            match &result {
                Ok(report) => info!(
                    dataset = %input.name,
                    covariance = report.regression.covariance,
                    flux = report.flux.flux,
                    "dataset analysed"
                ),
                Err(err) => warn!(dataset = %input.name, error = %err, "dataset failed"),
            }
            DatasetOutcome {
                name: input.name.clone(),
                file_hash: input.file_hash.clone(),
                result,
            }
        })
        .collect()
}
