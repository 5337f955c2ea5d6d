use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use eddyflux_parser::SensorField;
use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::flux::FluxEstimate;
use crate::growth::GrowthSeries;
use crate::pipeline::DatasetReport;
use crate::statistics::RegressionResult;

/// Serializable digest of one analysed dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub file_hash: Option<String>,
    pub record_count: usize,
    pub predictor: SensorField,
    pub predictor_mean: f64,
    pub response: SensorField,
    pub response_mean: f64,
    pub regression: RegressionResult,
    pub flux: FluxEstimate,
}

impl DatasetSummary {
    pub fn from_report(name: &str, file_hash: Option<&str>, report: &DatasetReport) -> Self {
        Self {
            name: name.to_string(),
            file_hash: file_hash.map(str::to_string),
            record_count: report.record_count,
            predictor: report.predictor.field,
            predictor_mean: report.predictor.mean,
            response: report.response.field,
            response_mean: report.response.mean,
            regression: report.regression,
            flux: report.flux,
        }
    }
}

pub fn fluctuation_column_name(field: SensorField) -> String {
    format!("{}_prime", field.canonical_name())
}

pub fn fluctuation_frame(report: &DatasetReport) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new(
            fluctuation_column_name(report.predictor.field).into(),
            report.predictor.fluctuations.as_slice(),
        )
        .into(),
        Series::new(
            fluctuation_column_name(report.response.field).into(),
            report.response.fluctuations.as_slice(),
        )
        .into(),
    ])
}

/// One `step` column plus one `p_<initial>` column per run; shorter runs
/// are padded with nulls.
pub fn growth_frame(runs: &[GrowthSeries]) -> PolarsResult<DataFrame> {
    let height = runs.iter().map(GrowthSeries::len).max().unwrap_or(0);

    let mut columns: Vec<Column> = Vec::with_capacity(runs.len() + 1);
    columns.push(Series::new("step".into(), (0..height as i64).collect::<Vec<i64>>()).into());

    let labels: Vec<String> = runs
        .iter()
        .map(|run| format!("p_{}", run.initial_value))
        .collect();
    let names = unique_names(labels.iter().map(String::as_str));
    for (run, name) in runs.iter().zip(names) {
        let values: Vec<Option<f64>> = (0..height).map(|i| run.values.get(i).copied()).collect();
        columns.push(Series::new(name.into(), values).into());
    }

    DataFrame::new(columns)
}

/// Keeps the first occurrence of each name and suffixes later repeats with
/// their position, so `day, day` becomes `day, day_1`.
pub fn unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut candidate = name.to_string();
            let mut attempt = idx;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{name}_{attempt}");
                attempt += 1;
            }
            candidate
        })
        .collect()
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
