//! Reynolds decomposition: split a field into its mean and the per-record
//! fluctuation around that mean.

use eddyflux_parser::{SensorField, SensorSeries};
use serde::Serialize;

use crate::error::{StatsError, StatsResult};

/// Per-record deviations from a series mean, index-aligned with the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FluctuationSeries(Vec<f64>);

impl FluctuationSeries {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for FluctuationSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    pub field: SensorField,
    pub mean: f64,
    pub fluctuations: FluctuationSeries,
}

pub fn field_mean(series: &SensorSeries, field: SensorField) -> StatsResult<f64> {
    if series.is_empty() {
        return Err(StatsError::EmptyInput("sensor series"));
    }
    let sum: f64 = series.records().iter().map(|record| record.value(field)).sum();
    Ok(sum / series.len() as f64)
}

pub fn decompose(series: &SensorSeries, field: SensorField) -> StatsResult<Decomposition> {
    let mean = field_mean(series, field)?;
    let fluctuations = series
        .records()
        .iter()
        .map(|record| record.value(field) - mean)
        .collect();

    Ok(Decomposition {
        field,
        mean,
        fluctuations: FluctuationSeries(fluctuations),
    })
}

/// Same split for a bare series, e.g. simulated output.
pub fn decompose_values(values: &[f64]) -> StatsResult<(f64, FluctuationSeries)> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput("series"));
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let fluctuations = values.iter().map(|value| value - mean).collect();
    Ok((mean, FluctuationSeries(fluctuations)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddyflux_parser::SensorRecord;

    fn series(w: &[f64]) -> SensorSeries {
        w.iter()
            .map(|&w| SensorRecord::new(1.0, 0.0, w, 20.0, 15.0, 500.0))
            .collect()
    }

    #[test]
    fn mean_and_fluctuations_of_vertical_wind() {
        let decomposition = decompose(&series(&[1.0, 2.0, 3.0, 6.0]), SensorField::W).unwrap();
        assert_eq!(decomposition.field, SensorField::W);
        assert_eq!(decomposition.mean, 3.0);
        assert_eq!(decomposition.fluctuations.as_slice(), &[-2.0, -1.0, 0.0, 3.0]);
    }

    #[test]
    fn constant_field_has_zero_fluctuations() {
        let decomposition = decompose(&series(&[0.5, 0.25]), SensorField::Co2Density).unwrap();
        assert_eq!(decomposition.mean, 15.0);
        assert!(decomposition.fluctuations.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn empty_series_is_an_error_not_nan() {
        let empty = SensorSeries::default();
        assert_eq!(
            field_mean(&empty, SensorField::W),
            Err(StatsError::EmptyInput("sensor series"))
        );
        assert!(decompose(&empty, SensorField::W).is_err());
        assert!(decompose_values(&[]).is_err());
    }

    #[test]
    fn decompose_values_matches_field_decomposition() {
        let values = [0.1, -0.3, 0.7];
        let (mean, fluctuations) = decompose_values(&values).unwrap();
        let by_field = decompose(&series(&values), SensorField::W).unwrap();
        assert_eq!(mean, by_field.mean);
        assert_eq!(fluctuations, by_field.fluctuations);
    }
}
