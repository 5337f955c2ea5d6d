//! Bivariate statistics over index-aligned series: least-squares fit,
//! Pearson correlation and sample covariance, with optional observation
//! weights (`None` means every observation has weight one).

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Two index-aligned series with their roles spelled out.
#[derive(Debug, Clone, Copy)]
pub struct BivariatePair<'a> {
    pub predictor: &'a [f64],
    pub response: &'a [f64],
}

impl<'a> BivariatePair<'a> {
    pub fn new(predictor: &'a [f64], response: &'a [f64]) -> Self {
        Self {
            predictor,
            response,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionOptions {
    pub weights: Option<Vec<f64>>,
    pub force_origin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
    pub covariance: f64,
}

impl RegressionResult {
    pub fn fit(&self) -> LinearFit {
        LinearFit {
            slope: self.slope,
            intercept: self.intercept,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Weighted first and second moments of a validated pair.
#[derive(Debug, Clone, Copy)]
struct Moments {
    count: usize,
    sum_weights: f64,
    predictor_mean: f64,
    response_mean: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
    /// Uncentred `sum(w * x^2)` and `sum(w * y^2)`, the scale for rounding residue.
    raw_xx: f64,
    raw_yy: f64,
}

impl Moments {
    fn predictor_is_flat(&self) -> bool {
        is_rounding_residue(self.sxx, self.raw_xx, self.count)
    }

    fn response_is_flat(&self) -> bool {
        is_rounding_residue(self.syy, self.raw_yy, self.count)
    }
}

pub fn analyze(
    pair: BivariatePair<'_>,
    options: &RegressionOptions,
) -> StatsResult<RegressionResult> {
    let fit = linear_regression(pair, options)?;
    let weights = options.weights.as_deref();
    let correlation = correlation(pair, weights)?;
    let covariance = covariance(pair, weights)?;

    Ok(RegressionResult {
        slope: fit.slope,
        intercept: fit.intercept,
        correlation,
        covariance,
    })
}

pub fn linear_regression(
    pair: BivariatePair<'_>,
    options: &RegressionOptions,
) -> StatsResult<LinearFit> {
    let weights = options.weights.as_deref();
    validate(pair, weights)?;

    if options.force_origin {
        let (sxy, sxx) = pair
            .predictor
            .iter()
            .zip(pair.response)
            .enumerate()
            .fold((0.0, 0.0), |(sxy, sxx), (idx, (&x, &y))| {
                let w = weight_at(weights, idx);
                (sxy + w * x * y, sxx + w * x * x)
            });
        ensure_finite_value("sum(w*x*y)", sxy)?;
        ensure_finite_value("sum(w*x^2)", sxx)?;
        if sxx <= 0.0 {
            return Err(StatsError::DegenerateSeries("predictor"));
        }
        return Ok(LinearFit {
            slope: ensure_finite_value("slope", sxy / sxx)?,
            intercept: 0.0,
        });
    }

    let moments = moments(pair, weights)?;
    if is_constant(pair.predictor) || moments.predictor_is_flat() {
        return Err(StatsError::DegenerateSeries("predictor"));
    }

    let slope = ensure_finite_value("slope", moments.sxy / moments.sxx)?;
    let intercept = ensure_finite_value(
        "intercept",
        moments.response_mean - slope * moments.predictor_mean,
    )?;
    Ok(LinearFit { slope, intercept })
}

pub fn correlation(pair: BivariatePair<'_>, weights: Option<&[f64]>) -> StatsResult<f64> {
    validate(pair, weights)?;
    let moments = moments(pair, weights)?;

    if is_constant(pair.predictor) || moments.predictor_is_flat() {
        return Err(StatsError::DegenerateSeries("predictor"));
    }
    if is_constant(pair.response) || moments.response_is_flat() {
        return Err(StatsError::DegenerateSeries("response"));
    }

    ensure_finite_value(
        "correlation",
        moments.sxy / (moments.sxx.sqrt() * moments.syy.sqrt()),
    )
}

/// Sample covariance; means are always re-derived from the inputs.
pub fn covariance(pair: BivariatePair<'_>, weights: Option<&[f64]>) -> StatsResult<f64> {
    validate(pair, weights)?;
    let moments = moments(pair, weights)?;
    ensure_finite_value("covariance", moments.sxy / (moments.sum_weights - 1.0))
}

pub fn summarize(values: &[f64]) -> StatsResult<SeriesSummary> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput("series"));
    }
    if values.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            available: values.len(),
        });
    }
    ensure_finite("series", values)?;

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    Ok(SeriesSummary {
        count,
        mean,
        variance,
        std_dev: variance.sqrt(),
        min,
        max,
    })
}

fn validate(pair: BivariatePair<'_>, weights: Option<&[f64]>) -> StatsResult<()> {
    let n = pair.predictor.len();
    if n != pair.response.len() {
        return Err(StatsError::LengthMismatch {
            left: "predictor",
            left_len: n,
            right: "response",
            right_len: pair.response.len(),
        });
    }
    if let Some(weights) = weights {
        if weights.len() != n {
            return Err(StatsError::LengthMismatch {
                left: "weights",
                left_len: weights.len(),
                right: "predictor",
                right_len: n,
            });
        }
    }
    if n == 0 {
        return Err(StatsError::EmptyInput("predictor"));
    }
    if n < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            available: n,
        });
    }

    ensure_finite("predictor", pair.predictor)?;
    ensure_finite("response", pair.response)?;

    if let Some(weights) = weights {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(StatsError::InvalidInput(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 1.0 {
            return Err(StatsError::InvalidInput(format!(
                "weights must sum to more than one, got {sum}"
            )));
        }
    }

    Ok(())
}

fn ensure_finite(name: &str, values: &[f64]) -> StatsResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(StatsError::InvalidInput(format!(
            "{name} value at index {idx} is not finite"
        ))),
        None => Ok(()),
    }
}

/// Errors with `InvalidInput` when finite inputs overflow a sum.
fn moments(pair: BivariatePair<'_>, weights: Option<&[f64]>) -> StatsResult<Moments> {
    let mut sum_weights = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for (idx, (&x, &y)) in pair.predictor.iter().zip(pair.response).enumerate() {
        let w = weight_at(weights, idx);
        sum_weights += w;
        sum_x += w * x;
        sum_y += w * y;
    }
    let predictor_mean = sum_x / sum_weights;
    let response_mean = sum_y / sum_weights;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    let mut raw_xx = 0.0;
    let mut raw_yy = 0.0;
    for (idx, (&x, &y)) in pair.predictor.iter().zip(pair.response).enumerate() {
        let w = weight_at(weights, idx);
        let dx = x - predictor_mean;
        let dy = y - response_mean;
        sxx += w * dx * dx;
        syy += w * dy * dy;
        sxy += w * dx * dy;
        raw_xx += w * x * x;
        raw_yy += w * y * y;
    }

    let moments = Moments {
        count: pair.predictor.len(),
        sum_weights: ensure_finite_value("weight sum", sum_weights)?,
        predictor_mean: ensure_finite_value("predictor mean", predictor_mean)?,
        response_mean: ensure_finite_value("response mean", response_mean)?,
        sxx: ensure_finite_value("predictor sum of squares", sxx)?,
        syy: ensure_finite_value("response sum of squares", syy)?,
        sxy: ensure_finite_value("cross product sum", sxy)?,
        raw_xx,
        raw_yy,
    };
    Ok(moments)
}

fn ensure_finite_value(name: &str, value: f64) -> StatsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatsError::InvalidInput(format!(
            "{name} overflows for the given values"
        )))
    }
}

/// A centred sum of squares no larger than the rounding error of centring
/// `count` values of magnitude `raw` counts as zero spread.
fn is_rounding_residue(centred: f64, raw: f64, count: usize) -> bool {
    if centred <= 0.0 {
        return true;
    }
    raw.is_finite() && centred <= 4.0 * (count as f64 * f64::EPSILON).powi(2) * raw
}

fn weight_at(weights: Option<&[f64]>, idx: usize) -> f64 {
    weights.map_or(1.0, |w| w[idx])
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}
