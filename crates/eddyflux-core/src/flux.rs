use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Folded molar-mass and unit-scale factor applied to a w'c' covariance.
/// Kept as a single value; the components are not separated.
pub const DEFAULT_CONVERSION_CONSTANT: f64 = 22.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxEstimator {
    conversion_constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxEstimate {
    pub covariance: f64,
    pub flux: f64,
}

impl Default for FluxEstimator {
    fn default() -> Self {
        Self {
            conversion_constant: DEFAULT_CONVERSION_CONSTANT,
        }
    }
}

impl FluxEstimator {
    pub fn new(conversion_constant: f64) -> StatsResult<Self> {
        if !conversion_constant.is_finite() {
            return Err(StatsError::InvalidInput(format!(
                "conversion constant must be finite, got {conversion_constant}"
            )));
        }
        Ok(Self {
            conversion_constant,
        })
    }

    pub fn conversion_constant(&self) -> f64 {
        self.conversion_constant
    }

    pub fn estimate(&self, covariance: f64) -> StatsResult<FluxEstimate> {
        if !covariance.is_finite() {
            return Err(StatsError::InvalidInput(format!(
                "covariance must be finite, got {covariance}"
            )));
        }
        let flux = covariance * self.conversion_constant;
        if !flux.is_finite() {
            return Err(StatsError::InvalidInput(format!(
                "flux overflows for covariance {covariance}"
            )));
        }
        Ok(FluxEstimate { covariance, flux })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_scales_covariance_by_constant() {
        let estimator = FluxEstimator::new(1000.0).unwrap();
        let estimate = estimator.estimate(0.0025).unwrap();
        assert_eq!(estimate.covariance, 0.0025);
        assert!((estimate.flux - 2.5).abs() < 1e-12);
    }

    #[test]
    fn flux_is_linear_in_covariance() {
        let estimator = FluxEstimator::default();
        for cov in [-0.37, 0.0, 1e-6, 4.2] {
            let single = estimator.estimate(cov).unwrap().flux;
            let double = estimator.estimate(2.0 * cov).unwrap().flux;
            assert_eq!(double, 2.0 * single);
        }
    }

    #[test]
    fn non_finite_covariance_is_rejected() {
        let estimator = FluxEstimator::default();
        for cov in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                estimator.estimate(cov),
                Err(StatsError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn overflowing_flux_is_rejected() {
        let estimator = FluxEstimator::default();
        assert!(matches!(
            estimator.estimate(1.0e302),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            estimator.estimate(-1.0e302),
            Err(StatsError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_finite_constant_is_rejected() {
        assert!(FluxEstimator::new(f64::NAN).is_err());
        assert_eq!(
            FluxEstimator::default().conversion_constant(),
            DEFAULT_CONVERSION_CONSTANT
        );
    }
}
