use std::path::Path;

use eddyflux_parser::SensorField;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::flux::{FluxEstimator, DEFAULT_CONVERSION_CONSTANT};
use crate::growth::GrowthModel;
use crate::kinetics::KineticsModel;
use crate::pipeline::AnalysisSettings;
use crate::statistics::RegressionOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EddyfluxConfig {
    pub flux: FluxConfig,
    pub regression: RegressionConfig,
    pub growth: GrowthConfig,
    pub kinetics: KineticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxConfig {
    pub conversion_constant: f64,
}

impl Default for FluxConfig {
    fn default() -> Self {
        Self {
            conversion_constant: DEFAULT_CONVERSION_CONSTANT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    pub predictor: SensorField,
    pub response: SensorField,
    pub force_origin: bool,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            predictor: SensorField::W,
            response: SensorField::Co2Density,
            force_origin: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub growth_rate: f64,
    pub capacity: f64,
    pub loss_term: f64,
    pub initial_values: Vec<f64>,
    pub step_count: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        let model = GrowthModel::default();
        Self {
            growth_rate: model.growth_rate,
            capacity: model.capacity,
            loss_term: model.loss_term,
            initial_values: vec![100.0],
            step_count: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsConfig {
    pub vmax: f64,
    pub km: f64,
    pub points: usize,
    pub step: f64,
}

impl Default for KineticsConfig {
    fn default() -> Self {
        let model = KineticsModel::default();
        Self {
            vmax: model.vmax,
            km: model.km,
            points: 100,
            step: 0.05,
        }
    }
}

impl EddyfluxConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("flux.conversion_constant", self.flux.conversion_constant)?;

        if self.regression.predictor == self.regression.response {
            return Err(ConfigError::Invalid(format!(
                "regression.predictor and regression.response must differ, both are '{}'",
                self.regression.predictor
            )));
        }

        let growth = &self.growth;
        ensure_finite("growth.growth_rate", growth.growth_rate)?;
        ensure_finite("growth.capacity", growth.capacity)?;
        ensure_finite("growth.loss_term", growth.loss_term)?;
        if growth.capacity == 0.0 {
            return Err(ConfigError::Invalid("growth.capacity must be non-zero".into()));
        }
        if growth.loss_term == 0.0 {
            return Err(ConfigError::Invalid("growth.loss_term must be non-zero".into()));
        }
        for value in &growth.initial_values {
            ensure_finite("growth.initial_values", *value)?;
        }

        let kinetics = &self.kinetics;
        ensure_finite("kinetics.vmax", kinetics.vmax)?;
        ensure_finite("kinetics.km", kinetics.km)?;
        ensure_finite("kinetics.step", kinetics.step)?;
        if kinetics.km == 0.0 {
            return Err(ConfigError::Invalid("kinetics.km must be non-zero".into()));
        }
        if kinetics.step <= 0.0 {
            return Err(ConfigError::Invalid("kinetics.step must be positive".into()));
        }

        Ok(())
    }

    pub fn analysis_settings(&self) -> Result<AnalysisSettings, ConfigError> {
        let flux = FluxEstimator::new(self.flux.conversion_constant)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(AnalysisSettings {
            predictor: self.regression.predictor,
            response: self.regression.response,
            regression: RegressionOptions {
                weights: None,
                force_origin: self.regression.force_origin,
            },
            flux,
        })
    }

    pub fn growth_model(&self) -> GrowthModel {
        GrowthModel {
            growth_rate: self.growth.growth_rate,
            capacity: self.growth.capacity,
            loss_term: self.growth.loss_term,
        }
    }

    pub fn kinetics_model(&self) -> KineticsModel {
        KineticsModel {
            vmax: self.kinetics.vmax,
            km: self.kinetics.km,
        }
    }
}

fn ensure_finite(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{key} must be finite, got {value}")))
    }
}
