//! Discrete logistic growth with a constant loss term:
//!
//! `P[i] = P[i-1] + r * (1 - P[i-1]/K - 1/L) * P[i-1]`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    pub growth_rate: f64,
    pub capacity: f64,
    pub loss_term: f64,
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self {
            growth_rate: 0.36,
            capacity: 750.0,
            loss_term: 3.0,
        }
    }
}

impl GrowthModel {
    pub fn step(&self, previous: f64) -> f64 {
        previous
            + self.growth_rate * (1.0 - previous / self.capacity - 1.0 / self.loss_term) * previous
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSeries {
    pub initial_value: f64,
    pub values: Vec<f64>,
}

impl GrowthSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// One independent run per initial value, each `step_count` long.
pub fn simulate_batch(
    model: &GrowthModel,
    initial_values: &[f64],
    step_count: usize,
) -> Vec<GrowthSeries> {
    initial_values
        .iter()
        .map(|&initial_value| {
            let values = std::iter::successors(Some(initial_value), |&previous| {
                Some(model.step(previous))
            })
            .take(step_count)
            .collect();
            GrowthSeries {
                initial_value,
                values,
            }
        })
        .collect()
}

pub fn simulate(model: &GrowthModel, initial_value: f64, step_count: usize) -> GrowthSeries {
    simulate_batch(model, &[initial_value], step_count)
        .pop()
        .unwrap_or(GrowthSeries {
            initial_value,
            values: Vec::new(),
        })
}
