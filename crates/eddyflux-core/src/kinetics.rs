use serde::{Deserialize, Serialize};

/// Michaelis-Menten saturation: `V = Vmax * S / (Km + S)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticsModel {
    pub vmax: f64,
    pub km: f64,
}

impl Default for KineticsModel {
    fn default() -> Self {
        Self { vmax: 1.0, km: 0.5 }
    }
}

impl KineticsModel {
    pub fn rate(&self, substrate: f64) -> f64 {
        (self.vmax * substrate) / (self.km + substrate)
    }
}

/// Samples `(S, V)` at `S = i * step` for `i in 0..points`.
pub fn rate_curve(model: &KineticsModel, points: usize, step: f64) -> Vec<(f64, f64)> {
    (0..points)
        .map(|i| {
            let substrate = i as f64 * step;
            (substrate, model.rate(substrate))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_vmax_at_km() {
        let model = KineticsModel::default();
        assert_eq!(model.rate(0.0), 0.0);
        assert!((model.rate(model.km) - model.vmax / 2.0).abs() < 1e-12);
    }

    #[test]
    fn curve_is_sampled_on_a_regular_grid_and_saturates() {
        let model = KineticsModel::default();
        let curve = rate_curve(&model, 100, 0.05);
        assert_eq!(curve.len(), 100);
        assert!((curve[10].0 - 0.5).abs() < 1e-12);
        assert!(curve.windows(2).all(|pair| pair[1].1 > pair[0].1));
        assert!(curve.iter().all(|(_, v)| *v < model.vmax));
        assert!(rate_curve(&model, 0, 0.05).is_empty());
    }
}
