use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use eddyflux_core::{
    growth::{GrowthModel, GrowthSeries},
    kinetics::KineticsModel,
    pipeline::{AnalysisSettings, DatasetOutcome},
    statistics::summarize,
};

const KINETICS_ROWS: usize = 10;

pub fn flux_table(settings: &AnalysisSettings, outcomes: &[DatasetOutcome]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Dataset".to_string(),
            "Records".to_string(),
            format!("Slope ({} ~ {})", settings.response, settings.predictor),
            "Intercept".to_string(),
            "Correlation (r)".to_string(),
            "Covariance".to_string(),
            "Flux (µmol/m²/s)".to_string(),
        ]);

    for outcome in outcomes {
        let Ok(report) = &outcome.result else {
            continue;
        };
        table.add_row(vec![
            outcome.name.clone(),
            report.record_count.to_string(),
            format!("{:.4}", report.regression.slope),
            format!("{:.4}", report.regression.intercept),
            format!("{:.4}", report.regression.correlation),
            format!("{:.4e}", report.regression.covariance),
            format!("{:.4}", report.flux.flux),
        ]);
    }

    table
}

pub fn growth_table(model: &GrowthModel, runs: &[GrowthSeries]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            format!(
                "P0 (r={}, K={}, L={})",
                model.growth_rate, model.capacity, model.loss_term
            ),
            "Steps".to_string(),
            "Final".to_string(),
            "Mean".to_string(),
            "Std dev".to_string(),
            "Min".to_string(),
            "Max".to_string(),
        ]);

    for run in runs {
        let last = run
            .last()
            .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        let mut row = vec![run.initial_value.to_string(), run.len().to_string(), last];
        match summarize(&run.values) {
            Ok(summary) => row.extend([
                format!("{:.4}", summary.mean),
                format!("{:.4}", summary.std_dev),
                format!("{:.4}", summary.min),
                format!("{:.4}", summary.max),
            ]),
            Err(_) => row.extend(std::iter::repeat("-".to_string()).take(4)),
        }
        table.add_row(row);
    }

    table
}

pub fn kinetics_table(model: &KineticsModel, curve: &[(f64, f64)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            format!("[S] (Vmax={}, Km={})", model.vmax, model.km),
            "V".to_string(),
        ]);

    let stride = (curve.len() / KINETICS_ROWS).max(1);
    for (substrate, rate) in curve.iter().step_by(stride) {
        table.add_row(vec![format!("{substrate:.3}"), format!("{rate:.4}")]);
    }

    table
}
