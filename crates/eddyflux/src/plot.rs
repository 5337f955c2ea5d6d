use std::ops::Range;
use std::path::Path;

use anyhow::Result;
use eddyflux_core::{growth::GrowthSeries, pipeline::DatasetReport};
use plotters::prelude::*;

const SCATTER_SIZE: (u32, u32) = (600, 600);
const LINE_SIZE: (u32, u32) = (800, 400);

/// Predictor fluctuations on x, response fluctuations on y, plus the fitted line.
pub fn fluctuation_scatter(path: &Path, name: &str, report: &DatasetReport) -> Result<()> {
    let points: Vec<(f64, f64)> = report
        .predictor
        .fluctuations
        .iter()
        .zip(report.response.fluctuations.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    let fit = report.regression.fit();
    let x_range = padded_range(points.iter().map(|p| p.0));
    let line = [
        (x_range.start, fit.predict(x_range.start)),
        (x_range.end, fit.predict(x_range.end)),
    ];
    let y_range = padded_range(points.iter().map(|p| p.1).chain(line.iter().map(|p| p.1)));

    let root = SVGBackend::new(path, SCATTER_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "{name}: {} vs {}",
                report.response.field, report.predictor.field
            ),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} perturbation ({}')", report.predictor.field, report.predictor.field))
        .y_desc(format!("{} perturbation ({}')", report.response.field, report.response.field))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 3, BLUE.mix(0.6).filled())),
    )?;
    chart.draw_series(LineSeries::new(line, RED.stroke_width(2)))?;

    root.present()?;
    Ok(())
}

pub fn growth_lines(path: &Path, runs: &[GrowthSeries]) -> Result<()> {
    let series: Vec<(String, Vec<(f64, f64)>)> = runs
        .iter()
        .map(|run| {
            let points = run
                .values
                .iter()
                .enumerate()
                .map(|(step, &value)| (step as f64, value))
                .collect();
            (format!("P0 = {}", run.initial_value), points)
        })
        .collect();

    line_chart(path, "Plant Carbon Over Time", "Time", "P (Plant Carbon)", &series)
}

pub fn rate_curve_line(path: &Path, curve: &[(f64, f64)]) -> Result<()> {
    let series = vec![("Michaelis-Menten".to_string(), curve.to_vec())];
    line_chart(
        path,
        "Michaelis-Menten",
        "Substrate Concentration [S]",
        "Reaction Rate (V)",
        &series,
    )
}

fn line_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<()> {
    let all_points = || series.iter().flat_map(|(_, points)| points.iter());
    let x_range = padded_range(all_points().map(|p| p.0));
    let y_range = padded_range(all_points().map(|p| p.1).chain(std::iter::once(0.0)));

    let root = SVGBackend::new(path, LINE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Data extent widened by 5% on each side; empty or flat data gets a unit span.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    if span <= 0.0 {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = span * 0.05;
    (min - pad)..(max + pad)
}
