use anyhow::Result;
use eddyflux_core::{
    growth::{simulate_batch, GrowthModel},
    outputs::{
        fluctuation_frame, growth_frame, unique_names, write_csv, write_json, DatasetSummary,
    },
    pipeline::{analyze_series, AnalysisSettings},
    SensorRecord, SensorSeries,
};

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("eddyflux-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn small_series() -> SensorSeries {
    [(4.0, 13.0), (5.0, 15.0), (6.0, 17.0)]
        .iter()
        .map(|&(w, c)| SensorRecord::new(1.0, 0.0, w, 20.0, c, 500.0))
        .collect()
}

#[test]
fn fluctuation_frame_names_columns_after_fields() -> Result<()> {
    let report = analyze_series(&small_series(), &AnalysisSettings::default())?;
    let df = fluctuation_frame(&report)?;

    assert_eq!(df.get_column_names(), vec!["w_prime", "co2_density_prime"]);
    assert_eq!(df.height(), 3);
    let w = df.column("w_prime")?.f64()?;
    assert_eq!(w.get(0), Some(-1.0));
    assert_eq!(w.get(2), Some(1.0));
    Ok(())
}

#[test]
fn growth_frame_has_one_column_per_run() -> Result<()> {
    let runs = simulate_batch(&GrowthModel::default(), &[100.0, 250.0, 100.0], 5);
    let df = growth_frame(&runs)?;

    assert_eq!(
        df.get_column_names(),
        vec!["step", "p_100", "p_250", "p_100_2"]
    );
    assert_eq!(df.height(), 5);
    let step = df.column("step")?.i64()?;
    assert_eq!(step.get(4), Some(4));
    let first = df.column("p_100")?.f64()?;
    assert_eq!(first.get(0), Some(100.0));
    assert_eq!(first.get(1), Some(runs[0].values[1]));
    Ok(())
}

#[test]
fn empty_growth_batch_gives_empty_frame() -> Result<()> {
    let df = growth_frame(&[])?;
    assert_eq!(df.height(), 0);
    assert_eq!(df.get_column_names(), vec!["step"]);
    Ok(())
}

#[test]
fn csv_and_json_exports_are_written() -> Result<()> {
    let dir = scratch_dir("exports");
    let report = analyze_series(&small_series(), &AnalysisSettings::default())?;

    let csv_path = dir.join("fluctuations.csv");
    let mut df = fluctuation_frame(&report)?;
    write_csv(&mut df, &csv_path)?;
    let csv_text = std::fs::read_to_string(&csv_path)?;
    let mut lines = csv_text.lines();
    assert_eq!(lines.next(), Some("w_prime,co2_density_prime"));
    assert_eq!(lines.count(), 3);

    let json_path = dir.join("summary.json");
    let summary = DatasetSummary::from_report("synthetic", Some("abc123"), &report);
    write_json(&summary, &json_path)?;
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
    assert_eq!(value["name"], "synthetic");
    assert_eq!(value["predictor"], "w");
    assert_eq!(value["response"], "co2_density");
    assert_eq!(value["record_count"], 3);
    assert_eq!(value["regression"]["covariance"], 2.0);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn repeated_dataset_names_get_distinct_artifact_stems() {
    let names = unique_names(["day", "night", "day", "day", "day_2"]);
    assert_eq!(names, vec!["day", "night", "day_2", "day_3", "day_2_4"]);
}
