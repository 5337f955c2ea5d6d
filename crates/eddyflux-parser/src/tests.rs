use std::fs;
use std::path::PathBuf;

use crate::errors::ParserError;
use crate::model::{SensorField, SensorRecord};
use crate::{parse_sensor_bytes, parse_sensor_file};

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn parses_daytime_fixture_and_skips_short_rows() {
    let content = fixture("daytime.eddies.csv");
    let parsed = parse_sensor_file(&content).expect("daytime parse failed");

    assert_eq!(
        parsed.file_metadata.header,
        vec!["u", "v", "w", "T", "co2", "h2o"]
    );
    assert_eq!(parsed.file_metadata.data_rows, 8);
    assert_eq!(parsed.file_metadata.skipped_rows, 1);
    assert_eq!(parsed.series.len(), 8);

    let first = parsed.series.records()[0];
    assert_eq!(first, SensorRecord::new(1.20, 0.35, 0.10, 25.1, 15.80, 520.1));

    let last = parsed.series.records()[7];
    assert!((last.w - (-0.20)).abs() < 1e-12);
    assert!((last.co2_density - 16.05).abs() < 1e-12);
}

#[test]
fn parses_nighttime_fixture_in_sampling_order() {
    let content = fixture("nighttime.eddies.csv");
    let parsed = parse_sensor_file(&content).expect("nighttime parse failed");

    assert_eq!(parsed.file_metadata.skipped_rows, 0);
    let w = parsed.series.values(SensorField::W);
    assert_eq!(w, vec![0.08, -0.06, 0.12, -0.10, 0.04, -0.08]);
}

#[test]
fn malformed_fields_become_zero() {
    let content = "u,v,w,T,co2,h2o\n1.0,bad,0.5,,17.0,n/a\n";
    let parsed = parse_sensor_file(content).expect("parse failed");

    let record = parsed.series.records()[0];
    assert_eq!(record.u, 1.0);
    assert_eq!(record.v, 0.0);
    assert_eq!(record.w, 0.5);
    assert_eq!(record.temperature, 0.0);
    assert_eq!(record.co2_density, 17.0);
    assert_eq!(record.h2o_density, 0.0);
}

#[test]
fn extra_columns_are_ignored_and_whitespace_trimmed() {
    let content = "u,v,w,T,co2,h2o,flag\n 1.0 , 2.0 ,3.0,4.0,5.0,6.0,ok\n";
    let parsed = parse_sensor_file(content).expect("parse failed");
    assert_eq!(
        parsed.series.records()[0],
        SensorRecord::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)
    );
}

#[test]
fn header_only_file_yields_empty_series() {
    let parsed = parse_sensor_file("u,v,w,T,co2,h2o\n").expect("parse failed");
    assert!(parsed.series.is_empty());
    assert_eq!(parsed.file_metadata.data_rows, 0);
}

#[test]
fn empty_content_is_missing_header() {
    let err = parse_sensor_file("").expect_err("empty content should fail");
    assert!(matches!(err, ParserError::MissingHeader { .. }));
}

#[test]
fn undecodable_field_becomes_zero_and_keeps_the_row() {
    let bytes = b"u,v,w,T,co2,h2o\n1,2,3,4,5,6\n1,2,3,4,\xff\xfe,6\n1,2,3,4,7,6\n";
    let parsed = parse_sensor_bytes(bytes).expect("parse failed");

    assert_eq!(parsed.series.len(), 3);
    assert_eq!(parsed.file_metadata.skipped_rows, 0);
    assert_eq!(
        parsed.series.values(SensorField::Co2Density),
        vec![5.0, 0.0, 7.0]
    );
    assert_eq!(parsed.series.records()[1].w, 3.0);
}

#[test]
fn undecodable_header_is_read_lossily() {
    let parsed = parse_sensor_bytes(b"u,v,w,T,c\xffo2,h2o\n1,2,3,4,5,6\n").expect("parse failed");
    assert_eq!(parsed.file_metadata.header.len(), 6);
    assert_eq!(parsed.series.len(), 1);
}

#[test]
fn identical_content_hashes_identically() {
    let content = fixture("nighttime.eddies.csv");
    let a = parse_sensor_file(&content).expect("parse a");
    let b = parse_sensor_bytes(content.as_bytes()).expect("parse b");
    assert_eq!(a.file_hash, b.file_hash);
    assert_eq!(a.file_hash.len(), 64);

    let other = parse_sensor_file(&fixture("daytime.eddies.csv")).expect("parse other");
    assert_ne!(a.file_hash, other.file_hash);
}

#[test]
fn sensor_field_names_round_trip_through_serde_and_from_str() {
    for field in SensorField::ALL {
        let parsed: SensorField = field.canonical_name().parse().expect("known field");
        assert_eq!(parsed, field);
        let json = serde_json::to_string(&field).expect("serialize");
        assert_eq!(json, format!("\"{}\"", field.canonical_name()));
    }

    assert_eq!("CO2".parse::<SensorField>(), Ok(SensorField::Co2Density));
    let aliased: SensorField = serde_json::from_str("\"co2\"").expect("alias");
    assert_eq!(aliased, SensorField::Co2Density);
    assert!("pressure".parse::<SensorField>().is_err());
}
