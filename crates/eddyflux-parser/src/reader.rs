use blake3::Hasher;
use csv::{ByteRecord, ReaderBuilder};

use crate::errors::ParserError;
use crate::model::{FileMetadata, ParsedSensorFile, SensorRecord, SensorSeries};

const PARSER_NAME: &str = "EDDY_CSV";
const RECORD_WIDTH: usize = 6;

pub fn parse_sensor_file(content: &str) -> Result<ParsedSensorFile, ParserError> {
    parse_sensor_bytes(content.as_bytes())
}

pub fn parse_sensor_bytes(bytes: &[u8]) -> Result<ParsedSensorFile, ParserError> {
    let file_hash = compute_hash(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = reader.byte_records();
    let header = match rows.next() {
        Some(row) => row.map_err(csv_error)?,
        None => return Err(ParserError::MissingHeader { parser: PARSER_NAME }),
    };

    let mut records = Vec::new();
    let mut skipped_rows = 0;
    for row in rows {
        let row = row.map_err(csv_error)?;
        match record_from_row(&row) {
            Some(record) => records.push(record),
            None => skipped_rows += 1,
        }
    }

    Ok(ParsedSensorFile {
        file_hash,
        file_metadata: FileMetadata {
            header: header
                .iter()
                .map(|column| String::from_utf8_lossy(column).trim().to_string())
                .collect(),
            data_rows: records.len(),
            skipped_rows,
        },
        series: SensorSeries::new(records),
    })
}

fn record_from_row(row: &ByteRecord) -> Option<SensorRecord> {
    if row.len() < RECORD_WIDTH {
        return None;
    }
    let field = |idx: usize| parse_lenient_f64(row.get(idx).unwrap_or_default());
    Some(SensorRecord::new(
        field(0),
        field(1),
        field(2),
        field(3),
        field(4),
        field(5),
    ))
}

/// Unparseable values, undecodable bytes included, count as zero rather
/// than rejecting the row.
fn parse_lenient_f64(value: &[u8]) -> f64 {
    std::str::from_utf8(value)
        .ok()
        .and_then(|text| text.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn csv_error(source: csv::Error) -> ParserError {
    ParserError::Csv {
        parser: PARSER_NAME,
        source,
    }
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
