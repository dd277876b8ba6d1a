use std::io::{Cursor, Read};

use csv::ReaderBuilder;
use zip::ZipArchive;

use crate::errors::ParserError;
use crate::model::AmbientSeries;

use super::{parse_optional_f64, parse_timestamp};

const NAME: &str = "LAPUP";

static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

const TIME_FIELD: usize = 0;
const AIR_TEMPERATURE_FIELD: usize = 4;
const HUMIDITY_FIELD: usize = 5;
const WIND_SPEED_FIELD: usize = 6;
const WIND_DIRECTION_FIELD: usize = 7;
const WIND_GUST_FIELD: usize = 8;

/// Parses a fixed-station minute-data export: one header line, then rows with
/// the timestamp in column 0 and air temperature, relative humidity, wind
/// speed, wind direction and wind gust in columns 4-8.
pub fn parse_ambient_file(content: &str) -> Result<AmbientSeries, ParserError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut series = AmbientSeries::default();

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| ParserError::Csv {
            parser: NAME,
            source,
        })?;
        // header occupies line 1
        let line_index = idx + 2;

        if record.len() <= 1 && record.get(0).map_or(true, |f| f.trim().is_empty()) {
            continue;
        }
        if record.len() <= WIND_GUST_FIELD {
            return Err(ParserError::DataRow {
                parser: NAME,
                line_index,
                message: format!(
                    "expected at least {} fields, found {}",
                    WIND_GUST_FIELD + 1,
                    record.len()
                ),
            });
        }

        let ts = parse_timestamp(
            NAME,
            TIMESTAMP_FORMATS,
            record.get(TIME_FIELD).unwrap_or_default(),
            line_index,
        )?;

        series.timestamps.push(ts);
        series.air_temperature.push(parse_optional_f64(
            NAME,
            record.get(AIR_TEMPERATURE_FIELD).unwrap_or_default(),
            line_index,
            "air_temperature",
        )?);
        series.humidity.push(parse_optional_f64(
            NAME,
            record.get(HUMIDITY_FIELD).unwrap_or_default(),
            line_index,
            "humidity",
        )?);
        series.wind_speed.push(parse_optional_f64(
            NAME,
            record.get(WIND_SPEED_FIELD).unwrap_or_default(),
            line_index,
            "wind_speed",
        )?);
        series.wind_direction.push(parse_optional_f64(
            NAME,
            record.get(WIND_DIRECTION_FIELD).unwrap_or_default(),
            line_index,
            "wind_direction",
        )?);
        series.wind_gust.push(parse_optional_f64(
            NAME,
            record.get(WIND_GUST_FIELD).unwrap_or_default(),
            line_index,
            "wind_gust",
        )?);
    }

    Ok(series)
}

/// Reads the first CSV entry of a ZIP archive; station exports arrive zipped
/// month by month.
pub fn parse_ambient_zip(bytes: &[u8]) -> Result<AmbientSeries, ParserError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|source| ParserError::Zip {
            parser: NAME,
            source,
        })?;

    let mut csv_index = None;
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(|source| ParserError::Zip {
            parser: NAME,
            source,
        })?;
        if entry.name().to_ascii_lowercase().ends_with(".csv") {
            csv_index = Some(index);
            break;
        }
    }

    let index = csv_index.ok_or(ParserError::EmptyArchive { parser: NAME })?;
    let mut entry = archive.by_index(index).map_err(|source| ParserError::Zip {
        parser: NAME,
        source,
    })?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|source| ParserError::Io {
            parser: NAME,
            source,
        })?;

    parse_ambient_file(&content)
}
