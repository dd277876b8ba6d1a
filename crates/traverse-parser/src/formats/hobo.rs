use csv::ReaderBuilder;

use crate::errors::ParserError;
use crate::model::LoggerSeries;

use super::{parse_optional_f64, parse_timestamp};

const NAME: &str = "HOBO";

// HOBOware exports month-first timestamps, with or without an AM/PM marker.
static TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const PREAMBLE_LINES: usize = 2;

/// Parses a HOBO logger export: a two-line preamble (plot title and column
/// header) followed by `record_no, timestamp, temperature[, rh[, dew_point]]`
/// rows.
///
/// Rows whose temperature is missing or non-finite are dropped. A file with no
/// data rows yields an empty series. Humidity and dew point columns are kept
/// only when the file carries them.
pub fn parse_logger_file(content: &str) -> Result<LoggerSeries, ParserError> {
    let mut sections = content.splitn(PREAMBLE_LINES + 1, '\n');
    for _ in 0..PREAMBLE_LINES {
        sections.next();
    }
    let body = sections.next().unwrap_or("");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut timestamps = Vec::new();
    let mut temperature = Vec::new();
    let mut humidity: Vec<Option<f64>> = Vec::new();
    let mut dew_point: Vec<Option<f64>> = Vec::new();
    let mut max_fields = 0;

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| ParserError::Csv {
            parser: NAME,
            source,
        })?;
        let line_index = PREAMBLE_LINES + idx + 1;

        if record.len() <= 1 && record.get(0).map_or(true, |f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < 3 {
            return Err(ParserError::DataRow {
                parser: NAME,
                line_index,
                message: format!("expected at least 3 fields, found {}", record.len()),
            });
        }
        max_fields = max_fields.max(record.len());

        let ts = parse_timestamp(
            NAME,
            TIMESTAMP_FORMATS,
            record.get(1).unwrap_or_default(),
            line_index,
        )?;
        let temp = parse_optional_f64(
            NAME,
            record.get(2).unwrap_or_default(),
            line_index,
            "temperature",
        )?;
        let rh = parse_optional_f64(NAME, record.get(3).unwrap_or_default(), line_index, "rh")?;
        let dpt = parse_optional_f64(
            NAME,
            record.get(4).unwrap_or_default(),
            line_index,
            "dew_point",
        )?;

        // A row only counts when its primary reading is a finite number.
        let temp = match temp {
            Some(value) => value,
            None => continue,
        };

        timestamps.push(ts);
        temperature.push(temp);
        humidity.push(rh);
        dew_point.push(dpt);
    }

    Ok(LoggerSeries {
        timestamps,
        temperature,
        humidity: (max_fields > 3).then_some(humidity),
        dew_point: (max_fields > 4).then_some(dew_point),
    })
}
