use std::fs;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use polars::prelude::*;
use traverse_parser::AmbientSeries;

use crate::align::AlignedTable;
use crate::error::{PipelineError, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats an epoch-microsecond timestamp as a calendar date (`YYYY-MM-DD`).
pub fn date_label(timestamp: i64) -> Result<String> {
    DateTime::from_timestamp_micros(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or_else(|| PipelineError::Validation(format!("timestamp {timestamp} out of range")))
}

/// Writes the merged table as `<merged_dir>/<YYYY-MM-DD>.csv`, named from the
/// table's first timestamp. The directory is created on demand; missing values
/// become empty cells.
pub fn write_merged_csv(merged_dir: &Path, table: &AlignedTable) -> Result<PathBuf> {
    fs::create_dir_all(merged_dir)?;
    let path = merged_dir.join(format!("{}.csv", date_label(table.first_timestamp())?));
    let mut df = table.to_dataframe()?;
    write_csv(&path, &mut df)?;
    Ok(path)
}

/// Writes a day's ambient window slice next to the merged table as
/// `<YYYY-MM-DD>_ambient.csv`.
pub fn write_ambient_csv(merged_dir: &Path, date: &str, slice: &AmbientSeries) -> Result<PathBuf> {
    fs::create_dir_all(merged_dir)?;
    let path = merged_dir.join(format!("{date}_ambient.csv"));
    let mut df = ambient_dataframe(slice)?;
    write_csv(&path, &mut df)?;
    Ok(path)
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_datetime_format(Some(DATETIME_FORMAT.to_string()))
        .finish(df)?;
    Ok(())
}

fn ambient_dataframe(series: &AmbientSeries) -> PolarsResult<DataFrame> {
    let time = Series::new("Time".into(), series.timestamps.clone())
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    DataFrame::new(vec![
        time.into(),
        Series::new("LT".into(), series.air_temperature.clone()).into(),
        Series::new("phi".into(), series.humidity.clone()).into(),
        Series::new("ws".into(), series.wind_speed.clone()).into(),
        Series::new("wd".into(), series.wind_direction.clone()).into(),
        Series::new("wg".into(), series.wind_gust.clone()).into(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::merge_day;
    use chrono::NaiveDateTime;
    use tempdir::TempDir;
    use traverse_parser::{GpsTrack, LoggerSeries};

    fn micros(value: &str) -> i64 {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .expect("timestamp literal")
            .and_utc()
            .timestamp_micros()
    }

    #[test]
    fn merged_csv_is_named_by_first_timestamp_date() {
        let base = micros("2019-06-24 10:00:00");
        let logger = LoggerSeries {
            timestamps: vec![base, base + 1_000_000],
            temperature: vec![24.5, 24.6],
            humidity: None,
            dew_point: None,
        };
        let segments = vec![GpsTrack {
            timestamps: vec![base, base + 2_000_000],
            latitude: vec![38.1, 38.2],
            longitude: vec![21.7, 21.8],
        }];
        let table = merge_day("2019-06-24", &logger, &segments, 1).expect("merge failed");

        let tmp = TempDir::new("traverse-outputs").expect("tempdir");
        let out_dir = tmp.path().join("Merged");
        let path = write_merged_csv(&out_dir, &table).expect("csv write failed");

        assert!(path.ends_with("2019-06-24.csv"));
        let content = fs::read_to_string(&path).expect("read back");
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Time,lat,lon,T"));
        // header plus one row per grid tick
        assert_eq!(content.lines().count(), table.len() + 1);
        assert!(content.contains("2019-06-24 10:00:00"));
    }

    #[test]
    fn ambient_csv_carries_station_columns() {
        let slice = AmbientSeries {
            timestamps: vec![micros("2019-06-24 10:00:00")],
            air_temperature: vec![Some(27.9)],
            humidity: vec![Some(48.0)],
            wind_speed: vec![Some(3.2)],
            wind_direction: vec![Some(210.0)],
            wind_gust: vec![None],
        };

        let tmp = TempDir::new("traverse-outputs").expect("tempdir");
        let path = write_ambient_csv(tmp.path(), "2019-06-24", &slice).expect("csv write failed");

        assert!(path.ends_with("2019-06-24_ambient.csv"));
        let content = fs::read_to_string(&path).expect("read back");
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Time,LT,phi,ws,wd,wg"));
        assert_eq!(lines.next(), Some("2019-06-24 10:00:00,27.9,48.0,3.2,210.0,"));
    }
}
