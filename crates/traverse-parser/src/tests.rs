use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::ParserError;
use crate::formats::{parse_ambient_file, parse_ambient_zip, parse_logger_file, TrackReader};

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn micros(value: &str) -> i64 {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .expect("timestamp literal")
        .and_utc()
        .timestamp_micros()
}

#[test]
fn logger_drops_rows_without_finite_temperature() {
    let series = parse_logger_file(&fixture("H97_10679014.csv")).expect("HOBO parse failed");

    assert_eq!(series.len(), 4);
    assert_eq!(series.timestamps[0], micros("2019-06-24 10:00:00"));
    assert!(!series.timestamps.contains(&micros("2019-06-24 10:00:02")));
    assert_eq!(series.temperature[0], 24.51);

    let humidity = series.humidity.as_ref().expect("rh column missing");
    assert_eq!(humidity[0], Some(55.2));
    let dew_point = series.dew_point.as_ref().expect("dew point column missing");
    assert_eq!(dew_point[3], Some(15.02));
}

#[test]
fn logger_nan_token_counts_as_missing() {
    let content = "Plot Title: test\n#,Time,T\n1,06/24/19 10:00:00,24.0\n2,06/24/19 10:00:01,NaN\n";
    let series = parse_logger_file(content).expect("parse failed");

    assert_eq!(series.len(), 1);
    assert!(series.humidity.is_none());
    assert!(series.dew_point.is_none());
}

#[test]
fn logger_empty_file_yields_empty_series() {
    let series = parse_logger_file("Plot Title: test\n#,Time,T\n").expect("parse failed");
    assert!(series.is_empty());
}

#[test]
fn logger_malformed_timestamp_names_the_row() {
    let content = "Plot Title: test\n#,Time,T\n1,06/24/19 10:00:00,24.0\n2,not-a-time,24.1\n";
    match parse_logger_file(content) {
        Err(ParserError::DataRow { line_index, .. }) => assert_eq!(line_index, 4),
        other => panic!("expected DataRow error, got {other:?}"),
    }
}

#[test]
fn logger_parses_twelve_hour_timestamps() {
    let content = "Plot Title: test\n#,Time,T\n1,06/24/19 01:00:00 PM,24.0\n";
    let series = parse_logger_file(content).expect("parse failed");
    assert_eq!(series.timestamps, vec![micros("2019-06-24 13:00:00")]);
}

#[test]
fn gps_timestamps_are_filename_minus_offset_plus_millis() {
    let reader = TrackReader::new(3, 1);
    let path = Path::new("240619_1035_00.csv");

    let start = reader.start_time(path).expect("filename parse failed");
    assert_eq!(
        start,
        NaiveDate::from_ymd_opt(2019, 6, 24)
            .unwrap()
            .and_hms_opt(7, 35, 0)
            .unwrap()
    );

    let track = reader
        .parse(path, "38.0,21.5,0.0,1.0,5.0,2000\n")
        .expect("parse failed");
    assert_eq!(track.timestamps, vec![micros("2019-06-24 07:35:02")]);
    assert_eq!(track.latitude, vec![38.0]);
    assert_eq!(track.longitude, vec![21.5]);
}

#[test]
fn gps_resamples_with_mean_aggregation() {
    let reader = TrackReader::new(3, 10);
    let path = Path::new("240619_1035_00.csv");
    let track = reader
        .parse(path, &fixture("240619_1035_00.csv"))
        .expect("parse failed");

    assert_eq!(
        track.timestamps,
        vec![
            micros("2019-06-24 07:35:00"),
            micros("2019-06-24 07:35:10"),
            micros("2019-06-24 07:35:20"),
        ]
    );
    assert!((track.latitude[0] - 38.246535333333336).abs() < 1e-9);
    assert!((track.longitude[0] - 21.734706).abs() < 1e-9);
    assert_eq!(track.latitude[1], 38.246584);
    assert_eq!(track.longitude[2], 21.734771);
}

#[test]
fn gps_bad_filename_is_an_explicit_error() {
    let reader = TrackReader::new(3, 10);
    match reader.parse(Path::new("notes.csv"), "38.0,21.5,0.0,1.0,5.0,0\n") {
        Err(ParserError::MalformedFilename { name, .. }) => assert_eq!(name, "notes"),
        other => panic!("expected MalformedFilename error, got {other:?}"),
    }
}

#[test]
fn gps_empty_file_yields_empty_track() {
    let reader = TrackReader::new(3, 10);
    let track = reader
        .parse(Path::new("240619_1035_00.csv"), "")
        .expect("parse failed");
    assert!(track.is_empty());
}

#[test]
fn gps_short_row_is_rejected() {
    let reader = TrackReader::new(3, 10);
    match reader.parse(Path::new("240619_1035_00.csv"), "38.0,21.5,1000\n") {
        Err(ParserError::DataRow { line_index, .. }) => assert_eq!(line_index, 1),
        other => panic!("expected DataRow error, got {other:?}"),
    }
}

#[test]
fn ambient_slices_by_day_and_window() {
    let series = parse_ambient_file(&fixture("meteo_1min_sample.csv")).expect("parse failed");
    assert_eq!(series.len(), 4);

    let day = series.day_slice(NaiveDate::from_ymd_opt(2019, 6, 24).unwrap());
    assert_eq!(day.len(), 3);
    assert_eq!(day.air_temperature[1], Some(27.9));

    let window = series.window_slice(
        micros("2019-06-24 10:00:00"),
        micros("2019-06-24 10:01:00"),
    );
    assert_eq!(window.len(), 2);
    assert_eq!(window.wind_direction, vec![Some(210.0), Some(215.0)]);
}

#[test]
fn ambient_zip_matches_plain_csv() {
    let content = fixture("meteo_1min_sample.csv");

    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file("Meteo_1min_2019_raw.csv", options)
        .expect("zip entry");
    writer.write_all(content.as_bytes()).expect("zip write");
    let bytes = writer.finish().expect("zip finish").into_inner();

    let from_zip = parse_ambient_zip(&bytes).expect("zip parse failed");
    let from_csv = parse_ambient_file(&content).expect("csv parse failed");
    assert_eq!(from_zip.timestamps, from_csv.timestamps);
    assert_eq!(from_zip.wind_gust, from_csv.wind_gust);
}
