use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use csv::ReaderBuilder;

use crate::errors::ParserError;
use crate::model::{GpsTrack, MICROS_PER_SECOND};

use super::{parse_required_f64, parse_required_i64};

const NAME: &str = "ANTIMAP";

/// Track filenames encode the recording start time, e.g. `240619_1035_00.csv`.
pub const GPS_FILENAME_FORMAT: &str = "%d%m%y_%H%M_%S";

const LATITUDE_FIELD: usize = 0;
const LONGITUDE_FIELD: usize = 1;
const MILLIS_FIELD: usize = 5;

/// Reader for AntiMap Log track exports: headerless CSV rows holding a fix's
/// latitude, longitude and offset in milliseconds from the start time encoded
/// in the filename.
#[derive(Debug, Clone, Copy)]
pub struct TrackReader {
    utc_offset: Duration,
    resample_step: i64,
}

impl TrackReader {
    /// `utc_offset_hours` is the logging device's clock offset from UTC
    /// (UTC = local − offset). `resample_step_seconds` is the bucket width
    /// fixes are averaged over.
    pub fn new(utc_offset_hours: i64, resample_step_seconds: i64) -> Self {
        Self {
            utc_offset: Duration::hours(utc_offset_hours),
            resample_step: resample_step_seconds * MICROS_PER_SECOND,
        }
    }

    /// UTC start time parsed from the file's name.
    pub fn start_time(&self, path: &Path) -> Result<NaiveDateTime, ParserError> {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        NaiveDateTime::parse_from_str(stem, GPS_FILENAME_FORMAT)
            .map(|local| local - self.utc_offset)
            .map_err(|_| ParserError::MalformedFilename {
                parser: NAME,
                name: stem.to_string(),
                expected: GPS_FILENAME_FORMAT,
            })
    }

    /// Parses one track file and resamples it onto the configured step using
    /// per-bucket mean aggregation.
    ///
    /// Buckets are epoch-floored, so resampled timestamps land on whole
    /// multiples of the step and each bucket appears at most once. A file with
    /// no rows yields an empty track.
    pub fn parse(&self, path: &Path, content: &str) -> Result<GpsTrack, ParserError> {
        let start = self.start_time(path)?.and_utc().timestamp_micros();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        // bucket start -> (latitude sum, longitude sum, fix count)
        let mut buckets: BTreeMap<i64, (f64, f64, u32)> = BTreeMap::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|source| ParserError::Csv {
                parser: NAME,
                source,
            })?;
            let line_index = idx + 1;

            if record.len() <= 1 && record.get(0).map_or(true, |f| f.trim().is_empty()) {
                continue;
            }
            if record.len() <= MILLIS_FIELD {
                return Err(ParserError::DataRow {
                    parser: NAME,
                    line_index,
                    message: format!(
                        "expected at least {} fields, found {}",
                        MILLIS_FIELD + 1,
                        record.len()
                    ),
                });
            }

            let lat = parse_required_f64(
                NAME,
                record.get(LATITUDE_FIELD).unwrap_or_default(),
                line_index,
                "latitude",
            )?;
            let lon = parse_required_f64(
                NAME,
                record.get(LONGITUDE_FIELD).unwrap_or_default(),
                line_index,
                "longitude",
            )?;
            let millis = parse_required_i64(
                NAME,
                record.get(MILLIS_FIELD).unwrap_or_default(),
                line_index,
                "offset_ms",
            )?;

            let ts = start + millis * 1_000;
            let bucket = ts - ts.rem_euclid(self.resample_step);
            let entry = buckets.entry(bucket).or_insert((0.0, 0.0, 0));
            entry.0 += lat;
            entry.1 += lon;
            entry.2 += 1;
        }

        let mut track = GpsTrack::default();
        for (bucket, (lat_sum, lon_sum, count)) in buckets {
            track.timestamps.push(bucket);
            track.latitude.push(lat_sum / f64::from(count));
            track.longitude.push(lon_sum / f64::from(count));
        }
        Ok(track)
    }
}
