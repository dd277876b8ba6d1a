use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Readings from a temperature/humidity logger, ordered by time.
///
/// Timestamps are microseconds since the Unix epoch. Every retained row has a
/// finite temperature; rows that fail that check are dropped at parse time.
/// Humidity and dew point are present only when the source file carried those
/// columns.
#[derive(Debug, Clone, Default)]
pub struct LoggerSeries {
    pub timestamps: Vec<i64>,
    pub temperature: Vec<f64>,
    pub humidity: Option<Vec<Option<f64>>>,
    pub dew_point: Option<Vec<Option<f64>>>,
}

impl LoggerSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Latitude/longitude fixes from one GPS track file, resampled onto a fixed
/// interval. Each timestamp appears at most once.
#[derive(Debug, Clone, Default)]
pub struct GpsTrack {
    pub timestamps: Vec<i64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
}

impl GpsTrack {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Fixed-station reference series (air temperature, relative humidity, wind).
///
/// Loaded once per batch and sliced read-only per day; slices are copies so the
/// loaded series is never mutated.
#[derive(Debug, Clone, Default)]
pub struct AmbientSeries {
    pub timestamps: Vec<i64>,
    pub air_temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_direction: Vec<Option<f64>>,
    pub wind_gust: Vec<Option<f64>>,
}

impl AmbientSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Rows falling on the given calendar day.
    pub fn day_slice(&self, date: NaiveDate) -> AmbientSeries {
        let start = NaiveDateTime::new(date, NaiveTime::MIN)
            .and_utc()
            .timestamp_micros();
        self.window_slice(start, start + MICROS_PER_DAY - 1)
    }

    /// Rows with timestamps in the inclusive range [start, end].
    pub fn window_slice(&self, start: i64, end: i64) -> AmbientSeries {
        let mut slice = AmbientSeries::default();
        for (idx, &ts) in self.timestamps.iter().enumerate() {
            if ts < start || ts > end {
                continue;
            }
            slice.timestamps.push(ts);
            slice.air_temperature.push(self.air_temperature[idx]);
            slice.humidity.push(self.humidity[idx]);
            slice.wind_speed.push(self.wind_speed[idx]);
            slice.wind_direction.push(self.wind_direction[idx]);
            slice.wind_gust.push(self.wind_gust[idx]);
        }
        slice
    }
}
