use std::collections::{HashMap, HashSet};

use polars::prelude::*;
use traverse_parser::model::MICROS_PER_SECOND;
use traverse_parser::{GpsTrack, LoggerSeries};

use crate::error::{PipelineError, Result};

/// Uniform timeline covering a day's GPS coverage window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformGrid {
    start: i64,
    step: i64,
    len: usize,
}

impl UniformGrid {
    /// Grid spanning [first, last] inclusive at `step` microseconds. The last
    /// tick never extends past `last`.
    pub fn span(first: i64, last: i64, step: i64) -> Result<Self> {
        if step <= 0 {
            return Err(PipelineError::Validation(format!(
                "grid step must be positive, got {step}"
            )));
        }
        if last < first {
            return Err(PipelineError::Validation(format!(
                "grid end {last} precedes start {first}"
            )));
        }
        let len = ((last - first) / step) as usize + 1;
        Ok(Self {
            start: first,
            step,
            len,
        })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn tick(&self, index: usize) -> i64 {
        self.start + index as i64 * self.step
    }

    pub fn timestamps(&self) -> Vec<i64> {
        (0..self.len).map(|index| self.tick(index)).collect()
    }
}

/// Logger and GPS series merged onto one uniform timeline.
///
/// The timeline spans exactly the GPS coverage window, regardless of how far
/// the logger's coverage reaches. A bucket a source has no sample for holds
/// `None`; no interpolation is performed.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    grid: UniformGrid,
    pub latitude: Vec<Option<f64>>,
    pub longitude: Vec<Option<f64>>,
    pub temperature: Vec<Option<f64>>,
    pub humidity: Option<Vec<Option<f64>>>,
    pub dew_point: Option<Vec<Option<f64>>>,
}

impl AlignedTable {
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn first_timestamp(&self) -> i64 {
        self.grid.start()
    }

    pub fn last_timestamp(&self) -> i64 {
        self.grid.tick(self.grid.len().saturating_sub(1))
    }

    /// Materializes the table with the merged-CSV column layout
    /// (`Time, lat, lon, T[, rh[, Dpt]]`).
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let time = Series::new("Time".into(), self.grid.timestamps())
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

        let mut columns: Vec<Column> = vec![
            time.into(),
            Series::new("lat".into(), self.latitude.clone()).into(),
            Series::new("lon".into(), self.longitude.clone()).into(),
            Series::new("T".into(), self.temperature.clone()).into(),
        ];
        if let Some(values) = &self.humidity {
            columns.push(Series::new("rh".into(), values.clone()).into());
        }
        if let Some(values) = &self.dew_point {
            columns.push(Series::new("Dpt".into(), values.clone()).into());
        }
        DataFrame::new(columns)
    }
}

/// Merges a day's logger series and GPS segments into one aligned table.
///
/// Segments are concatenated in file order and deduplicated by timestamp with
/// the first occurrence winning. The uniform timeline spans [min, max] of the
/// merged track at `grid_step_seconds`; both sources are then reindexed onto
/// it by exact timestamp match.
pub fn merge_day(
    day: &str,
    logger: &LoggerSeries,
    segments: &[GpsTrack],
    grid_step_seconds: i64,
) -> Result<AlignedTable> {
    let mut seen = HashSet::new();
    let mut track: Vec<(i64, f64, f64)> = Vec::new();
    for segment in segments {
        for idx in 0..segment.len() {
            let ts = segment.timestamps[idx];
            if seen.insert(ts) {
                track.push((ts, segment.latitude[idx], segment.longitude[idx]));
            }
        }
    }

    if track.is_empty() {
        return Err(PipelineError::EmptyTrack {
            day: day.to_string(),
        });
    }

    let mut first = i64::MAX;
    let mut last = i64::MIN;
    for &(ts, _, _) in &track {
        first = first.min(ts);
        last = last.max(ts);
    }
    let grid = UniformGrid::span(first, last, grid_step_seconds * MICROS_PER_SECOND)?;

    let mut gps_rows: HashMap<i64, usize> = HashMap::new();
    for (idx, &(ts, _, _)) in track.iter().enumerate() {
        gps_rows.entry(ts).or_insert(idx);
    }
    let mut logger_rows: HashMap<i64, usize> = HashMap::new();
    for (idx, &ts) in logger.timestamps.iter().enumerate() {
        logger_rows.entry(ts).or_insert(idx);
    }

    let mut latitude = Vec::with_capacity(grid.len());
    let mut longitude = Vec::with_capacity(grid.len());
    let mut temperature = Vec::with_capacity(grid.len());
    let mut humidity = logger.humidity.as_ref().map(|_| Vec::with_capacity(grid.len()));
    let mut dew_point = logger
        .dew_point
        .as_ref()
        .map(|_| Vec::with_capacity(grid.len()));

    for tick in grid.timestamps() {
        match gps_rows.get(&tick) {
            Some(&idx) => {
                latitude.push(Some(track[idx].1));
                longitude.push(Some(track[idx].2));
            }
            None => {
                latitude.push(None);
                longitude.push(None);
            }
        }

        let logger_idx = logger_rows.get(&tick).copied();
        temperature.push(logger_idx.map(|idx| logger.temperature[idx]));
        if let (Some(values), Some(source)) = (humidity.as_mut(), logger.humidity.as_ref()) {
            values.push(logger_idx.and_then(|idx| source[idx]));
        }
        if let (Some(values), Some(source)) = (dew_point.as_mut(), logger.dew_point.as_ref()) {
            values.push(logger_idx.and_then(|idx| source[idx]));
        }
    }

    Ok(AlignedTable {
        grid,
        latitude,
        longitude,
        temperature,
        humidity,
        dew_point,
    })
}
