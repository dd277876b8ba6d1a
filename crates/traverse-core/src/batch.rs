use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use traverse_parser::{
    parse_ambient_file, parse_ambient_zip, parse_logger_file, AmbientSeries, TrackReader,
};

use crate::align;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::locate;
use crate::outputs;

/// Outcome of one day's pipeline run.
#[derive(Debug)]
pub enum DayOutcome {
    Merged {
        rows: usize,
        path: PathBuf,
        ambient_rows: Option<usize>,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug)]
pub struct DayReport {
    pub day: String,
    pub outcome: DayOutcome,
}

/// Per-day outcomes for one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub days: Vec<DayReport>,
}

impl BatchReport {
    pub fn merged_count(&self) -> usize {
        self.days
            .iter()
            .filter(|report| matches!(report.outcome, DayOutcome::Merged { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.days.len() - self.merged_count()
    }
}

/// Runs the merge pipeline over every day directory under the configured root.
///
/// Days are independent: a failing day is reported and skipped while the rest
/// of the batch continues. The ambient series is loaded once and only sliced
/// per day; no other state crosses day iterations.
pub fn run(config: &PipelineConfig) -> Result<BatchReport> {
    config.validate()?;

    let ambient = match &config.ambient {
        Some(path) => Some(load_ambient(path)?),
        None => None,
    };

    let day_dirs = locate::day_dirs(&config.days_root)?;
    let mut report = BatchReport::default();

    for day_dir in day_dirs {
        let day = day_label(&day_dir);
        let outcome = match process_day(config, &day_dir, &day, ambient.as_ref()) {
            Ok(outcome) => {
                if let DayOutcome::Merged { rows, ref path, .. } = outcome {
                    info!(day = %day, rows, path = %path.display(), "merged day");
                }
                outcome
            }
            Err(err) => {
                warn!(day = %day, error = %err, "skipping day");
                DayOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        };
        report.days.push(DayReport { day, outcome });
    }

    Ok(report)
}

/// Loads the ambient station series once per batch (plain CSV or ZIP).
pub fn load_ambient(path: &Path) -> Result<AmbientSeries> {
    let zipped = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"));
    if zipped {
        Ok(parse_ambient_zip(&fs::read(path)?)?)
    } else {
        Ok(parse_ambient_file(&fs::read_to_string(path)?)?)
    }
}

fn day_label(day_dir: &Path) -> String {
    day_dir
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("?")
        .to_string()
}

fn process_day(
    config: &PipelineConfig,
    day_dir: &Path,
    day: &str,
    ambient: Option<&AmbientSeries>,
) -> Result<DayOutcome> {
    let logger_path = locate::logger_file(day_dir, &config.logger_prefix)?;
    let logger = parse_logger_file(&fs::read_to_string(&logger_path)?)?;

    let reader = TrackReader::new(config.utc_offset_hours, config.gps_resample_seconds);
    let gps_paths = locate::gps_files(day_dir, config.direction.as_deref())?;
    let mut segments = Vec::with_capacity(gps_paths.len());
    for path in &gps_paths {
        let content = fs::read_to_string(path)?;
        segments.push(reader.parse(path, &content)?);
    }

    let table = align::merge_day(day, &logger, &segments, config.grid_step_seconds)?;
    let path = outputs::write_merged_csv(&config.merged_dir, &table)?;

    let ambient_rows = match ambient {
        Some(series) => {
            let slice = series.window_slice(table.first_timestamp(), table.last_timestamp());
            let date = outputs::date_label(table.first_timestamp())?;
            outputs::write_ambient_csv(&config.merged_dir, &date, &slice)?;
            Some(slice.len())
        }
        None => None,
    };

    Ok(DayOutcome::Merged {
        rows: table.len(),
        path,
        ambient_rows,
    })
}
