use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Pipeline settings.
///
/// Paths, the GPS clock offset and the resample/grid steps all live here and
/// are passed into the pipeline entry point explicitly; nothing is read from
/// process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root holding one directory per field day.
    pub days_root: PathBuf,
    /// Output directory for merged per-day CSV files.
    pub merged_dir: PathBuf,
    /// Filename prefix of the logger export inside a day directory.
    pub logger_prefix: String,
    /// Optional direction sub-label under each day's GPS folder.
    pub direction: Option<String>,
    /// GPS device clock offset from UTC in hours (UTC = local − offset).
    pub utc_offset_hours: i64,
    /// Bucket width GPS fixes are averaged onto, in seconds.
    pub gps_resample_seconds: i64,
    /// Step of the merged uniform timeline, in seconds.
    pub grid_step_seconds: i64,
    /// Optional ambient station series (.csv or .zip) sliced per day.
    pub ambient: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            days_root: PathBuf::from("Days"),
            merged_dir: PathBuf::from("Merged"),
            logger_prefix: "H97".to_string(),
            direction: None,
            utc_offset_hours: 3,
            gps_resample_seconds: 10,
            grid_step_seconds: 1,
            ambient: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|err| PipelineError::Config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gps_resample_seconds <= 0 {
            return Err(PipelineError::Config(format!(
                "gps_resample_seconds must be positive, got {}",
                self.gps_resample_seconds
            )));
        }
        if self.grid_step_seconds <= 0 {
            return Err(PipelineError::Config(format!(
                "grid_step_seconds must be positive, got {}",
                self.grid_step_seconds
            )));
        }
        Ok(())
    }
}
