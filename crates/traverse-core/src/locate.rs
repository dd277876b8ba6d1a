use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Sorted day directories under the batch root (`<root>/<day>/`).
pub fn day_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("*").to_string_lossy().into_owned();
    let mut days = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_dir() {
            days.push(path);
        }
    }
    days.sort();
    Ok(days)
}

/// First lexical `<prefix>*.csv` match directly under the day directory.
pub fn logger_file(day_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let pattern = day_dir
        .join(format!("{prefix}*.csv"))
        .to_string_lossy()
        .into_owned();
    let mut matches = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();
    matches
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::MissingLoggerFile {
            day: day_dir.display().to_string(),
            pattern: format!("{prefix}*.csv"),
        })
}

/// Sorted GPS track files for a day: `GPS/*.csv`, or `GPS/<direction>/*.csv`
/// when a direction sub-label is given. An empty list is legal here; the
/// merger raises the day-level error.
pub fn gps_files(day_dir: &Path, direction: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut gps_dir = day_dir.join("GPS");
    if let Some(direction) = direction {
        gps_dir = gps_dir.join(direction);
    }
    let pattern = gps_dir.join("*.csv").to_string_lossy().into_owned();
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "x").expect("fixture write");
    }

    #[test]
    fn finds_logger_file_and_sorted_gps_files() {
        let tmp = TempDir::new("traverse-locate").expect("tempdir");
        let day = tmp.path().join("2019-06-24");
        fs::create_dir_all(day.join("GPS")).expect("mkdir");
        touch(&day.join("H97_10679014.csv"));
        touch(&day.join("GPS").join("240619_1201_00.csv"));
        touch(&day.join("GPS").join("240619_1035_00.csv"));

        let logger = logger_file(&day, "H97").expect("logger file");
        assert!(logger.ends_with("H97_10679014.csv"));

        let gps = gps_files(&day, None).expect("gps files");
        assert_eq!(gps.len(), 2);
        assert!(gps[0].ends_with("240619_1035_00.csv"));

        let days = day_dirs(tmp.path()).expect("day dirs");
        assert_eq!(days, vec![day]);
    }

    #[test]
    fn logger_prefix_takes_first_lexical_match() {
        let tmp = TempDir::new("traverse-locate").expect("tempdir");
        let day = tmp.path().join("2019-06-25");
        fs::create_dir_all(&day).expect("mkdir");
        touch(&day.join("H97_b.csv"));
        touch(&day.join("H97_a.csv"));

        let logger = logger_file(&day, "H97").expect("logger file");
        assert!(logger.ends_with("H97_a.csv"));
    }

    #[test]
    fn missing_logger_file_is_a_typed_error() {
        let tmp = TempDir::new("traverse-locate").expect("tempdir");
        let day = tmp.path().join("2019-06-26");
        fs::create_dir_all(&day).expect("mkdir");

        match logger_file(&day, "H97") {
            Err(PipelineError::MissingLoggerFile { pattern, .. }) => {
                assert_eq!(pattern, "H97*.csv");
            }
            other => panic!("expected MissingLoggerFile error, got {other:?}"),
        }
    }

    #[test]
    fn direction_label_narrows_the_gps_folder() {
        let tmp = TempDir::new("traverse-locate").expect("tempdir");
        let day = tmp.path().join("2019-06-27");
        fs::create_dir_all(day.join("GPS").join("north")).expect("mkdir");
        fs::create_dir_all(day.join("GPS").join("south")).expect("mkdir");
        touch(&day.join("GPS").join("north").join("270619_0900_00.csv"));
        touch(&day.join("GPS").join("south").join("270619_1800_00.csv"));

        let north = gps_files(&day, Some("north")).expect("gps files");
        assert_eq!(north.len(), 1);
        assert!(north[0].ends_with("270619_0900_00.csv"));

        let all = gps_files(&day, None).expect("gps files");
        assert!(all.is_empty());
    }
}
