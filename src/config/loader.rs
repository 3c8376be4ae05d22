//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading generator
//! configuration and holiday calendars from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::YamlHolidayProvider;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::ScheduleGenerator;

use super::types::GeneratorConfig;

const GENERATOR_FILE: &str = "generator.yaml";
const HOLIDAYS_DIR: &str = "holidays";
const DEFAULT_DATABASE_FILE: &str = "schedules.db";

/// Loads and provides access to generator configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── generator.yaml      # Adjustment direction, holiday source, database path
/// └── holidays/
///     └── IN.yaml         # Country calendar used by `calendar.country: IN`
/// ```
///
/// # Example
///
/// ```no_run
/// use covenant_schedule::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// let generator = loader.build_generator();
/// println!("Holidays loaded: {}", generator.calendar().holidays().len());
/// # Ok::<(), covenant_schedule::error::ScheduleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    config: GeneratorConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ConfigNotFound`] when `generator.yaml` is
    /// missing and [`ScheduleError::ConfigParseError`] when it is malformed,
    /// including an adjustment direction other than `forward`/`backward`.
    pub fn load<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let root = path.as_ref().to_path_buf();
        let config = load_yaml::<GeneratorConfig>(&root.join(GENERATOR_FILE))?;
        Ok(Self { root, config })
    }

    /// Returns the parsed generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the configuration directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Provider over the `holidays/` directory next to `generator.yaml`.
    pub fn holiday_provider(&self) -> YamlHolidayProvider {
        YamlHolidayProvider::new(self.root.join(HOLIDAYS_DIR))
    }

    /// Builds a generator from this configuration and its holiday directory.
    pub fn build_generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::from_config(&self.config, &self.holiday_provider())
    }

    /// SQLite file path, resolved against the configuration directory.
    pub fn database_path(&self) -> PathBuf {
        match &self.config.database_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.root.join(path),
            None => self.root.join(DEFAULT_DATABASE_FILE),
        }
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ScheduleResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| ScheduleError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| ScheduleError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::AdjustmentDirection;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn write_config(generator_yaml: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(GENERATOR_FILE), generator_yaml).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_configuration() {
        let dir = write_config("business_day_adjustment: backward\nholidays: [2025-12-25]\n");

        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(
            loader.config().business_day_adjustment,
            AdjustmentDirection::Backward
        );

        let generator = loader.build_generator();
        assert!(
            generator
                .calendar()
                .is_holiday(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap())
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(ScheduleError::ConfigNotFound { path }) => {
                assert!(path.contains("generator.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_direction_is_parse_error() {
        let dir = write_config("business_day_adjustment: sideways\n");

        match ConfigLoader::load(dir.path()) {
            Err(ScheduleError::ConfigParseError { message, .. }) => {
                assert!(message.contains("sideways"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_calendar_lookup_reads_holiday_directory() {
        let dir = write_config("calendar:\n  country: IN\n  years: [2025]\n");
        fs::create_dir(dir.path().join(HOLIDAYS_DIR)).unwrap();
        fs::write(
            dir.path().join(HOLIDAYS_DIR).join("IN.yaml"),
            "country: IN\nholidays:\n  - date: 2025-08-15\n    name: Independence Day\n",
        )
        .unwrap();

        let generator = ConfigLoader::load(dir.path())
            .unwrap()
            .build_generator();
        assert!(
            generator
                .calendar()
                .is_holiday(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap())
        );
    }

    #[test]
    fn test_missing_holiday_calendar_falls_back_to_empty() {
        let dir = write_config("calendar:\n  country: ZZ\n  years: [2025]\n");

        let generator = ConfigLoader::load(dir.path())
            .unwrap()
            .build_generator();
        assert!(generator.calendar().holidays().is_empty());
    }

    #[test]
    fn test_database_path_resolution() {
        let dir = write_config("{}\n");
        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.database_path(), dir.path().join("schedules.db"));

        let dir = write_config("database_path: data/covenants.db\n");
        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.database_path(), dir.path().join("data/covenants.db"));
    }
}
