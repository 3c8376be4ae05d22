//! Configuration loading for the schedule generator.
//!
//! This module loads the generator configuration from YAML: the business-day
//! adjustment direction, the holiday source, and the database location.
//!
//! # Example
//!
//! ```no_run
//! use covenant_schedule::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config").unwrap();
//! println!("Adjustment: {}", loader.config().business_day_adjustment);
//! ```

mod loader;
mod types;

pub(crate) use loader::load_yaml;
pub use loader::ConfigLoader;
pub use types::{CalendarSpec, GeneratorConfig, HolidaySource};
