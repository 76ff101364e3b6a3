//! Broadcast station CSV to KML conversion pipeline.
//!
//! This crate provides tools for:
//! - Loading `;`-delimited broadcast station exports into a frequency-sorted table
//! - Deriving per-station power and radiation-pattern descriptions
//! - Grouping placemarks by regulatory class and by city
//! - Writing the grouped placemark tree as a KML document
//!
//! # Example
//!
//! ```no_run
//! use station_kml::{convert_csv_to_kml, PipelineConfig};
//! use std::path::Path;
//!
//! let config = PipelineConfig::default();
//! let summary =
//!     convert_csv_to_kml(Path::new("stations.csv"), Path::new("stations.kml"), &config)
//!         .unwrap();
//! println!("{} points written", summary.points);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{CsvConfig, KmlConfig, PipelineConfig};
pub use crate::core::derive::Placemark;
pub use crate::core::loaders::StationTable;
pub use processors::convert::{convert_csv_to_kml, ConversionSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
