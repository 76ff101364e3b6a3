//! Processing stages built on the core loaders and writers.

pub mod convert;
pub mod grouping;

// Re-export key types for convenience
pub use convert::{convert_csv_to_kml, missing_column, ConversionSummary};
pub use grouping::{group_placemarks, Folder, PlacemarkGroups};
