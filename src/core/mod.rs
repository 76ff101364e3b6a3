//! Core data types and I/O operations.

pub mod derive;
pub mod loaders;
pub mod writers;

pub use derive::{Placemark, RadiationPattern};
pub use loaders::{StationTable, LoaderError};
pub use writers::{write_kml, WriteError};
