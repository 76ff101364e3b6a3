//! End-to-end station CSV to KML conversion.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::core::derive::{self, DeriveError};
use crate::core::loaders::{self, LoaderError};
use crate::core::writers;

use super::grouping;

/// Counters reported after a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Rows that survived the lenient parse.
    pub rows: usize,
    /// Distinct regulatory classes.
    pub classes: usize,
    /// Distinct cities.
    pub cities: usize,
    /// Point features written (two per row: class tree + city tree).
    pub points: usize,
}

/// Convert a station CSV export to a KML placemark document.
///
/// Runs the full pipeline: load and frequency-sort the table, derive one
/// placemark per row, group by regulatory class and by city, and write the
/// KML document. Either the complete document is written or nothing is;
/// derivation failures abort the run before the output file is touched.
///
/// # Arguments
///
/// * `input` - Path to the `;`-delimited station CSV file
/// * `output` - Path for the KML document
/// * `config` - Pipeline configuration
///
/// # Returns
///
/// A [`ConversionSummary`] with row, class, city and point counts.
pub fn convert_csv_to_kml(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<ConversionSummary> {
    let table = loaders::load_station_csv(input, &config.csv)
        .with_context(|| format!("failed to load station CSV: {}", input.display()))?;

    let placemarks = derive::derive_placemarks(&table)?;
    let groups = grouping::group_placemarks(&placemarks);

    let points = groups
        .class_folders
        .iter()
        .chain(groups.city_folders.iter())
        .map(|folder| folder.placemarks.len())
        .sum::<usize>()
        + groups.ungrouped.len();

    writers::write_kml(output, &groups, &config.kml)
        .with_context(|| format!("failed to write KML document: {}", output.display()))?;

    Ok(ConversionSummary {
        rows: table.len(),
        classes: groups.class_folders.len(),
        cities: groups.city_folders.len(),
        points,
    })
}

/// Returns the missing column name when `err` is a missing-column failure.
///
/// Callers use this to report missing-column errors distinctly from generic
/// conversion failures.
pub fn missing_column(err: &anyhow::Error) -> Option<&str> {
    if let Some(LoaderError::MissingColumn { name }) = err.downcast_ref::<LoaderError>() {
        return Some(name.as_str());
    }
    if let Some(DeriveError::MissingColumn { name }) = err.downcast_ref::<DeriveError>() {
        return Some(name.as_str());
    }
    None
}
