//! Per-record placemark derivation.
//!
//! For each station row this module derives the radiation pattern and
//! transmitted power from the antenna-mode and polarization fields, then
//! synthesizes the placemark display name, the multi-line description and
//! the decimal coordinate pair.

use log::warn;
use thiserror::Error;

use super::loaders::{Row, StationTable};

/// Power columns carry watts; kilowatts are used for display.
const WATTS_PER_KILOWATT: f64 = 1000.0;

/// Marker used when an optional field has no usable value.
const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur during placemark derivation.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("Missing column: {name}")]
    MissingColumn { name: String },

    #[error("Invalid coordinate in {column}: '{value}'")]
    InvalidCoordinate { column: String, value: String },
}

/// Result type for derivation operations.
pub type Result<T> = std::result::Result<T, DeriveError>;

/// Polarization the derived power figure was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    Horizontal,
    Vertical,
    Directional,
    Unknown,
}

impl Polarization {
    /// Short code used in diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            Polarization::Horizontal => "H",
            Polarization::Vertical => "V",
            Polarization::Directional => "D",
            Polarization::Unknown => "Unknown",
        }
    }
}

/// Mode-dependent radiation pattern derivation for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiationPattern {
    /// Transmitted power in kilowatts.
    pub power_kw: f64,
    /// Which polarization the power figure was taken from.
    pub polarization: Polarization,
    /// Human-readable pattern summary used in the description text.
    pub summary: String,
}

/// One placemark derived from a station record.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub description: String,
    /// Decimal longitude; KML expects it before latitude.
    pub longitude: f64,
    pub latitude: f64,
    /// Regulatory class this placemark is grouped by.
    pub class: String,
    /// City this placemark is grouped by.
    pub city: String,
}

fn required<'a>(row: &Row<'a>, column: &str) -> Result<&'a str> {
    row.raw(column).ok_or_else(|| DeriveError::MissingColumn {
        name: column.to_string(),
    })
}

/// Derive power and pattern description from the antenna-mode field.
///
/// Omnidirectional records take the horizontal average power when present,
/// falling back to the vertical average; directional records take the peak
/// vertical power, falling back to zero. Records with an unrecognized or
/// absent mode report zero power and an unknown polarization.
pub fn derive_pattern(row: &Row<'_>) -> RadiationPattern {
    let mode = row.value("ANT_MODE").map(str::to_lowercase);

    match mode.as_deref() {
        Some("o") => {
            let (power_kw, polarization) = if let Some(power) = row.number("ERPHAV") {
                (power / WATTS_PER_KILOWATT, Polarization::Horizontal)
            } else if let Some(power) = row.number("ERPVAV") {
                (power / WATTS_PER_KILOWATT, Polarization::Vertical)
            } else {
                warn!(
                    "omnidirectional record {} has no average power value, assuming 0 kW",
                    row.value("CALL_SIGN").unwrap_or("<unknown>")
                );
                (0.0, Polarization::Unknown)
            };

            RadiationPattern {
                power_kw,
                polarization,
                summary: "Radiation Pattern: Omnidirectional".to_string(),
            }
        }
        Some("d") => {
            let azimuth = row.value("RAD_CENTER").unwrap_or(NOT_AVAILABLE);
            let power_kw = row
                .number("ERPVPK")
                .map_or(0.0, |power| power / WATTS_PER_KILOWATT);

            RadiationPattern {
                power_kw,
                polarization: Polarization::Directional,
                summary: format!("Radiation Pattern: Directional. Azimuth: {}°", azimuth),
            }
        }
        _ => RadiationPattern {
            power_kw: 0.0,
            polarization: Polarization::Unknown,
            summary: "Radiation Pattern: Unknown polarization".to_string(),
        },
    }
}

/// Format a peak power column as kilowatts with two decimals.
///
/// The column itself must exist; a blank value renders as `n/a`.
fn format_peak_kw(row: &Row<'_>, column: &str) -> Result<String> {
    required(row, column)?;
    Ok(match row.number(column) {
        Some(power) => format!("{:.2}", power / WATTS_PER_KILOWATT),
        None => "n/a".to_string(),
    })
}

/// Build the display name for one record.
///
/// The name always reads the peak vertical/horizontal power columns, not the
/// mode-dependent derived power.
pub fn placemark_name(row: &Row<'_>) -> Result<String> {
    let frequency = required(row, "FREQUENCY")?.trim();
    let call_sign = required(row, "CALL_SIGN")?.trim();
    let peak_v = format_peak_kw(row, "ERPVPK")?;
    let peak_h = format_peak_kw(row, "ERPHPK")?;
    let azimuth = row.value("RAD_CENTER").unwrap_or(NOT_AVAILABLE);

    Ok(format!(
        "{}: {} (V/H(kW): {}/{} | Azm: {}°)",
        frequency, call_sign, peak_v, peak_h, azimuth
    ))
}

/// Canned description block for a regulatory class.
///
/// Unrecognized classes get a generic no-information fallback.
pub fn class_description(class: &str) -> String {
    match class {
        "A" => {
            "CLASS: A. \nERP: < 6 kW. Service Area: small communities or suburban areas."
                .to_string()
        }
        "A1" => {
            "CLASS: A1. \nERP: < 0.25 kW. \nService Area: geographically restricted and for small communities."
                .to_string()
        }
        "B" => {
            "CLASS: B. \nERP: 6 kW to 50 kW. \nService Area: used in small towns and large populated areas."
                .to_string()
        }
        "C" => {
            "CLASS: C. \nERP: > 50 kW. \nService Area: large geographic areas, major cities, regional or national coverage."
                .to_string()
        }
        "C1" => {
            "CLASS: C1. \nERP: < 100 kW and antenna height (EHAAT) up to 299 m. \nService Area: large geographic areas, major cities, regional or national coverage."
                .to_string()
        }
        "C2" => {
            "CLASS: C2. \nERP: < 50 kW and antenna height (EHAAT) up to 150 m. \nService Area: large geographic areas, major cities, regional or national coverage."
                .to_string()
        }
        "D" => {
            "CLASS: D. Low-power or auxiliary transmitters acting as repeaters. \nService Area: usually do not have fixed coverage and may change based on licensing conditions."
                .to_string()
        }
        "LP" => {
            "CLASS: LP. ERP: < 0.25 kW. \nService Area: limited and targeted for local or narrow audience."
                .to_string()
        }
        "VLP" => {
            "CLASS: VLP. ERP: < 0.01 kW. \nService Area: used in educational institutions or indoors."
                .to_string()
        }
        other => format!("CLASS: {} - no information available.", other),
    }
}

/// Build the multi-line description text for one record.
///
/// Concatenates the class block, the pattern summary, beam tilt, antenna
/// height, and the original (pre-conversion) coordinate strings.
pub fn placemark_description(row: &Row<'_>, pattern: &RadiationPattern) -> Result<String> {
    let class = required(row, "CLASS")?.trim();
    let beam_tilt = required(row, "BEAM_TILT")?.trim();
    let ehaatt = required(row, "EHAATT")?.trim();
    let lat_raw = required(row, "LAT_NEW")?.trim();
    let lon_raw = required(row, "LON_NEW")?.trim();

    Ok(format!(
        "{} {} BEAM_TILT: {}° EHAATT: {} m Coordinates: {} {}",
        class_description(class),
        pattern.summary,
        beam_tilt,
        ehaatt,
        lat_raw,
        lon_raw
    ))
}

/// Parse a decimal coordinate, accepting a comma or dot separator.
pub fn parse_coordinate(column: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| DeriveError::InvalidCoordinate {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// Derive one placemark from a station row.
pub fn derive_placemark(row: &Row<'_>) -> Result<Placemark> {
    let pattern = derive_pattern(row);
    let name = placemark_name(row)?;
    let description = placemark_description(row, &pattern)?;

    let latitude = parse_coordinate("LAT_NEW", required(row, "LAT_NEW")?)?;
    let longitude = parse_coordinate("LON_NEW", required(row, "LON_NEW")?)?;

    Ok(Placemark {
        name,
        description,
        longitude,
        latitude,
        class: required(row, "CLASS")?.trim().to_string(),
        city: required(row, "CITY")?.trim().to_string(),
    })
}

/// Derive placemarks for every row of a frequency-sorted table.
///
/// Row-level derivation failures abort the whole run; nothing is produced
/// for a table with an unparseable coordinate anywhere in it.
pub fn derive_placemarks(table: &StationTable) -> Result<Vec<Placemark>> {
    let mut placemarks = Vec::with_capacity(table.len());
    for row in table.rows() {
        placemarks.push(derive_placemark(&row)?);
    }
    Ok(placemarks)
}
