//! Configuration types for the converter.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for station CSV parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter used by the export.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ';'
}

impl CsvConfig {
    /// Delimiter as a single byte; non-ASCII values fall back to `;`.
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).unwrap_or(b';')
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

/// Configuration for the KML output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KmlConfig {
    /// Label of the parent folder holding the per-city folders.
    #[serde(default = "default_cities_folder")]
    pub cities_folder: String,

    /// Optional name element on the KML document.
    #[serde(default)]
    pub document_name: Option<String>,
}

fn default_cities_folder() -> String {
    "Cities".to_string()
}

impl Default for KmlConfig {
    fn default() -> Self {
        Self {
            cities_folder: default_cities_folder(),
            document_name: None,
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub csv: CsvConfig,

    #[serde(default)]
    pub kml: KmlConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_csv_config() {
        let config = CsvConfig::default();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.delimiter_byte(), b';');
    }

    #[test]
    fn test_default_kml_config() {
        let config = KmlConfig::default();
        assert_eq!(config.cities_folder, "Cities");
        assert_eq!(config.document_name, None);
    }

    #[test]
    fn test_from_yaml_with_partial_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "kml:").unwrap();
        writeln!(file, "  cities_folder: Municipalities").unwrap();
        file.flush().unwrap();

        let config = PipelineConfig::from_yaml(file.path()).unwrap();

        assert_eq!(config.kml.cities_folder, "Municipalities");
        // Unspecified sections keep their defaults.
        assert_eq!(config.csv.delimiter, ';');
    }
}
