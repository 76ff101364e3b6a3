//! KML document writing.
//!
//! This module serializes the grouped placemark tree to a KML document:
//! class folders first, then one "Cities" folder holding the per-city
//! folders, then any placemarks that matched no folder. The whole document
//! is rendered in memory and written in a single shot, so a failed run
//! leaves no partial file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::config::KmlConfig;
use crate::core::derive::Placemark;
use crate::processors::grouping::{Folder, PlacemarkGroups};

/// Namespace declared on the document root.
const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Errors that can occur during write operations.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the document to disk.
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// XML serialization error.
    #[error("failed to serialize KML document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while serializing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Serialize the grouped placemark tree to a KML document at `path`.
///
/// The document is rendered in memory first and written atomically with a
/// single filesystem write.
///
/// # Arguments
///
/// * `path` - Output file path (parent directories will be created if needed)
/// * `groups` - Grouped placemarks to serialize
/// * `config` - KML configuration (cities folder label, document name)
///
/// # Errors
///
/// Returns an error if parent directories cannot be created, serialization
/// fails, or the file cannot be written.
pub fn write_kml(path: &Path, groups: &PlacemarkGroups, config: &KmlConfig) -> Result<()> {
    ensure_parent_dirs(path)?;

    let document = render_kml(groups, config)?;

    fs::write(path, document).map_err(|e| WriteError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })
}

/// Render the grouped placemark tree to KML bytes.
pub fn render_kml(groups: &PlacemarkGroups, config: &KmlConfig) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("kml");
    root.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;

    if let Some(name) = &config.document_name {
        write_text_element(&mut writer, "name", name)?;
    }

    for folder in &groups.class_folders {
        write_folder(&mut writer, folder)?;
    }

    // The per-city folders live under one shared parent.
    writer.write_event(Event::Start(BytesStart::new("Folder")))?;
    write_text_element(&mut writer, "name", &config.cities_folder)?;
    for folder in &groups.city_folders {
        write_folder(&mut writer, folder)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Folder")))?;

    for placemark in &groups.ungrouped {
        write_placemark(&mut writer, placemark)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;

    Ok(writer.into_inner())
}

fn write_folder<W: Write>(writer: &mut Writer<W>, folder: &Folder) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Folder")))?;
    write_text_element(writer, "name", &folder.name)?;
    for placemark in &folder.placemarks {
        write_placemark(writer, placemark)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Folder")))?;
    Ok(())
}

fn write_placemark<W: Write>(writer: &mut Writer<W>, placemark: &Placemark) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
    write_text_element(writer, "name", &placemark.name)?;
    write_text_element(writer, "description", &placemark.description)?;

    writer.write_event(Event::Start(BytesStart::new("Point")))?;
    // Longitude first, per the KML coordinate convention.
    let coordinates = format!("{},{}", placemark.longitude, placemark.latitude);
    write_text_element(writer, "coordinates", &coordinates)?;
    writer.write_event(Event::End(BytesEnd::new("Point")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
