use std::fs;
use std::path::Path;

use crate::io::store_io::{self, CONFIG_FILE, StoreError};
use crate::model::config::{Config, MIN_UPCOMING_OFFSET_DAYS};

/// Read the config, returning both the parsed config and the raw
/// toml_edit Document for round-trip-safe editing.
pub fn read_config(data_dir: &Path) -> Result<(Config, toml_edit::DocumentMut), StoreError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text
        .parse()
        .map_err(|e: toml_edit::TomlError| StoreError::InvalidConfig(e.to_string()))?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), StoreError> {
    let config_path = data_dir.join(CONFIG_FILE);
    store_io::atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        StoreError::WriteError {
            path: config_path,
            source: e,
        }
    })?;
    Ok(())
}

/// Update `reorder.upcoming_offset_days` in the config document
pub fn set_upcoming_offset_days(doc: &mut toml_edit::DocumentMut, days: u32) -> Result<(), StoreError> {
    if days < MIN_UPCOMING_OFFSET_DAYS {
        return Err(StoreError::InvalidConfig(format!(
            "upcoming offset must be at least {} days",
            MIN_UPCOMING_OFFSET_DAYS
        )));
    }
    if !doc.contains_key("reorder") {
        doc["reorder"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["reorder"]["upcoming_offset_days"] = toml_edit::value(i64::from(days));
    Ok(())
}

/// Update `ui.default_filter` in the config document
pub fn set_default_filter(doc: &mut toml_edit::DocumentMut, filter: &str) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["default_filter"] = toml_edit::value(filter);
}
