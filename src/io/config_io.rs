use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store::atomic_write;
use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "LODE_DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("invalid config key: {0}")]
    InvalidKey(String),
    #[error("no data directory: pass --data-dir or set LODE_DATA_DIR")]
    NoDataDir,
}

/// Resolve the data directory: explicit flag, then `LODE_DATA_DIR`, then
/// the platform's local data dir.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_local_dir()
        .map(|d| d.join("lodestone"))
        .ok_or(ConfigError::NoDataDir)
}

/// Read config.toml. A missing file gives the defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

/// Read the raw document for format-preserving edits.
pub fn read_document(data_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text.parse()?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(toml_edit::DocumentMut::new()),
        Err(e) => Err(ConfigError::ReadError { path, source: e }),
    }
}

pub fn write_document(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    fs::create_dir_all(data_dir)
        .and_then(|_| atomic_write(&path, doc.to_string().as_bytes()))
        .map_err(|e| ConfigError::WriteError { path, source: e })
}

fn split_key(key: &str) -> Result<Vec<&str>, ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }
    Ok(parts)
}

/// Look up a dotted key (`magnet.folder.radius`) in the document.
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Result<Option<String>, ConfigError> {
    let parts = split_key(key)?;
    let mut item = doc.as_item();
    for part in parts {
        match item.get(part) {
            Some(next) => item = next,
            None => return Ok(None),
        }
    }
    Ok(Some(match item.as_value() {
        Some(value) => {
            let mut bare = value.clone();
            bare.decor_mut().clear();
            bare.to_string()
        }
        None => item.to_string().trim().to_string(),
    }))
}

/// Set a dotted key, creating intermediate tables. The value is parsed as a
/// TOML literal when it is one and stored as a string otherwise. The edited
/// document must still deserialize into a valid config.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let parts = split_key(key)?;
    let (last, tables) = parts
        .split_last()
        .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;

    let value: toml_edit::Value = raw
        .parse()
        .unwrap_or_else(|_| toml_edit::Value::from(raw));

    let mut table = doc.as_table_mut();
    for part in tables {
        if !table.contains_key(part) {
            let mut fresh = toml_edit::Table::new();
            fresh.set_implicit(true);
            table.insert(part, toml_edit::Item::Table(fresh));
        }
        table = table
            .get_mut(part)
            .and_then(toml_edit::Item::as_table_mut)
            .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;
    }
    table.insert(last, toml_edit::value(value));

    toml::from_str::<AppConfig>(&doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# lodestone settings
[ui]
sidebar_width = 30 # cells

[magnet.folder]
radius = 72.0
"#
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.sidebar_width, 26);
    }

    #[test]
    fn reads_overrides() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), sample_config()).unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.sidebar_width, 30);
        assert_eq!(config.magnet.folder().radius, 72.0);
    }

    #[test]
    fn round_trip_preserves_formatting() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, sample_config()).unwrap();

        let doc = read_document(tmp.path()).unwrap();
        write_document(tmp.path(), &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), sample_config());
    }

    #[test]
    fn get_dotted_keys() {
        let doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        assert_eq!(get_value(&doc, "ui.sidebar_width").unwrap().as_deref(), Some("30"));
        assert_eq!(get_value(&doc, "magnet.folder.radius").unwrap().as_deref(), Some("72.0"));
        assert_eq!(get_value(&doc, "ui.nope").unwrap(), None);
        assert!(get_value(&doc, "ui..x").is_err());
    }

    #[test]
    fn set_creates_tables_and_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_value(&mut doc, "magnet.fab.max_offset", "9.5").unwrap();
        set_value(&mut doc, "ui.sidebar_width", "32").unwrap();
        let text = doc.to_string();
        assert!(text.contains("# lodestone settings"));
        let config: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.magnet.fab().container.max_offset, 9.5);
        assert_eq!(config.ui.sidebar_width, 32);
    }

    #[test]
    fn set_rejects_wrong_type() {
        let mut doc = toml_edit::DocumentMut::new();
        assert!(matches!(
            set_value(&mut doc, "ui.sidebar_width", "wide"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/lode-test"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/lode-test"));
    }
}
