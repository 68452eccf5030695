//! Font registration through a generated fontconfig configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing the font configuration.
#[derive(Debug, Error)]
pub enum FontconfigError {
    #[error("failed to write font configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Write a `fonts.conf` registering `font_directory` into
/// `configuration_directory`, creating the directory if needed.
///
/// Each non-blank entry in `name_mapping` becomes a pattern match that
/// rewrites the friendly family name to the real one, so filters can
/// reference fonts under custom names. Returns the path of the written
/// file.
pub fn write_font_configuration(
    configuration_directory: &Path,
    font_directory: &str,
    name_mapping: &BTreeMap<String, String>,
) -> Result<PathBuf, FontconfigError> {
    fs::create_dir_all(configuration_directory)?;

    let path = configuration_directory.join("fonts.conf");
    if path.exists() {
        fs::remove_file(&path)?;
    }

    let mut mapping_block = String::new();
    let mut valid_mappings = 0;
    for (name, mapped_name) in name_mapping {
        if name.trim().is_empty() || mapped_name.trim().is_empty() {
            continue;
        }
        mapping_block.push_str("        <match target=\"pattern\">\n");
        mapping_block.push_str("                <test qual=\"any\" name=\"family\">\n");
        mapping_block.push_str(&format!("                        <string>{name}</string>\n"));
        mapping_block.push_str("                </test>\n");
        mapping_block
            .push_str("                <edit name=\"family\" mode=\"assign\" binding=\"same\">\n");
        mapping_block.push_str(&format!(
            "                        <string>{mapped_name}</string>\n"
        ));
        mapping_block.push_str("                </edit>\n");
        mapping_block.push_str("        </match>\n");
        valid_mappings += 1;
    }

    let configuration = format!(
        "<?xml version=\"1.0\"?>\n\
         <!DOCTYPE fontconfig SYSTEM \"fonts.dtd\">\n\
         <fontconfig>\n\
         \x20   <dir>.</dir>\n\
         \x20   <dir>{font_directory}</dir>\n\
         {mapping_block}\
         </fontconfig>"
    );
    fs::write(&path, configuration)?;

    tracing::debug!(
        "saved font configuration with {valid_mappings} font name mappings to {}",
        path.display()
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_without_mappings() {
        let dir = TempDir::new().unwrap();
        let path =
            write_font_configuration(dir.path(), "/fonts", &BTreeMap::new()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("<dir>/fonts</dir>"));
        assert!(!content.contains("<match"));
    }

    #[test]
    fn test_write_with_mappings() {
        let dir = TempDir::new().unwrap();
        let mapping = BTreeMap::from([("MyFont".to_string(), "Ubuntu Mono".to_string())]);
        let path = write_font_configuration(dir.path(), "/fonts", &mapping).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("<string>MyFont</string>"));
        assert!(content.contains("<string>Ubuntu Mono</string>"));
    }

    #[test]
    fn test_blank_mappings_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mapping = BTreeMap::from([
            ("  ".to_string(), "Ubuntu Mono".to_string()),
            ("MyFont".to_string(), " ".to_string()),
        ]);
        let path = write_font_configuration(dir.path(), "/fonts", &mapping).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(!content.contains("<match"));
    }

    #[test]
    fn test_overwrites_previous_configuration() {
        let dir = TempDir::new().unwrap();
        write_font_configuration(dir.path(), "/old", &BTreeMap::new()).unwrap();
        let path = write_font_configuration(dir.path(), "/new", &BTreeMap::new()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("<dir>/new</dir>"));
        assert!(!content.contains("<dir>/old</dir>"));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested/.fontconfig");
        let path = write_font_configuration(&nested, "/fonts", &BTreeMap::new()).unwrap();
        assert!(path.exists());
    }
}
