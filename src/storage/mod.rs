// src/storage/mod.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::extractors::dispatch::StructureDocument;
use crate::utils::error::StorageError;

const JSON_INDENT: &[u8] = b"    ";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified output directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the output directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn path_for(&self, document: &StructureDocument) -> PathBuf {
        self.base_dir.join(document.format.output_file_name())
    }

    /// Writes `<TAG>_structure.json`, indented with four spaces.
    pub fn save_structure(&self, document: &StructureDocument) -> Result<PathBuf, StorageError> {
        let file_path = self.path_for(document);
        let value = document.to_json()?;

        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
        value
            .serialize(&mut serializer)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        file.write_all(&buffer).map_err(StorageError::IoError)?;

        tracing::info!("Saved {} structure to {}", document.format, file_path.display());

        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::dispatch::dispatch;
    use crate::sheet::table::Table;

    #[test]
    fn test_save_creates_dir_and_names_file_by_format() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let storage = StorageManager::new(&out).unwrap();
        assert!(out.is_dir(), "Output directory should be created");

        let table = Table::from_strs(&["L1", "Source Occurs"], &[&["A", "1"], &["B", "0..1"]]);
        let document = dispatch("JSON", &table).unwrap();
        let path = storage.save_structure(&document).unwrap();

        assert_eq!(path, out.join("JSON_structure.json"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n    \"format\": \"JSON\","), "Unexpected layout:\n{}", written);
        assert!(written.contains("\n        \"Source Occurs\": \"1\""), "Nested entries use four-space steps");

        let reparsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(reparsed["B"]["Source Occurs"], "0..1");
    }

    #[test]
    fn test_save_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let mut columns = vec!["Seg"];
        columns.extend(std::iter::repeat("").take(9));
        columns.push("Element");

        let first = Table::from_strs(&columns, &[&["UNB", "", "", "", "", "", "", "", "", "", "old"]]);
        let second = Table::from_strs(&columns, &[&["UNB", "", "", "", "", "", "", "", "", "", "new"]]);
        storage.save_structure(&dispatch("EDIFACT", &first).unwrap()).unwrap();
        let path = storage.save_structure(&dispatch("EDIFACT", &second).unwrap()).unwrap();

        let reparsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(reparsed["UNB"]["Element"], "new");
    }
}
