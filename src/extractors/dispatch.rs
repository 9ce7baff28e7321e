// src/extractors/dispatch.rs
use serde_json::{Map, Value};

use crate::extractors::format::FormatTag;
use crate::extractors::hierarchy::{extract_hierarchy, Node};
use crate::extractors::segments::{extract_segments, SegmentHierarchy};
use crate::sheet::table::Table;
use crate::utils::error::{ExtractError, StorageError};

// --- Strategies ---

/// What an extractor produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Hierarchy(Node),
    Segments(SegmentHierarchy),
}

/// A way of turning a mapping table into a structure description.
pub trait StructureExtractor {
    fn format(&self) -> FormatTag;
    fn extract(&self, table: &Table) -> Extraction;
}

/// Nested canonical trees (`JSON`).
pub struct HierarchyExtractor;

impl StructureExtractor for HierarchyExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Json
    }

    fn extract(&self, table: &Table) -> Extraction {
        Extraction::Hierarchy(extract_hierarchy(table))
    }
}

/// Flat segment formats; the tag only labels the output.
pub struct SegmentExtractor {
    pub format: FormatTag,
}

impl StructureExtractor for SegmentExtractor {
    fn format(&self) -> FormatTag {
        self.format
    }

    fn extract(&self, table: &Table) -> Extraction {
        Extraction::Segments(extract_segments(table, self.format))
    }
}

pub fn extractor_for(format: FormatTag) -> Box<dyn StructureExtractor> {
    if format.is_hierarchical() {
        Box::new(HierarchyExtractor)
    } else {
        Box::new(SegmentExtractor { format })
    }
}

// --- Output Document ---

/// `{"format": <tag>, ...extraction}` ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDocument {
    pub format: FormatTag,
    pub body: Extraction,
}

impl StructureDocument {
    /// Number of top-level entries next to `format`.
    pub fn entry_count(&self) -> usize {
        match &self.body {
            Extraction::Hierarchy(node) => node.key_count(),
            Extraction::Segments(segments) => segments.segments.len(),
        }
    }

    /// Tag first, then the extracted entries at the same level. An extracted
    /// entry literally named `format` replaces the tag.
    pub fn to_json(&self) -> Result<Value, StorageError> {
        let body = match &self.body {
            Extraction::Hierarchy(node) => serde_json::to_value(node),
            Extraction::Segments(segments) => {
                tracing::debug!("Serializing {} {} segments", segments.segments.len(), segments.format);
                serde_json::to_value(&segments.segments)
            }
        }
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let mut doc = Map::new();
        doc.insert("format".to_string(), Value::String(self.format.as_str().to_string()));
        if let Value::Object(entries) = body {
            if entries.contains_key("format") {
                tracing::warn!("Extracted entry 'format' overrides the format tag in the output");
            }
            doc.extend(entries);
        }
        Ok(Value::Object(doc))
    }
}

// --- Dispatch ---

/// Runs the extractor matching `format`.
pub fn dispatch_format(format: FormatTag, table: &Table) -> StructureDocument {
    let extractor = extractor_for(format);
    tracing::info!("Extracting {} structure from {} rows", extractor.format(), table.row_count());
    StructureDocument {
        format: extractor.format(),
        body: extractor.extract(table),
    }
}

/// Parses a detector-supplied tag and runs the matching extractor. Unknown
/// tags fail before anything is extracted.
pub fn dispatch(tag: &str, table: &Table) -> Result<StructureDocument, ExtractError> {
    let format: FormatTag = tag.parse()?;
    Ok(dispatch_format(format, table))
}
