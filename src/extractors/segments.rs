// src/extractors/segments.rs
use indexmap::IndexMap;

use crate::extractors::format::FormatTag;
use crate::sheet::table::Table;

/// Flat formats keep a fixed-width preamble; element columns start here.
pub const SEGMENT_ATTRIBUTE_START: usize = 10;

/// Element values of one segment, keyed by column title.
pub type SegmentRecord = IndexMap<String, String>;

/// Segment records of a flat format, keyed by segment identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHierarchy {
    pub format: FormatTag,
    pub segments: IndexMap<String, SegmentRecord>,
}

/// One record per row, keyed by the row's first cell (`ISA`, `UNB`,
/// `E1EDK01`, ...). Rows without an identifier are skipped; a repeated
/// identifier replaces the earlier record. Missing element cells are kept
/// as empty strings.
pub fn extract_segments(table: &Table, format: FormatTag) -> SegmentHierarchy {
    let element_columns = SEGMENT_ATTRIBUTE_START.min(table.columns.len())..table.columns.len();
    let mut segments: IndexMap<String, SegmentRecord> = IndexMap::new();

    for row in table.row_indices() {
        let Some(segment_id) = table.cell(row, 0) else {
            tracing::trace!("Skipping row {} without segment identifier", row);
            continue;
        };

        let record: SegmentRecord = element_columns
            .clone()
            .map(|col| {
                let value = table.cell(row, col).unwrap_or_default();
                (table.columns[col].clone(), value.to_string())
            })
            .collect();

        if segments.insert(segment_id.to_string(), record).is_some() {
            tracing::debug!("{} segment '{}' repeated at row {}, keeping the later one", format, segment_id, row);
        }
    }

    tracing::debug!("Extracted {} {} segments", segments.len(), format);
    SegmentHierarchy { format, segments }
}
