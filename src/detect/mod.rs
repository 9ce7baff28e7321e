// src/detect/mod.rs

// --- Imports ---
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::format::FormatTag;
use crate::sheet::table::{non_blank, Table};

// --- Segment Identifier Patterns (Lazy Static) ---
// Matched against the trimmed first cell of each row.
static SEGMENT_PATTERNS: Lazy<Vec<(FormatTag, Regex)>> = Lazy::new(|| {
    [
        // SAP IDoc segment types: E1EDK01, E2EDP01001, Z1CUSTOM
        (FormatTag::Idoc, r"^[EZ][12][A-Z0-9_]{3,}$"),
        // EDIFACT service segments
        (FormatTag::Edifact, r"^UN[ABHTZ]$"),
        // X12 interchange / group / transaction envelopes
        (FormatTag::EdiX12, r"^(?:ISA|IEA|GS|GE|ST|SE)$"),
    ]
    .iter()
    .filter_map(|(tag, pat)| Regex::new(pat).ok().map(|re| (*tag, re)))
    .collect()
});

// File-name fragments, compared lower-case against the file stem.
const FILE_NAME_HINTS: [(&str, FormatTag); 3] = [
    ("idoc", FormatTag::Idoc),
    ("edifact", FormatTag::Edifact),
    ("x12", FormatTag::EdiX12),
];

/// Classifies a loaded mapping table.
pub trait FormatDetector {
    fn detect(&self, table: &Table, source_path: &Path) -> FormatTag;
}

/// File-name hints first, then segment identifiers in the first column,
/// otherwise the nested canonical format.
#[derive(Debug, Default)]
pub struct HeuristicDetector;

impl HeuristicDetector {
    fn from_file_name(source_path: &Path) -> Option<FormatTag> {
        let stem = source_path.file_stem()?.to_str()?.to_lowercase();
        FILE_NAME_HINTS
            .iter()
            .find(|(hint, _)| stem.contains(hint))
            .map(|(_, tag)| *tag)
    }

    fn from_segment_ids(table: &Table) -> Option<FormatTag> {
        let mut votes = [(FormatTag::Idoc, 0usize), (FormatTag::Edifact, 0), (FormatTag::EdiX12, 0)];

        for id in table.row_indices().filter_map(|row| table.cell(row, 0).and_then(non_blank)) {
            if let Some((tag, _)) = SEGMENT_PATTERNS.iter().find(|(_, re)| re.is_match(id)) {
                if let Some(vote) = votes.iter_mut().find(|(t, _)| t == tag) {
                    vote.1 += 1;
                }
            }
        }
        tracing::debug!("Segment identifier votes: {:?}", votes);

        // Ties go to the earlier entry.
        votes
            .iter()
            .filter(|(_, count)| *count > 0)
            .fold(None, |best: Option<(FormatTag, usize)>, &(tag, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((tag, count)),
            })
            .map(|(tag, _)| tag)
    }
}

impl FormatDetector for HeuristicDetector {
    fn detect(&self, table: &Table, source_path: &Path) -> FormatTag {
        if let Some(tag) = Self::from_file_name(source_path) {
            tracing::debug!("Format {} taken from file name {}", tag, source_path.display());
            return tag;
        }
        if let Some(tag) = Self::from_segment_ids(table) {
            tracing::debug!("Format {} inferred from segment identifiers", tag);
            return tag;
        }
        FormatTag::Json
    }
}
