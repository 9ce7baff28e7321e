// src/extractors/boundary.rs
use std::ops::Range;

use crate::utils::error::BoundaryError;

/// Title of the first attribute column; everything left of it (after any
/// untitled leading columns) describes nesting levels.
pub const ANCHOR_COLUMN: &str = "Source Occurs";

/// Split of a header row into hierarchy and attribute regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBoundary {
    /// First titled column.
    pub start: usize,
    /// Position of the anchor column.
    pub end: usize,
    /// Number of columns in the header row.
    pub width: usize,
}

impl ColumnBoundary {
    /// `[start, end)`
    pub fn hierarchy(&self) -> Range<usize> {
        self.start..self.end
    }

    /// `[end, width)`, anchor included.
    pub fn attributes(&self) -> Range<usize> {
        self.end..self.width
    }
}

/// Finds the hierarchy region of a header row: from the first non-blank
/// title up to (not including) the anchor column.
pub fn locate_boundary<S: AsRef<str>>(columns: &[S]) -> Result<ColumnBoundary, BoundaryError> {
    let start = columns
        .iter()
        .position(|c| !c.as_ref().trim().is_empty())
        .ok_or(BoundaryError::NoTitledColumn)?;

    let end = columns
        .iter()
        .position(|c| c.as_ref() == ANCHOR_COLUMN)
        .ok_or(BoundaryError::MissingAnchor(ANCHOR_COLUMN))?;

    if start >= end {
        return Err(BoundaryError::EmptyHierarchy { start, end });
    }

    Ok(ColumnBoundary {
        start,
        end,
        width: columns.len(),
    })
}
