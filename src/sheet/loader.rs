// src/sheet/loader.rs

// --- Imports ---
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use crate::extractors::boundary::ANCHOR_COLUMN;
use crate::sheet::table::Table;
use crate::utils::error::LoadError;

// --- Constants ---
/// Sheet-name fragments that mark a mapping sheet (compared lower-case).
const MAPPING_SHEET_KEYWORDS: [&str; 4] = ["tocanonical", "mapping", "transform", "(t)"];

/// Used when no sheet contains the anchor column.
const FALLBACK_SHEET_INDEX: usize = 2;
const FALLBACK_HEADER_ROW: usize = 13;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Name(String),
    Index(usize),
}

impl SheetRef {
    /// Numeric arguments select by position, anything else by name.
    pub fn parse(value: &str) -> Self {
        value
            .parse::<usize>()
            .map(SheetRef::Index)
            .unwrap_or_else(|_| SheetRef::Name(value.to_string()))
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Name(name) => write!(f, "'{}'", name),
            SheetRef::Index(idx) => write!(f, "#{}", idx),
        }
    }
}

/// Where the mapping table lives: the sheet, and the absolute (0-based) row
/// holding the column titles. Data rows follow the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocation {
    pub sheet: SheetRef,
    pub header_row: usize,
}

impl SheetLocation {
    pub fn fallback() -> Self {
        Self {
            sheet: SheetRef::Index(FALLBACK_SHEET_INDEX),
            header_row: FALLBACK_HEADER_ROW,
        }
    }
}

// --- Workbook Access ---

/// Opens any workbook type calamine understands (xlsx, xlsm, xlsb, xls, ods).
pub fn open_workbook(path: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>, LoadError> {
    open_workbook_auto(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Scans the workbook for the sheet and row holding the anchor column.
pub fn locate_data<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> SheetLocation {
    let sheet_names = workbook.sheet_names();
    locate_in_sheets(&sheet_names, |name| workbook.worksheet_range(name))
}

/// Searches candidate sheets in order, reading each through `read_sheet`.
/// Sheets that fail to read are skipped; if nothing matches the fixed
/// fallback location is returned.
pub fn locate_in_sheets<F>(sheet_names: &[String], mut read_sheet: F) -> SheetLocation
where
    F: FnMut(&str) -> Result<Range<Data>, calamine::Error>,
{
    for sheet_name in candidate_sheets(sheet_names) {
        match read_sheet(&sheet_name) {
            Ok(range) => {
                if let Some(row) = find_header_row(&range) {
                    tracing::info!("Found data structure in sheet '{}' at row {}", sheet_name, row);
                    return SheetLocation {
                        sheet: SheetRef::Name(sheet_name),
                        header_row: row,
                    };
                }
                tracing::debug!("No '{}' column in sheet '{}'", ANCHOR_COLUMN, sheet_name);
            }
            Err(e) => {
                tracing::warn!("Error reading sheet '{}': {}", sheet_name, e);
                continue;
            }
        }
    }

    let fallback = SheetLocation::fallback();
    tracing::warn!(
        "Could not auto-detect data location, using default (sheet {}, header row {})",
        fallback.sheet,
        fallback.header_row
    );
    fallback
}

/// Reads the located sheet into a [`Table`].
pub fn load_table<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    location: &SheetLocation,
) -> Result<Table, LoadError> {
    let (sheet_name, range) = match &location.sheet {
        SheetRef::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(LoadError::SheetNotFound(name.clone()));
            }
            let range = workbook.worksheet_range(name).map_err(|source| LoadError::SheetRead {
                sheet: name.clone(),
                source,
            })?;
            (name.clone(), range)
        }
        SheetRef::Index(idx) => {
            let name = workbook
                .sheet_names()
                .get(*idx)
                .cloned()
                .ok_or(LoadError::SheetIndexOutOfRange(*idx))?;
            let range = workbook
                .worksheet_range_at(*idx)
                .ok_or(LoadError::SheetIndexOutOfRange(*idx))?
                .map_err(|source| LoadError::SheetRead {
                    sheet: name.clone(),
                    source,
                })?;
            (name, range)
        }
    };

    table_from_range(&range, &sheet_name, location.header_row)
}

// --- Range Helpers ---

/// Mapping-looking sheets first; every sheet if none look like one.
pub fn candidate_sheets(sheet_names: &[String]) -> Vec<String> {
    let mapping: Vec<String> = sheet_names
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            MAPPING_SHEET_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .cloned()
        .collect();

    if mapping.is_empty() {
        sheet_names.to_vec()
    } else {
        mapping
    }
}

/// Absolute index of the first row with a cell mentioning the anchor column.
pub fn find_header_row(range: &Range<Data>) -> Option<usize> {
    let (start_row, _) = range.start()?;
    range
        .rows()
        .position(|row| {
            row.iter()
                .filter_map(cell_text)
                .any(|text| text.contains(ANCHOR_COLUMN))
        })
        .map(|offset| start_row as usize + offset)
}

/// Builds a table whose column positions are absolute sheet columns, so a
/// used range starting at column C still yields two leading blank columns.
pub fn table_from_range(range: &Range<Data>, sheet_name: &str, header_row: usize) -> Result<Table, LoadError> {
    let out_of_range = || LoadError::HeaderOutOfRange {
        sheet: sheet_name.to_string(),
        row: header_row,
    };

    let (end_row, end_col) = range.end().ok_or_else(out_of_range)?;
    let (end_row, width) = (end_row as usize, end_col as usize + 1);
    if header_row > end_row {
        return Err(out_of_range());
    }

    let read_row = |row: usize| -> Vec<Option<String>> {
        (0..width)
            .map(|col| range.get_value((row as u32, col as u32)).and_then(cell_text))
            .collect()
    };

    let headers = read_row(header_row)
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();
    let columns = dedupe_headers(headers);

    let rows = ((header_row + 1)..=end_row).map(read_row).collect();

    let table = Table::new(columns, rows);
    tracing::debug!("Loaded sheet '{}' from header row {}: shape {:?}", sheet_name, header_row, table.shape());
    Ok(table)
}

/// Titles are kept verbatim. Repeated titles get a `.N` suffix (`Name`,
/// `Name.1`, ...). Untitled columns before the first title stay blank so the
/// hierarchy region can skip them; later ones become `Unnamed: <col>`.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut titled = false;
    headers
        .into_iter()
        .enumerate()
        .map(|(col, header)| {
            let header = if header.trim().is_empty() {
                if !titled {
                    return header;
                }
                format!("Unnamed: {}", col)
            } else {
                titled = true;
                header
            };
            let count = seen.entry(header.clone()).or_insert(0);
            let name = if *count == 0 {
                header
            } else {
                format!("{}.{}", header, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Stringifies one cell; empty cells are `None`.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive: chrono::NaiveDateTime| naive.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
