// src/sheet/table.rs

/// A rectangular view of one spreadsheet region: named columns in sheet order
/// and rows of optional text cells. Column order is significant; for the
/// hierarchical format it encodes nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Builds a table, padding or truncating every row to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor for literal tables; `""` becomes a missing cell.
    #[cfg(test)]
    pub fn from_strs(columns: &[&str], rows: &[&[&str]]) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect()
            })
            .collect();
        Self::new(columns, rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw cell text. Missing cells and empty strings both come back as `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)?
            .get(col)?
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    /// Row indices in table order.
    pub fn row_indices(&self) -> std::ops::Range<usize> {
        0..self.rows.len()
    }
}

/// Trimmed text, or `None` if nothing but whitespace remains.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Replaces the Unicode horizontal ellipsis with three ASCII periods.
pub fn normalize_ellipsis(value: &str) -> String {
    value.replace('\u{2026}', "...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_padded_and_truncated() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Some("1".into())], vec![Some("1".into()), Some("2".into()), Some("3".into())]],
        );
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.cell(0, 1), None, "Short row should be padded with missing cells");
        assert_eq!(table.cell(1, 1), Some("2"));
        assert_eq!(table.cell(1, 2), None, "Extra cells should be dropped");
    }

    #[test]
    fn test_empty_and_missing_cells_are_identical() {
        let table = Table::new(vec!["a".into(), "b".into()], vec![vec![Some(String::new()), None]]);
        assert_eq!(table.cell(0, 0), None);
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(5, 0), None, "Out-of-range row is just missing");
    }

    #[test]
    fn test_literal_table_without_rows() {
        let table = Table::from_strs(&["", "Level1", "Source Occurs"], &[]);
        assert!(table.is_empty());
        assert_eq!(table.shape(), (0, 3));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(non_blank("  A "), Some("A"));
        assert_eq!(non_blank(" \t "), None);
        assert_eq!(normalize_ellipsis("see\u{2026}more"), "see...more");
    }
}
