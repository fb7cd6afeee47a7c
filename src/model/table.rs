//! Table types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of columns, fixed by the header row
    pub columns: usize,
}

impl Table {
    /// Create a new empty table with a fixed column count.
    pub fn new(columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the header row, if any.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first().filter(|r| r.is_header)
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[TableRow] {
        match self.header() {
            Some(_) => &self.rows[1..],
            None => &self.rows,
        }
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|v| TableCell::text(v.into()))
                .collect(),
        )
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub content: Paragraph,
}

impl TableCell {
    /// Create a cell from resolved content.
    pub fn new(content: Paragraph) -> Self {
        Self { content }
    }

    /// Create a cell with plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Paragraph::with_text(text))
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_header_and_body() {
        let mut table = Table::new(2);
        table.add_row(TableRow::header(vec![
            TableCell::text("구분"),
            TableCell::text("금액"),
        ]));
        table.add_row(TableRow::from_strings(["매출", "120"]));
        table.add_row(TableRow::from_strings(["비용", "80"]));

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert!(table.header().is_some());
        assert_eq!(table.body().len(), 2);
        assert_eq!(table.plain_text(), "구분\t금액\n매출\t120\n비용\t80");
    }

    #[test]
    fn test_headerless_table_body() {
        let mut table = Table::new(1);
        table.add_row(TableRow::from_strings(["a"]));
        assert!(table.header().is_none());
        assert_eq!(table.body().len(), 1);
    }
}
