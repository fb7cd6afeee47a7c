//! Pipe table construction.

use super::classify::is_table_separator;
use super::inline::InlineParser;
use crate::model::{FootnoteRegistry, Table, TableCell, TableRow};

/// Builds a [`Table`] from a run of contiguous pipe-table lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableBuilder;

impl TableBuilder {
    /// Create a table builder.
    pub fn new() -> Self {
        Self
    }

    /// Build a table from raw lines.
    ///
    /// Separator rows are dropped. The first remaining row is the header and
    /// fixes the column count; extra cells in later rows are ignored, short
    /// rows keep only the cells they provide. Returns `None` when the header
    /// has no non-empty cell.
    pub fn build(
        &self,
        lines: &[&str],
        inline: &InlineParser,
        registry: &mut FootnoteRegistry,
    ) -> Option<Table> {
        let mut rows = lines
            .iter()
            .filter(|line| !line.trim().is_empty() && !is_table_separator(line))
            .map(|line| split_row(line));

        let header = rows.next()?;
        if header.iter().all(|c| c.is_empty()) {
            return None;
        }

        let columns = header.len();
        let mut table = Table::new(columns);
        table.add_row(TableRow::header(
            header
                .iter()
                .map(|c| TableCell::new(inline.parse(c, registry)))
                .collect(),
        ));

        for cells in rows {
            table.add_row(TableRow::new(
                cells
                    .iter()
                    .take(columns)
                    .map(|c| TableCell::new(inline.parse(c, registry)))
                    .collect(),
            ));
        }

        Some(table)
    }
}

/// Split a pipe-delimited row into trimmed cell strings.
///
/// One leading and one trailing pipe are treated as borders.
pub fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> Option<Table> {
        let mut reg = FootnoteRegistry::new();
        TableBuilder::new().build(lines, &InlineParser::new(), &mut reg)
    }

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("a | b"), vec!["a", "b"]);
        assert_eq!(split_row("| a | |"), vec!["a", ""]);
    }

    #[test]
    fn test_build_basic_table() {
        let table = build(&["| 항목 | 금액 |", "|---|---|", "| 인건비 | 100 |", "| 재료비 | 50 |"])
            .unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 3);
        assert!(table.header().is_some());
        assert_eq!(table.body()[1].plain_text(), "재료비\t50");
    }

    #[test]
    fn test_ragged_rows() {
        let table = build(&[
            "| a | b | c |",
            "|---|---|---|",
            "| 1 |",
            "| 1 | 2 | 3 | 4 |",
        ])
        .unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[1].cells.len(), 1);
        assert_eq!(table.rows[2].cells.len(), 3);
    }

    #[test]
    fn test_empty_header_is_skipped() {
        assert!(build(&["| | |", "|---|---|", "| 1 | 2 |"]).is_none());
        assert!(build(&["|---|---|"]).is_none());
    }

    #[test]
    fn test_bold_cell() {
        let table = build(&["| **합계** |", "|---|"]).unwrap();
        let header = table.header().unwrap();
        assert_eq!(header.cells[0].plain_text(), "합계");
    }
}
