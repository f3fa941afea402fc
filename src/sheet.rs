//! Data model for fetched sheet ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SheetResult, SheetSqlError};
use crate::parser;

/// A configured range: which rectangle of which sheet tab feeds which table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Human-readable label before the marker.
    pub label: String,
    /// Target table name.
    pub table: String,
    /// Full sheet tab name, `<label>#<table>`.
    pub sheet: String,
    /// A1-notation cells, e.g. `A1:D`.
    pub cells: String,
}

impl RangeSpec {
    /// Parse `<label>#<table>!<cells>`.
    ///
    /// # Example
    ///
    /// ```
    /// use sheetsql::RangeSpec;
    ///
    /// let spec = RangeSpec::parse("商品情報#t_shop_product!A1:D").unwrap();
    /// assert_eq!(spec.table, "t_shop_product");
    /// ```
    pub fn parse(input: &str) -> SheetResult<Self> {
        parser::parse_range(input)
    }

    /// The A1 range string sent to the data source.
    pub fn range(&self) -> String {
        format!("{}{}{}", self.sheet, parser::SHEET_SEPARATOR, self.cells)
    }

    /// Output file name, `<table>.sql`.
    pub fn file_name(&self) -> String {
        format!("{}.sql", self.table)
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.range())
    }
}

/// A column identifier taken from a header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnName(String);

impl ColumnName {
    /// Derive the column from a `<label>#<column>` header cell.
    pub fn from_header(cell: &str) -> Option<Self> {
        parser::parse_header_cell(cell).map(|name| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw rows of one range. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTable {
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a table from string slices. Handy in tests and examples.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Resolve every header cell into a column name.
    pub fn columns(&self, table: &str) -> SheetResult<Vec<ColumnName>> {
        let header = self
            .header()
            .ok_or_else(|| SheetSqlError::EmptyRange(table.to_string()))?;

        header
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                ColumnName::from_header(cell).ok_or_else(|| SheetSqlError::MalformedHeader {
                    table: table.to_string(),
                    index,
                    cell: cell.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns() {
        let table = SheetTable::from_rows([vec!["lbl#col1", "lbl#col2"]]);
        let cols = table.columns("t").unwrap();
        let names: Vec<&str> = cols.iter().map(ColumnName::as_str).collect();
        assert_eq!(names, vec!["col1", "col2"]);
    }

    #[test]
    fn test_columns_malformed() {
        let table = SheetTable::from_rows([vec!["lbl#id", "name"]]);
        match table.columns("t") {
            Err(SheetSqlError::MalformedHeader { index, cell, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(cell, "name");
            }
            other => panic!("expected malformed header, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table() {
        let table = SheetTable::default();
        assert!(table.header().is_none());
        assert!(table.data_rows().is_empty());
        assert!(matches!(
            table.columns("t"),
            Err(SheetSqlError::EmptyRange(_))
        ));
    }

    #[test]
    fn test_file_name() {
        let spec = RangeSpec::parse("企業情報#t_shop!A1:D").unwrap();
        assert_eq!(spec.file_name(), "t_shop.sql");
        assert_eq!(spec.to_string(), "企業情報#t_shop!A1:D");
    }
}
