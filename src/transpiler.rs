//! SQL transpiler for sheet ranges.
//!
//! Converts a [`SheetTable`] into one static `INSERT` statement:
//!
//! ```text
//! INSERT INTO `t_shop` (`id`,`name`) VALUES ('1','Acme'),('2',null);
//! ```

use std::fmt;

use crate::error::{SheetResult, SheetSqlError};
use crate::sheet::{ColumnName, SheetTable};

/// Stand-in for `\` in quoted values.
pub const BACKSLASH_PLACEHOLDER: &str = "¥";

/// Trait for converting nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

/// A single formatted cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Text(String),
}

impl SqlValue {
    /// Empty cells become `Null`, everything else is text.
    pub fn from_cell(cell: &str) -> Self {
        if cell.is_empty() {
            SqlValue::Null
        } else {
            SqlValue::Text(cell.to_string())
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> String {
        match self {
            SqlValue::Null => "null".to_string(),
            SqlValue::Text(s) => format!("'{}'", escape_text(s)),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl ToSql for ColumnName {
    fn to_sql(&self) -> String {
        quote_identifier(self.as_str())
    }
}

/// Escape a text value for use between single quotes.
///
/// Backslashes are swapped for the placeholder first; quote escaping
/// introduces new backslashes which must survive untouched.
pub fn escape_text(value: &str) -> String {
    value
        .replace('\\', BACKSLASH_PLACEHOLDER)
        .replace('\'', "\\'")
}

/// Wrap an identifier in backticks, doubling any embedded backtick.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// One `INSERT INTO ... VALUES ...;` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<ColumnName>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl InsertStatement {
    /// Build the statement for `table` from fetched rows.
    ///
    /// Data rows shorter than the header are padded with `null`, the
    /// data source drops trailing empty cells.
    pub fn from_table(table: &str, sheet: &SheetTable) -> SheetResult<Self> {
        let columns = sheet.columns(table)?;
        let width = columns.len();

        let rows = sheet
            .data_rows()
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                if cells.len() > width {
                    return Err(SheetSqlError::RowTooWide {
                        table: table.to_string(),
                        row: i + 1,
                        expected: width,
                        found: cells.len(),
                    });
                }
                let mut values: Vec<SqlValue> =
                    cells.iter().map(|c| SqlValue::from_cell(c)).collect();
                values.resize(width, SqlValue::Null);
                Ok(values)
            })
            .collect::<SheetResult<Vec<_>>>()?;

        Ok(Self {
            table: table.to_string(),
            columns,
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl ToSql for InsertStatement {
    fn to_sql(&self) -> String {
        let mut sql = String::from("INSERT INTO ");
        sql.push_str(&quote_identifier(&self.table));

        let cols: Vec<String> = self.columns.iter().map(|c| c.to_sql()).collect();
        sql.push_str(" (");
        sql.push_str(&cols.join(","));
        sql.push_str(") VALUES ");

        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let values: Vec<String> = row.iter().map(|v| v.to_sql()).collect();
                format!("({})", values.join(","))
            })
            .collect();
        sql.push_str(&rows.join(","));
        sql.push(';');

        sql
    }
}

/// Format one range as an `INSERT` statement.
pub fn format_insert(table: &str, sheet: &SheetTable) -> SheetResult<String> {
    InsertStatement::from_table(table, sheet).map(|stmt| stmt.to_sql())
}
