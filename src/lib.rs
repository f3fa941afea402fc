//! # sheetsql
//!
//! Dump Google Sheets ranges as static SQL `INSERT` statements, one file per
//! table.
//!
//! ## Quick Example
//!
//! ```rust
//! use sheetsql::prelude::*;
//!
//! let sheet = SheetTable::from_rows([
//!     vec!["企業情報#id", "企業情報#name"],
//!     vec!["1", "O'Brien & Co"],
//!     vec!["2", ""],
//! ]);
//!
//! let sql = sheetsql::format_insert("t_shop", &sheet).unwrap();
//! assert_eq!(
//!     sql,
//!     r"INSERT INTO `t_shop` (`id`,`name`) VALUES ('1','O\'Brien & Co'),('2',null);"
//! );
//! ```
//!
//! ## Markers
//!
//! | Input          | Shape                      | Yields                 |
//! |----------------|----------------------------|------------------------|
//! | Range          | `label#table!A1:D`         | sheet tab + table name |
//! | Header cell    | `label#column`             | column name            |
//! | Empty cell     | `""`                       | `null`                 |
//! | Backslash      | `a\b`                      | `'a¥b'`                |

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod sheet;
pub mod source;
pub mod transpiler;

pub use sheet::{ColumnName, RangeSpec, SheetTable};
pub use transpiler::format_insert;

pub mod prelude {
    pub use crate::auth::Credentials;
    pub use crate::config::{AuthConfig, Config};
    pub use crate::engine::{Exporter, RunReport};
    pub use crate::error::*;
    pub use crate::sheet::{ColumnName, RangeSpec, SheetTable};
    pub use crate::source::{GoogleSheets, SheetSource, ValueRange};
    pub use crate::transpiler::{InsertStatement, SqlValue, ToSql};
}
