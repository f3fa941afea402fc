//! Export driver.
//!
//! Runs every configured range through fetch, format and write, one at a
//! time. A failed fetch aborts the run; a failed write is logged and the
//! next range proceeds.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{SheetResult, SheetSqlError};
use crate::sheet::RangeSpec;
use crate::source::SheetSource;
use crate::transpiler::{InsertStatement, ToSql};

/// Outcome of one export run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Files written, in range order.
    pub written: Vec<PathBuf>,
    /// Tables skipped because their range held only a header.
    pub skipped: Vec<String>,
    /// Tables whose file could not be written.
    pub failed: Vec<(String, SheetSqlError)>,
    /// Statements produced in dry-run mode.
    pub statements: Vec<(String, String)>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sequential exporter over an injected [`SheetSource`].
pub struct Exporter<S> {
    source: S,
    output_dir: PathBuf,
    dry_run: bool,
}

impl<S: SheetSource> Exporter<S> {
    pub fn new(source: S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    /// Collect statements in the report instead of writing files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export every range in order.
    pub async fn run(&self, ranges: &[RangeSpec]) -> SheetResult<RunReport> {
        let mut report = RunReport::default();

        for range in ranges {
            let sheet = self.source.fetch(range).await?;

            if sheet.data_rows().is_empty() && !sheet.is_empty() {
                warn!(table = %range.table, "range has no data rows, skipping");
                report.skipped.push(range.table.clone());
                continue;
            }

            let stmt = InsertStatement::from_table(&range.table, &sheet)?;
            let sql = stmt.to_sql();

            if self.dry_run {
                report.statements.push((range.table.clone(), sql));
                continue;
            }

            let path = self.output_dir.join(range.file_name());
            match write_statement(&path, &sql) {
                Ok(()) => {
                    info!(path = %path.display(), rows = stmt.row_count(), "complete");
                    report.written.push(path);
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "failed to write");
                    report.failed.push((range.table.clone(), e));
                }
            }
        }

        Ok(report)
    }
}

/// Write one statement, newline-terminated, replacing any existing file.
pub fn write_statement(path: &Path, sql: &str) -> SheetResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n", sql))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_statement_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("t.sql");

        write_statement(&path, "INSERT INTO `t` (`a`) VALUES ('old old old');").unwrap();
        write_statement(&path, "INSERT INTO `t` (`a`) VALUES ('1');").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "INSERT INTO `t` (`a`) VALUES ('1');\n");
    }

    #[test]
    fn test_write_statement_into_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_statement(&blocker.join("t.sql"), "x").unwrap_err();
        assert!(matches!(err, SheetSqlError::Io(_)));
    }
}
