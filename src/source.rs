//! Data sources that hand back raw sheet rows.
//!
//! The exporter only needs one capability, "fetch rows for a range", so
//! the network client sits behind [`SheetSource`] and tests can swap in a
//! plain map.

use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{SheetResult, SheetSqlError};
use crate::sheet::{RangeSpec, SheetTable};

/// Base URL of the Sheets v4 REST API.
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

/// Something that can fetch the rows of a range.
pub trait SheetSource {
    /// Fetch every row of `range`, header first.
    fn fetch(&self, range: &RangeSpec) -> impl Future<Output = SheetResult<SheetTable>> + Send;
}

/// The `ValueRange` document returned by `spreadsheets.values.get`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Absent when the range holds no data.
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// Read a saved `ValueRange` JSON document.
    pub fn from_file(path: impl AsRef<Path>) -> SheetResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Render every cell as text.
    pub fn into_table(self) -> SheetTable {
        SheetTable::new(
            self.values
                .into_iter()
                .map(|row| row.iter().map(cell_to_string).collect())
                .collect(),
        )
    }
}

fn cell_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

/// Google Sheets client bound to one spreadsheet.
#[derive(Debug, Clone)]
pub struct GoogleSheets {
    client: reqwest::Client,
    base: Url,
    spreadsheet_id: String,
    token: String,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: impl Into<String>, token: impl Into<String>) -> SheetResult<Self> {
        Self::with_base(SHEETS_API_BASE, spreadsheet_id, token)
    }

    /// Point the client at another API root (proxies, emulators).
    pub fn with_base(
        base: &str,
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
    ) -> SheetResult<Self> {
        let base = Url::parse(base)
            .map_err(|e| SheetSqlError::Config(format!("Invalid API base '{}': {}", base, e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
        })
    }

    /// `<base>/<id>/values/<range>` with each part percent-encoded.
    pub fn values_url(&self, range: &str) -> SheetResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SheetSqlError::Config(format!("API base '{}' cannot hold a path", self.base)))?
            .pop_if_empty()
            .extend([self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }
}

impl SheetSource for GoogleSheets {
    async fn fetch(&self, range: &RangeSpec) -> SheetResult<SheetTable> {
        let a1 = range.range();
        let url = self.values_url(&a1)?;
        debug!(%url, "fetching range");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SheetSqlError::fetch(&a1, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetSqlError::fetch(
                &a1,
                format!("{} {}", status, body.trim()),
            ));
        }

        let values: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetSqlError::fetch(&a1, e.to_string()))?;
        debug!(rows = values.values.len(), range = %values.range, "fetched range");

        Ok(values.into_table())
    }
}
