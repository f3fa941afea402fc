//! Configuration loaded from `sheetsql.toml`.
//!
//! Every field is optional. Without a file the exporter runs against the
//! built-in spreadsheet and range list.
//!
//! ```toml
//! spreadsheet_id = "1DLO7OK62WbHYX3npG_XvyCrVcdpn5rA-4-WQDR-ZelI"
//! output_dir = "./src/main/resources/"
//! ranges = ["企業情報#t_shop!A1:D", "商品情報#t_shop_product!A1:D"]
//!
//! [auth]
//! service_account = "~/keys/exporter.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SheetResult, SheetSqlError};
use crate::sheet::RangeSpec;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "sheetsql.toml";

pub const DEFAULT_SPREADSHEET_ID: &str = "1DLO7OK62WbHYX3npG_XvyCrVcdpn5rA-4-WQDR-ZelI";

pub const DEFAULT_OUTPUT_DIR: &str = "./src/main/resources/";

/// Sheets exported when no ranges are configured.
pub const DEFAULT_RANGES: &[&str] = &["企業情報#t_shop!A1:D", "商品情報#t_shop_product!A1:D"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub spreadsheet_id: String,
    pub output_dir: PathBuf,
    pub ranges: Vec<String>,
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            ranges: DEFAULT_RANGES.iter().map(|r| r.to_string()).collect(),
            auth: AuthConfig::default(),
        }
    }
}

/// Where credentials come from. See [`crate::auth::Credentials::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub access_token: Option<String>,
    pub service_account: Option<PathBuf>,
    pub authorized_user: Option<PathBuf>,
}

impl AuthConfig {
    /// `~/.credentials/sheetsql/authorized_user.json`
    pub fn default_authorized_user() -> Option<PathBuf> {
        dirs::home_dir().map(|home| {
            home.join(".credentials")
                .join("sheetsql")
                .join("authorized_user.json")
        })
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> SheetResult<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| SheetSqlError::Config(e.to_string()))?;
        config.expand_home();
        Ok(config)
    }

    /// Load `path`, or `./sheetsql.toml` when present, or the defaults.
    pub fn load(path: Option<&Path>) -> SheetResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.exists() {
                    return Ok(Self::default());
                }
                local
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            SheetSqlError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate every configured range.
    pub fn range_specs(&self) -> SheetResult<Vec<RangeSpec>> {
        if self.ranges.is_empty() {
            return Err(SheetSqlError::Config("No ranges configured".to_string()));
        }
        self.ranges.iter().map(|r| RangeSpec::parse(r)).collect()
    }

    fn expand_home(&mut self) {
        self.output_dir = expand_tilde(&self.output_dir);
        for path in [&mut self.auth.service_account, &mut self.auth.authorized_user]
            .into_iter()
            .flatten()
        {
            *path = expand_tilde(path);
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
