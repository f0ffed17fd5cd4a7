mod settings;

pub use settings::{
    ApiSettings, Config, DashboardSettings, ExportSettings, ReportsSettings, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};

use crate::error::{DashboardError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/billdash on Linux)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "billdash") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.billdash/
    let home = dirs_home().ok_or_else(|| {
        DashboardError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".billdash"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Relative output directories live under the config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(DashboardError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(DashboardError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| DashboardError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://localhost:8000/api"
# receipt_base_url = "http://localhost:8000"   # optional, defaults to base_url
timeout_secs = 30

[dashboard]
amount_field = "total"   # farmer_share, subsidy or total
label_limit = 20         # chart labels longer than this are shortened
# Tables shown by default, in any order:
# scheme, investment, sub-investment, center, constituency,
# investment-scheme, center-scheme, constituency-scheme
open_tables = [
  "scheme",
  "investment",
  "sub-investment",
  "center",
  "constituency",
  "investment-scheme",
  "center-scheme",
  "constituency-scheme",
]

[reports]
page_size = 10

[export]
output_dir = "output"    # relative to this directory, or absolute / ~/...
"#;
