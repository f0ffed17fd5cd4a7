use serde::{Deserialize, Serialize};

use crate::aggregate::{AmountField, DEFAULT_LABEL_LIMIT};
use crate::dashboard::TableId;
use crate::reports::DEFAULT_PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub dashboard: DashboardSettings,
    pub reports: ReportsSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Prefix for stored receipt paths. Falls back to `base_url`.
    pub receipt_base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            receipt_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiSettings {
    pub fn receipt_base(&self) -> &str {
        self.receipt_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub amount_field: AmountField,
    pub label_limit: usize,
    /// Tables shown when the command line names none.
    pub open_tables: Vec<TableId>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            amount_field: AmountField::default(),
            label_limit: DEFAULT_LABEL_LIMIT,
            open_tables: TableId::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportsSettings {
    pub page_size: usize,
}

impl Default for ReportsSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
        }
    }
}
