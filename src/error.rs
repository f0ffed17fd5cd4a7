use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a failed initial load, shown to the user instead of
/// the underlying error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    Network,
    Server,
    Data,
}

impl LoadFailure {
    pub fn message(&self) -> &'static str {
        match self {
            LoadFailure::Network => {
                "Could not reach the billing service. Check your connection and run the command again."
            }
            LoadFailure::Server => {
                "The billing service returned an error. Try again later."
            }
            LoadFailure::Data => "The billing service sent data that could not be read.",
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Config directory not found at {0}. Run 'billdash init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("{}", LoadFailure::Network)]
    Network {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("{0}")]
    LoadFailed(LoadFailure),

    #[error("{}", LoadFailure::Network)]
    SnapshotMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} (HTTP {status})", LoadFailure::Server)]
    Server { url: String, status: u16 },

    #[error("{}", LoadFailure::Data)]
    Data {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Status update for '{bill_report_id}' failed: {detail}")]
    StatusUpdate {
        bill_report_id: String,
        detail: String,
    },

    #[error("Report '{0}' not found")]
    ReportNotFound(String),

    #[error("Report '{bill_report_id}' cannot be cancelled (status: {status})")]
    InvalidTransition {
        bill_report_id: String,
        status: String,
    },

    #[error("Report '{0}' has no receipt file")]
    NoReceipt(String),

    #[error("Cancellation of '{0}' was not confirmed")]
    NotConfirmed(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Unknown table '{0}'. Use one of: {1}")]
    UnknownTable(String, String),

    #[error("Invalid column selection '{0}'. Expected '<table>=<value>'.")]
    InvalidColumnSelection(String),

    #[error("Unsupported export format '{0}'. Use xlsx, csv, html or pdf.")]
    UnsupportedFormat(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Nothing to export: no tables are open")]
    NothingToExport,

    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// The load classification for fetch failures, `None` for everything else.
    pub fn load_failure(&self) -> Option<LoadFailure> {
        match self {
            DashboardError::Network { .. } | DashboardError::SnapshotMissing { .. } => {
                Some(LoadFailure::Network)
            }
            DashboardError::Server { .. } => Some(LoadFailure::Server),
            DashboardError::Data { .. } => Some(LoadFailure::Data),
            DashboardError::LoadFailed(failure) => Some(*failure),
            _ => None,
        }
    }

    /// Errors raised while producing an export file. These leave state alone.
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Xlsx(_)
                | DashboardError::Csv(_)
                | DashboardError::TypstNotFound
                | DashboardError::PdfGeneration(_)
                | DashboardError::Io(_)
                | DashboardError::NothingToExport
                | DashboardError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_load_failures() {
        let server = DashboardError::Server {
            url: "http://x/billing-items/".into(),
            status: 502,
        };
        assert_eq!(server.load_failure(), Some(LoadFailure::Server));
        assert!(server.to_string().contains("HTTP 502"));

        let parse = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let data = DashboardError::Data {
            origin: "snapshot.json".into(),
            source: parse,
        };
        assert_eq!(data.load_failure(), Some(LoadFailure::Data));
        assert_eq!(data.to_string(), LoadFailure::Data.message());

        assert_eq!(DashboardError::NothingToExport.load_failure(), None);
    }

    #[test]
    fn status_update_keeps_raw_detail() {
        let err = DashboardError::StatusUpdate {
            bill_report_id: "BR-7".into(),
            detail: "{\"error\": \"already settled\"}".into(),
        };
        assert!(err.to_string().contains("already settled"));
        assert!(!err.is_export_failure());
    }

    #[test]
    fn export_errors_are_export_failures() {
        assert!(DashboardError::TypstNotFound.is_export_failure());
        assert!(DashboardError::UnsupportedFormat("ods".into()).is_export_failure());
        assert!(!DashboardError::LoadFailed(LoadFailure::Server).is_export_failure());
        let notice = DashboardError::ExportFailed("disk full".into());
        assert_eq!(notice.to_string(), "Export failed: disk full");
    }
}
