use log::{debug, info};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::BillingApi;
use crate::error::{DashboardError, Result};
use crate::model::{
    business_id, parse_bill_reports, parse_billing_items, BillReport, BillingLineItem,
    ReportStatus,
};

pub const REPORTS_FILE: &str = "report-billing-items.json";
pub const ITEMS_FILE: &str = "billing-items.json";

/// Reads the same JSON bodies the service returns from a directory on disk.
///
/// Status updates are written back into the reports file.
#[derive(Debug, Clone)]
pub struct SnapshotApi {
    dir: PathBuf,
}

impl SnapshotApi {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> Result<(PathBuf, String)> {
        let path = self.dir.join(name);
        debug!("reading snapshot {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok((path, body)),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(DashboardError::SnapshotMissing { path, source })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn origin(path: &Path) -> String {
    path.display().to_string()
}


impl BillingApi for SnapshotApi {
    fn fetch_reports(&self) -> Result<Vec<BillReport>> {
        let (path, body) = self.read(REPORTS_FILE)?;
        parse_bill_reports(&body).map_err(|source| DashboardError::Data {
            origin: origin(&path),
            source,
        })
    }

    fn fetch_billing_items(&self) -> Result<Vec<BillingLineItem>> {
        let (path, body) = self.read(ITEMS_FILE)?;
        parse_billing_items(&body).map_err(|source| DashboardError::Data {
            origin: origin(&path),
            source,
        })
    }

    fn update_report_status(&self, bill_report_id: &str, status: &ReportStatus) -> Result<()> {
        let failed = |detail: String| DashboardError::StatusUpdate {
            bill_report_id: bill_report_id.to_string(),
            detail,
        };

        let (path, body) = self.read(REPORTS_FILE)?;
        let mut entries: Vec<Map<String, Value>> =
            serde_json::from_str(&body).map_err(|e| failed(e.to_string()))?;

        let entry = entries
            .iter_mut()
            .find(|e| business_id(e) == bill_report_id)
            .ok_or_else(|| failed(format!("no report with bill_report_id {bill_report_id}")))?;
        entry.insert("status".to_string(), Value::String(status.as_str().to_string()));

        let json = serde_json::to_string_pretty(&entries).map_err(|e| failed(e.to_string()))?;
        std::fs::write(&path, json)?;

        info!("report {bill_report_id} set to {status} in {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot() -> (TempDir, SnapshotApi) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(REPORTS_FILE),
            r#"[{"id": 1, "bill_report_id": "BR-1", "status": "accepted"},
                {"id": 2, "bill_report_id": "BR-2", "status": "accepted"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(ITEMS_FILE),
            r#"[{"scheme_name": "A", "subsidy": "100"}]"#,
        )
        .unwrap();
        let api = SnapshotApi::new(dir.path());
        (dir, api)
    }

    #[test]
    fn reads_both_files() {
        let (_dir, api) = snapshot();
        assert_eq!(api.fetch_reports().unwrap().len(), 2);
        let items = api.fetch_billing_items().unwrap();
        assert_eq!(items[0].subsidy, 100.0);
    }

    #[test]
    fn status_update_is_written_back() {
        let (_dir, api) = snapshot();
        api.update_report_status("BR-2", &ReportStatus::Cancelled)
            .unwrap();
        let reports = api.fetch_reports().unwrap();
        assert_eq!(reports[0].status, ReportStatus::Accepted);
        assert_eq!(reports[1].status, ReportStatus::Cancelled);
    }

    #[test]
    fn status_update_finds_reports_the_way_they_parse() {
        let (dir, api) = snapshot();
        std::fs::write(
            dir.path().join(REPORTS_FILE),
            r#"[{"id": 12, "bill_report_id": null, "status": "accepted"},
                {"id": 13, "bill_report_id": " ", "bill_id": "B-13", "status": "accepted"}]"#,
        )
        .unwrap();
        let ids: Vec<String> = api
            .fetch_reports()
            .unwrap()
            .into_iter()
            .map(|r| r.bill_report_id)
            .collect();
        assert_eq!(ids, vec!["12", "B-13"]);

        api.update_report_status("12", &ReportStatus::Cancelled).unwrap();
        api.update_report_status("B-13", &ReportStatus::Cancelled).unwrap();
        let reports = api.fetch_reports().unwrap();
        assert!(reports.iter().all(|r| r.status == ReportStatus::Cancelled));
    }

    #[test]
    fn unknown_report_fails_without_writing() {
        let (dir, api) = snapshot();
        let before = std::fs::read_to_string(dir.path().join(REPORTS_FILE)).unwrap();
        let err = api
            .update_report_status("BR-9", &ReportStatus::Cancelled)
            .unwrap_err();
        assert!(matches!(err, DashboardError::StatusUpdate { .. }));
        let after = std::fs::read_to_string(dir.path().join(REPORTS_FILE)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_file_is_a_network_failure() {
        let (dir, api) = snapshot();
        std::fs::remove_file(dir.path().join(ITEMS_FILE)).unwrap();
        let err = api.fetch_billing_items().unwrap_err();
        assert!(matches!(err, DashboardError::SnapshotMissing { .. }));
        assert_eq!(err.load_failure(), Some(crate::error::LoadFailure::Network));
        assert!(api.fetch_reports().is_ok());
    }

    #[test]
    fn malformed_snapshot_is_a_data_failure() {
        let (dir, api) = snapshot();
        std::fs::write(dir.path().join(ITEMS_FILE), "{not json").unwrap();
        let err = api.fetch_billing_items().unwrap_err();
        assert_eq!(err.load_failure(), Some(crate::error::LoadFailure::Data));
    }
}
