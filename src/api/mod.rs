//! Sources of billing data: the REST service or a local JSON snapshot.

mod http;
mod snapshot;

pub use http::HttpApi;
pub use snapshot::SnapshotApi;

use crate::error::Result;
use crate::model::{BillReport, BillingLineItem, ReportStatus};

pub const REPORTS_PATH: &str = "report-billing-items/";
pub const ITEMS_PATH: &str = "billing-items/";
pub const UPDATE_PATH: &str = "update-billing-item/";

/// The three calls the dashboard makes against the billing service.
pub trait BillingApi {
    fn fetch_reports(&self) -> Result<Vec<BillReport>>;

    fn fetch_billing_items(&self) -> Result<Vec<BillingLineItem>>;

    /// Set the status of the report with business identifier `bill_report_id`.
    fn update_report_status(&self, bill_report_id: &str, status: &ReportStatus) -> Result<()>;
}

/// Join a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
