//! The billing-report browser: filtering, paging, detail expansion and the
//! accepted -> cancelled transition.

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::api::{join_url, BillingApi};
use crate::error::LoadFailure;
use crate::filter::{DateRange, Faceted, FilterSelection};
use crate::model::{BillReport, ReportStatus};
use crate::state::LoadState;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportDimension {
    Center,
    Status,
    Source,
    Scheme,
}

impl ReportDimension {
    pub const ALL: [ReportDimension; 4] = [
        ReportDimension::Center,
        ReportDimension::Status,
        ReportDimension::Source,
        ReportDimension::Scheme,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportDimension::Center => "Center",
            ReportDimension::Status => "Status",
            ReportDimension::Source => "Source of Receipt",
            ReportDimension::Scheme => "Scheme",
        }
    }
}

impl fmt::Display for ReportDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Faceted for BillReport {
    type Dim = ReportDimension;

    fn facet_values(&self, dim: ReportDimension) -> Vec<&str> {
        match dim {
            ReportDimension::Center => self.center_name.as_deref().into_iter().collect(),
            ReportDimension::Status => vec![self.status.as_str()],
            ReportDimension::Source => self.source_of_receipt.as_deref().into_iter().collect(),
            ReportDimension::Scheme => self.scheme_names(),
        }
    }

    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportsState {
    pub load: LoadState<Vec<BillReport>>,
    pub filters: FilterSelection<ReportDimension>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    /// Business identifiers of reports showing their line items.
    pub expanded: BTreeSet<String>,
    /// Report awaiting confirmation of a cancel.
    pub confirming: Option<String>,
    /// Reports with a status update in flight.
    pub pending: BTreeSet<String>,
    /// Last status-update failure, as reported by the service.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportsAction {
    Loaded(Vec<BillReport>),
    LoadFailed(LoadFailure),
    ToggleFilter { dim: ReportDimension, value: String },
    SetFilter { dim: ReportDimension, values: Vec<String> },
    SetDateRange(DateRange),
    SetPage(usize),
    ToggleExpanded(String),
    RequestCancel(String),
    AbortCancel,
    ConfirmCancel,
    CancelSucceeded(String),
    CancelFailed { bill_report_id: String, detail: String },
    DismissError,
}

impl Default for ReportsState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ReportsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            load: LoadState::Loading,
            filters: FilterSelection::new(),
            page: 1,
            page_size: page_size.max(1),
            expanded: BTreeSet::new(),
            confirming: None,
            pending: BTreeSet::new(),
            error: None,
        }
    }

    pub fn reduce(mut self, action: ReportsAction) -> Self {
        match action {
            ReportsAction::Loaded(reports) => {
                debug!("report browser loaded {} reports", reports.len());
                self.load = LoadState::Loaded(reports);
                self.page = 1;
            }
            ReportsAction::LoadFailed(failure) => self.load = LoadState::Failed(failure),
            ReportsAction::ToggleFilter { dim, value } => {
                self.filters.toggle(dim, &value);
                self.page = 1;
            }
            ReportsAction::SetFilter { dim, values } => {
                self.filters.set(dim, values);
                self.page = 1;
            }
            ReportsAction::SetDateRange(range) => {
                self.filters.date_range = range;
                self.page = 1;
            }
            ReportsAction::SetPage(page) => self.page = page.clamp(1, self.page_count()),
            ReportsAction::ToggleExpanded(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }
            ReportsAction::RequestCancel(id) => {
                if self.find(&id).is_some_and(|r| self.cancel_offered(r)) {
                    self.confirming = Some(id);
                }
            }
            ReportsAction::AbortCancel => self.confirming = None,
            ReportsAction::ConfirmCancel => {
                if let Some(id) = self.confirming.take() {
                    self.pending.insert(id);
                }
            }
            ReportsAction::CancelSucceeded(id) => {
                self.pending.remove(&id);
                if let Some(report) = self.find_mut(&id) {
                    report.status = ReportStatus::Cancelled;
                }
                info!("report {id} cancelled");
            }
            ReportsAction::CancelFailed {
                bill_report_id,
                detail,
            } => {
                self.pending.remove(&bill_report_id);
                warn!("cancelling report {bill_report_id} failed: {detail}");
                self.error = Some(detail);
            }
            ReportsAction::DismissError => self.error = None,
        }
        self
    }

    pub fn reports(&self) -> &[BillReport] {
        self.load.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, bill_report_id: &str) -> Option<&BillReport> {
        self.reports()
            .iter()
            .find(|r| r.bill_report_id == bill_report_id)
    }

    fn find_mut(&mut self, bill_report_id: &str) -> Option<&mut BillReport> {
        self.load
            .data_mut()?
            .iter_mut()
            .find(|r| r.bill_report_id == bill_report_id)
    }

    pub fn filtered(&self) -> Vec<&BillReport> {
        self.filters.apply(self.reports())
    }

    /// Never less than one, so an empty list still has a (blank) first page.
    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size).max(1)
    }

    /// The reports on the current page.
    pub fn visible(&self) -> Vec<&BillReport> {
        let page = self.page.clamp(1, self.page_count());
        self.filtered()
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn options(&self, dim: ReportDimension) -> Vec<String> {
        self.filters.options(self.reports(), dim)
    }

    pub fn is_expanded(&self, bill_report_id: &str) -> bool {
        self.expanded.contains(bill_report_id)
    }

    /// Only accepted reports without an update in flight can be cancelled.
    pub fn cancel_offered(&self, report: &BillReport) -> bool {
        report.status.is_cancellable() && !self.pending.contains(&report.bill_report_id)
    }
}

/// Send the confirmed cancel to `api` and fold the outcome back into the state.
///
/// Does nothing unless a cancel is awaiting confirmation.
pub fn confirm_cancel(state: ReportsState, api: &dyn BillingApi) -> ReportsState {
    let Some(id) = state.confirming.clone() else {
        return state;
    };
    let state = state.reduce(ReportsAction::ConfirmCancel);
    match api.update_report_status(&id, &ReportStatus::Cancelled) {
        Ok(()) => state.reduce(ReportsAction::CancelSucceeded(id)),
        Err(e) => {
            let detail = match e {
                crate::error::DashboardError::StatusUpdate { detail, .. } => detail,
                other => other.to_string(),
            };
            state.reduce(ReportsAction::CancelFailed {
                bill_report_id: id,
                detail,
            })
        }
    }
}

/// Absolute URL of a report's receipt file.
pub fn receipt_url(receipt_base: &str, report: &BillReport) -> Option<String> {
    report
        .receipt_file
        .as_deref()
        .map(|path| join_url(receipt_base, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DashboardError, Result};
    use crate::model::{parse_bill_reports, BillingLineItem};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    struct FakeApi {
        fail_with: Option<String>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl FakeApi {
        fn new(fail_with: Option<&str>) -> Self {
            Self {
                fail_with: fail_with.map(String::from),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl BillingApi for FakeApi {
        fn fetch_reports(&self) -> Result<Vec<BillReport>> {
            Ok(Vec::new())
        }

        fn fetch_billing_items(&self) -> Result<Vec<BillingLineItem>> {
            Ok(Vec::new())
        }

        fn update_report_status(&self, id: &str, status: &ReportStatus) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((id.to_string(), status.as_str().to_string()));
            match &self.fail_with {
                Some(detail) => Err(DashboardError::StatusUpdate {
                    bill_report_id: id.to_string(),
                    detail: detail.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    fn reports() -> Vec<BillReport> {
        parse_bill_reports(
            r#"[
              {"id": 1, "bill_report_id": "BR-1", "center_name": "Rampur", "status": "accepted",
               "source_of_receipt": "Godown", "created_at": "2024-01-01T10:00:00Z",
               "recipt_file": "/media/receipts/br-1.pdf",
               "components": [{"scheme_name": "A", "sold_amount": 10}]},
              {"id": 2, "bill_report_id": "BR-2", "center_name": "Sitapur", "status": "cancelled",
               "source_of_receipt": "Supplier", "created_at": "2024-02-01T10:00:00Z",
               "components": [{"scheme_name": "B"}, {"scheme_name": "A"}]},
              {"id": 3, "bill_report_id": "BR-3", "center_name": "Rampur", "status": "accepted",
               "created_at": "2024-03-01T10:00:00Z",
               "components": [{"scheme_name": "B"}]}
            ]"#,
        )
        .unwrap()
    }

    fn loaded() -> ReportsState {
        ReportsState::new(2).reduce(ReportsAction::Loaded(reports()))
    }

    #[test]
    fn accepted_report_can_be_cancelled() {
        let state = loaded();
        let report = state.find("BR-1").unwrap();
        assert!(state.cancel_offered(report));

        let api = FakeApi::new(None);
        let state = state.reduce(ReportsAction::RequestCancel("BR-1".into()));
        assert_eq!(state.confirming.as_deref(), Some("BR-1"));

        let state = confirm_cancel(state, &api);
        assert_eq!(
            *api.calls.borrow(),
            vec![("BR-1".to_string(), "cancelled".to_string())]
        );
        let report = state.find("BR-1").unwrap();
        assert_eq!(report.status, ReportStatus::Cancelled);
        assert!(!state.cancel_offered(report));
        assert!(state.pending.is_empty());
        assert!(state.error.is_none());
        // other reports untouched
        assert_eq!(state.find("BR-3").unwrap().status, ReportStatus::Accepted);
    }

    #[test]
    fn failed_cancel_keeps_status_and_surfaces_error() {
        let api = FakeApi::new(Some("{\"error\": \"report already billed\"}"));
        let state = loaded().reduce(ReportsAction::RequestCancel("BR-1".into()));
        let state = confirm_cancel(state, &api);

        let report = state.find("BR-1").unwrap();
        assert_eq!(report.status, ReportStatus::Accepted);
        assert!(state.cancel_offered(report));
        assert_eq!(
            state.error.as_deref(),
            Some("{\"error\": \"report already billed\"}")
        );
        assert!(state.reduce(ReportsAction::DismissError).error.is_none());
    }

    #[test]
    fn terminal_statuses_never_prompt() {
        let api = FakeApi::new(None);
        let state = loaded().reduce(ReportsAction::RequestCancel("BR-2".into()));
        assert!(state.confirming.is_none());
        let state = confirm_cancel(state, &api);
        assert!(api.calls.borrow().is_empty());
        assert_eq!(state.find("BR-2").unwrap().status, ReportStatus::Cancelled);
    }

    #[test]
    fn aborting_sends_nothing() {
        let api = FakeApi::new(None);
        let state = loaded()
            .reduce(ReportsAction::RequestCancel("BR-1".into()))
            .reduce(ReportsAction::AbortCancel);
        let state = confirm_cancel(state, &api);
        assert!(api.calls.borrow().is_empty());
        assert_eq!(state.find("BR-1").unwrap().status, ReportStatus::Accepted);
    }

    #[test]
    fn in_flight_report_is_not_offered() {
        let state = loaded()
            .reduce(ReportsAction::RequestCancel("BR-1".into()))
            .reduce(ReportsAction::ConfirmCancel);
        assert!(state.pending.contains("BR-1"));
        assert!(!state.cancel_offered(state.find("BR-1").unwrap()));
        let state = state.reduce(ReportsAction::RequestCancel("BR-1".into()));
        assert!(state.confirming.is_none());
    }

    #[test]
    fn filters_and_pages() {
        let state = loaded();
        assert_eq!(state.page_count(), 2);
        assert_eq!(state.visible().len(), 2);

        let state = state.reduce(ReportsAction::SetPage(5));
        assert_eq!(state.page, 2);
        assert_eq!(state.visible()[0].bill_report_id, "BR-3");

        // any component's scheme matches
        let state = state.reduce(ReportsAction::ToggleFilter {
            dim: ReportDimension::Scheme,
            value: "A".into(),
        });
        assert_eq!(state.page, 1);
        let ids: Vec<&str> = state
            .filtered()
            .iter()
            .map(|r| r.bill_report_id.as_str())
            .collect();
        assert_eq!(ids, vec!["BR-1", "BR-2"]);

        let state = state.reduce(ReportsAction::SetFilter {
            dim: ReportDimension::Status,
            values: vec!["accepted".into()],
        });
        assert_eq!(state.filtered().len(), 1);
        assert_eq!(
            state.options(ReportDimension::Center),
            vec!["Rampur".to_string()]
        );
    }

    #[test]
    fn missing_status_is_not_offered_as_an_option() {
        let mut all = reports();
        all.extend(parse_bill_reports(r#"[{"id": 4, "bill_report_id": "BR-4"}]"#).unwrap());
        let state = ReportsState::new(10).reduce(ReportsAction::Loaded(all));
        assert_eq!(
            state.options(ReportDimension::Status),
            vec!["accepted".to_string(), "cancelled".to_string()]
        );
        assert_eq!(state.filtered().len(), 4);
    }

    #[test]
    fn date_range_on_created_at() {
        let state = loaded().reduce(ReportsAction::SetDateRange(DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 2, 1),
        )));
        let ids: Vec<&str> = state
            .filtered()
            .iter()
            .map(|r| r.bill_report_id.as_str())
            .collect();
        assert_eq!(ids, vec!["BR-2"]);
    }

    #[test]
    fn expansion_toggles() {
        let state = loaded().reduce(ReportsAction::ToggleExpanded("BR-1".into()));
        assert!(state.is_expanded("BR-1"));
        let state = state.reduce(ReportsAction::ToggleExpanded("BR-1".into()));
        assert!(!state.is_expanded("BR-1"));
    }

    #[test]
    fn receipt_urls() {
        let state = loaded();
        assert_eq!(
            receipt_url("http://localhost:8000/", state.find("BR-1").unwrap()).as_deref(),
            Some("http://localhost:8000/media/receipts/br-1.pdf")
        );
        assert!(receipt_url("http://localhost:8000", state.find("BR-3").unwrap()).is_none());
    }

    #[test]
    fn empty_list_has_one_page() {
        let state = ReportsState::default().reduce(ReportsAction::Loaded(Vec::new()));
        assert_eq!(state.page_count(), 1);
        assert!(state.visible().is_empty());
    }
}
