use log::{debug, info};
use std::time::Duration;
use ureq::Agent;

use super::{join_url, BillingApi, ITEMS_PATH, REPORTS_PATH, UPDATE_PATH};
use crate::error::{DashboardError, Result};
use crate::model::{parse_bill_reports, parse_billing_items, BillReport, BillingLineItem, ReportStatus};

/// Blocking client for the billing REST service.
pub struct HttpApi {
    agent: Agent,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        // Non-2xx responses come back as responses so they can be told apart
        // from transport failures.
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    fn get(&self, path: &str) -> Result<(String, String)> {
        let url = join_url(&self.base_url, path);
        debug!("GET {url}");

        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| DashboardError::Network {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Server {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| DashboardError::Network {
                url: url.clone(),
                source: Box::new(e),
            })?;
        debug!("GET {url} returned {} bytes", body.len());
        Ok((url, body))
    }
}

impl BillingApi for HttpApi {
    fn fetch_reports(&self) -> Result<Vec<BillReport>> {
        let (url, body) = self.get(REPORTS_PATH)?;
        parse_bill_reports(&body).map_err(|source| DashboardError::Data {
            origin: url,
            source,
        })
    }

    fn fetch_billing_items(&self) -> Result<Vec<BillingLineItem>> {
        let (url, body) = self.get(ITEMS_PATH)?;
        parse_billing_items(&body).map_err(|source| DashboardError::Data {
            origin: url,
            source,
        })
    }

    fn update_report_status(&self, bill_report_id: &str, status: &ReportStatus) -> Result<()> {
        let url = join_url(&self.base_url, UPDATE_PATH);
        let payload = serde_json::json!({
            "bill_report_id": bill_report_id,
            "status": status.as_str(),
        });
        debug!("PUT {url} {payload}");

        let failed = |detail: String| DashboardError::StatusUpdate {
            bill_report_id: bill_report_id.to_string(),
            detail,
        };

        let mut response = self
            .agent
            .put(&url)
            .header("Content-Type", "application/json")
            .send(payload.to_string())
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            let body = response.body_mut().read_to_string().unwrap_or_default();
            let detail = if body.trim().is_empty() {
                format!("HTTP {code}")
            } else {
                body
            };
            return Err(failed(detail));
        }

        info!("report {bill_report_id} set to {status}");
        Ok(())
    }
}
