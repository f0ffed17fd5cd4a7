use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::coerce::Fields;

/// Lifecycle status of a submitted report.
///
/// Only `Accepted` can move anywhere (to `Cancelled`); any status string the
/// service invents is carried through untouched and treated as final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Accepted,
    Cancelled,
    Other(String),
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accepted" => ReportStatus::Accepted,
            "cancelled" | "canceled" => ReportStatus::Cancelled,
            _ => ReportStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Accepted => "accepted",
            ReportStatus::Cancelled => "cancelled",
            ReportStatus::Other(s) => s,
        }
    }

    pub fn is_cancellable(&self) -> bool {
        *self == ReportStatus::Accepted
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A line item embedded in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportComponent {
    pub component_name: Option<String>,
    pub investment_name: Option<String>,
    pub unit: Option<String>,
    pub allocated_quantity: f64,
    pub updated_quantity: f64,
    pub rate: f64,
    pub buy_amount: f64,
    pub sold_amount: f64,
    pub scheme_name: Option<String>,
}

impl ReportComponent {
    fn from_map(map: &Map<String, Value>) -> Self {
        let f = Fields::new(map);
        Self {
            component_name: f.text(&["component_name", "component", "item_name"]),
            investment_name: f.text(&["investment_name", "investment"]),
            unit: f.text(&["unit", "unit_name"]),
            allocated_quantity: f.amount(&["allocated_quantity", "quantity"]),
            updated_quantity: f.amount(&["updated_quantity"]),
            rate: f.amount(&["rate", "unit_price"]),
            buy_amount: f.amount(&["buy_amount"]),
            sold_amount: f.amount(&["sold_amount", "amount"]),
            scheme_name: f.text(&["scheme_name", "scheme"]),
        }
    }
}

/// A submitted report from `/report-billing-items/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillReport {
    pub id: i64,
    pub bill_report_id: String,
    pub center_name: Option<String>,
    pub source_of_receipt: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub status: ReportStatus,
    pub receipt_file: Option<String>,
    pub components: Vec<ReportComponent>,
}

/// The business id of a raw report record: `bill_report_id` or `bill_id`,
/// else the numeric `id`.
pub(crate) fn business_id(map: &Map<String, Value>) -> String {
    let f = Fields::new(map);
    f.text(&["bill_report_id", "bill_id"])
        .unwrap_or_else(|| f.integer(&["id"]).unwrap_or_default().to_string())
}

impl BillReport {
    fn from_map(map: &Map<String, Value>) -> Self {
        let f = Fields::new(map);
        let id = f.integer(&["id"]).unwrap_or_default();
        let components = f
            .array(&["components", "billing_items", "items"])
            .iter()
            .filter_map(Value::as_object)
            .map(ReportComponent::from_map)
            .collect();
        Self {
            id,
            bill_report_id: business_id(map),
            center_name: f.text(&["center_name", "center"]),
            source_of_receipt: f.text(&["source_of_receipt", "source"]),
            created_at: f.timestamp(&["created_at", "date"]),
            status: f
                .text(&["status"])
                .map(|s| ReportStatus::parse(&s))
                .unwrap_or_else(|| ReportStatus::Other(String::new())),
            receipt_file: f.text(&["recipt_file", "receipt_file", "receipt"]),
            components,
        }
    }

    /// Distinct scheme names across the report's components, in first-seen order.
    pub fn scheme_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.components.iter().filter_map(|c| c.scheme_name.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn total_sold(&self) -> f64 {
        self.components.iter().map(|c| c.sold_amount).sum()
    }
}

pub fn parse_bill_reports(body: &str) -> Result<Vec<BillReport>, serde_json::Error> {
    let raw: Vec<Map<String, Value>> = serde_json::from_str(body)?;
    Ok(raw.iter().map(BillReport::from_map).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing() {
        assert_eq!(ReportStatus::parse("accepted"), ReportStatus::Accepted);
        assert_eq!(ReportStatus::parse(" Cancelled "), ReportStatus::Cancelled);
        assert_eq!(
            ReportStatus::parse("pending-review"),
            ReportStatus::Other("pending-review".into())
        );
        assert!(ReportStatus::Accepted.is_cancellable());
        assert!(!ReportStatus::Cancelled.is_cancellable());
        assert!(!ReportStatus::Other("draft".into()).is_cancellable());
    }

    #[test]
    fn parses_report_with_components() {
        let body = r#"[{
            "id": 4, "bill_report_id": "BR-2024-004", "center_name": "Rampur",
            "source_of_receipt": "Cooperative", "created_at": "2024-02-10T09:30:00Z",
            "status": "accepted", "recipt_file": "receipts/br4.pdf",
            "components": [
                {"component_name": "DAP", "investment_name": "Fertiliser", "unit": "bag",
                 "allocated_quantity": "10", "updated_quantity": 9, "rate": "1350",
                 "buy_amount": "13500", "sold_amount": 12150, "scheme_name": "PMKSY"},
                {"component_name": "Urea", "scheme_name": "RKVY", "sold_amount": "x"},
                {"component_name": "Zinc", "scheme_name": "PMKSY"}
            ]
        }]"#;
        let reports = parse_bill_reports(body).unwrap();
        let report = &reports[0];
        assert_eq!(report.bill_report_id, "BR-2024-004");
        assert_eq!(report.status, ReportStatus::Accepted);
        assert_eq!(report.receipt_file.as_deref(), Some("receipts/br4.pdf"));
        assert_eq!(report.components.len(), 3);
        assert_eq!(report.components[0].rate, 1350.0);
        assert_eq!(report.components[1].sold_amount, 0.0);
        assert_eq!(report.scheme_names(), vec!["PMKSY", "RKVY"]);
        assert_eq!(report.total_sold(), 12150.0);
    }

    #[test]
    fn missing_business_id_falls_back_to_internal_id() {
        let reports = parse_bill_reports(r#"[{"id": 12, "status": "draft"}]"#).unwrap();
        assert_eq!(reports[0].bill_report_id, "12");
        assert_eq!(reports[0].status.as_str(), "draft");
    }
}
