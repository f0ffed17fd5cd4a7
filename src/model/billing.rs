use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Fields;

/// One allocation record from `/billing-items/`.
///
/// Numeric fields are already coerced; a value the service sent as text that
/// does not parse is stored as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingLineItem {
    pub id: Option<i64>,
    pub scheme_name: Option<String>,
    pub investment_name: Option<String>,
    pub sub_investment_name: Option<String>,
    pub center_name: Option<String>,
    pub constituency_name: Option<String>,
    pub bill_date: Option<NaiveDateTime>,
    pub allocated_quantity: f64,
    pub farmer_share: f64,
    pub subsidy: f64,
    pub total_amount: f64,
    pub bill_report: Option<i64>,
}

impl BillingLineItem {
    pub(crate) fn from_map(map: &Map<String, Value>) -> Self {
        let f = Fields::new(map);
        Self {
            id: f.integer(&["id"]),
            scheme_name: f.text(&["scheme_name", "scheme"]),
            investment_name: f.text(&["investment_name", "investment"]),
            sub_investment_name: f.text(&["sub_investment_name", "sub_investment"]),
            center_name: f.text(&["center_name", "center"]),
            constituency_name: f.text(&["vidhan_sabha_name", "constituency", "vidhan_sabha"]),
            bill_date: f.timestamp(&["bill_date", "created_at", "date"]),
            allocated_quantity: f.amount(&["allocated_quantity", "quantity"]),
            farmer_share: f.amount(&["farmer_share"]),
            subsidy: f.amount(&["subsidy", "subsidy_amount"]),
            total_amount: f.amount(&["total_amount", "total"]),
            bill_report: f.integer(&["bill_report", "bill_report_id"]),
        }
    }
}

/// Parse the `/billing-items/` payload. The body must be an array of objects;
/// individual fields never fail.
pub fn parse_billing_items(body: &str) -> Result<Vec<BillingLineItem>, serde_json::Error> {
    let raw: Vec<Map<String, Value>> = serde_json::from_str(body)?;
    Ok(raw.iter().map(BillingLineItem::from_map).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_payload() {
        let body = r#"[
            {"id": 1, "scheme_name": "PMKSY", "investment_name": "Seeds",
             "sub_investment_name": "Wheat", "center_name": "Rampur",
             "vidhan_sabha_name": "North", "bill_date": "2024-03-05T10:00:00",
             "allocated_quantity": "12.5", "farmer_share": 100, "subsidy": "300.50",
             "total_amount": "400.50", "bill_report": 9},
            {"id": "2", "scheme": "RKVY", "subsidy": "bad", "total_amount": null}
        ]"#;
        let items = parse_billing_items(body).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.scheme_name.as_deref(), Some("PMKSY"));
        assert_eq!(first.constituency_name.as_deref(), Some("North"));
        assert_eq!(first.allocated_quantity, 12.5);
        assert_eq!(first.subsidy, 300.5);
        assert_eq!(first.bill_report, Some(9));

        let second = &items[1];
        assert_eq!(second.id, Some(2));
        assert_eq!(second.scheme_name.as_deref(), Some("RKVY"));
        assert_eq!(second.subsidy, 0.0);
        assert_eq!(second.total_amount, 0.0);
        assert_eq!(second.bill_date, None);
        assert_eq!(second.center_name, None);
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(parse_billing_items("{\"detail\": \"oops\"}").is_err());
        assert!(parse_billing_items("[1, 2]").is_err());
        assert!(parse_billing_items("<html>").is_err());
    }
}
