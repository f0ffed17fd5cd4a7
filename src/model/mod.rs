mod billing;
mod coerce;
mod report;

pub use billing::{parse_billing_items, BillingLineItem};
pub use coerce::{coerce_amount, parse_timestamp};
pub(crate) use report::business_id;
pub use report::{parse_bill_reports, BillReport, ReportComponent, ReportStatus};
