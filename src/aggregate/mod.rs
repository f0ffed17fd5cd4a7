mod cross;
mod summary;

pub use cross::{CrossRow, CrossTable, CrossView};
pub use summary::{Summary, SummaryRow};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::model::BillingLineItem;

/// Chart labels longer than this many characters are shortened.
pub const DEFAULT_LABEL_LIMIT: usize = 20;

/// Which monetary field every table, chart and export reads.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    FarmerShare,
    Subsidy,
    #[default]
    Total,
}

impl AmountField {
    pub fn label(&self) -> &'static str {
        match self {
            AmountField::FarmerShare => "Farmer Share",
            AmountField::Subsidy => "Subsidy",
            AmountField::Total => "Total Amount",
        }
    }
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AmountField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "farmer_share" | "farmershare" => Ok(AmountField::FarmerShare),
            "subsidy" => Ok(AmountField::Subsidy),
            "total" | "total_amount" => Ok(AmountField::Total),
            other => Err(format!(
                "unknown amount field '{other}' (expected farmer_share, subsidy or total)"
            )),
        }
    }
}

/// Running sums of the four numeric fields of a group of line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub quantity: f64,
    pub farmer_share: f64,
    pub subsidy: f64,
    pub total: f64,
}

impl Totals {
    pub fn of(item: &BillingLineItem) -> Self {
        Self {
            quantity: item.allocated_quantity,
            farmer_share: item.farmer_share,
            subsidy: item.subsidy,
            total: item.total_amount,
        }
    }

    pub fn add(&mut self, other: &Totals) {
        self.quantity += other.quantity;
        self.farmer_share += other.farmer_share;
        self.subsidy += other.subsidy;
        self.total += other.total;
    }

    pub fn amount(&self, field: AmountField) -> f64 {
        match field {
            AmountField::FarmerShare => self.farmer_share,
            AmountField::Subsidy => self.subsidy,
            AmountField::Total => self.total,
        }
    }
}

impl<'a> std::iter::Sum<&'a Totals> for Totals {
    fn sum<I: Iterator<Item = &'a Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), |mut acc, t| {
            acc.add(t);
            acc
        })
    }
}

/// Single pass over `records`, accumulating into the bucket named by `key`.
/// Records without a key land in `fallback`.
pub fn group_by<'a, I, K>(records: I, key: K, fallback: &str) -> BTreeMap<String, Totals>
where
    I: IntoIterator<Item = &'a BillingLineItem>,
    K: Fn(&'a BillingLineItem) -> Option<&'a str>,
{
    let mut buckets: BTreeMap<String, Totals> = BTreeMap::new();
    for item in records {
        let name = key(item).unwrap_or(fallback);
        buckets
            .entry(name.to_string())
            .or_default()
            .add(&Totals::of(item));
    }
    buckets
}

/// Shorten `label` to `limit` characters plus an ellipsis.
pub fn short_label(label: &str, limit: usize) -> String {
    if label.chars().count() <= limit {
        return label.to_string();
    }
    let head: String = label.chars().take(limit).collect();
    format!("{}...", head.trim_end())
}
