use serde::Serialize;
use std::collections::BTreeMap;

use super::{group_by, short_label, AmountField, Totals};
use crate::filter::Dimension;
use crate::model::BillingLineItem;

/// One-dimensional aggregation: totals per value of a single dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dimension: Dimension,
    pub buckets: BTreeMap<String, Totals>,
}

/// A display row of a [`Summary`], with the chart label already shortened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    pub label: String,
    pub totals: Totals,
}

impl Summary {
    pub fn build<'a, I>(records: I, dimension: Dimension) -> Self
    where
        I: IntoIterator<Item = &'a BillingLineItem>,
    {
        let buckets = group_by(records, |r| Some(dimension.key(r)), dimension.fallback());
        Self { dimension, buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn grand_total(&self) -> Totals {
        self.buckets.values().sum()
    }

    /// Rows ordered by `field`, largest first. Equal amounts fall back to key order.
    pub fn rows(&self, field: AmountField, label_limit: usize) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self
            .buckets
            .iter()
            .map(|(key, totals)| SummaryRow {
                key: key.clone(),
                label: short_label(key, label_limit),
                totals: *totals,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.totals
                .amount(field)
                .total_cmp(&a.totals.amount(field))
                .then_with(|| a.key.cmp(&b.key))
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DEFAULT_LABEL_LIMIT;

    fn item(scheme: &str, subsidy: f64) -> BillingLineItem {
        BillingLineItem {
            id: None,
            scheme_name: Some(scheme.into()),
            investment_name: None,
            sub_investment_name: None,
            center_name: None,
            constituency_name: None,
            bill_date: None,
            allocated_quantity: 2.0,
            farmer_share: 1.0,
            subsidy,
            total_amount: subsidy + 1.0,
            bill_report: None,
        }
    }

    #[test]
    fn scheme_subsidy_scenario() {
        let records = vec![item("A", 100.0), item("A", 50.0), item("B", 30.0)];
        let summary = Summary::build(&records, Dimension::Scheme);

        let rows = summary.rows(AmountField::Subsidy, DEFAULT_LABEL_LIMIT);
        let amounts: Vec<(&str, f64)> = rows
            .iter()
            .map(|r| (r.key.as_str(), r.totals.subsidy))
            .collect();
        assert_eq!(amounts, vec![("A", 150.0), ("B", 30.0)]);
        assert_eq!(summary.grand_total().amount(AmountField::Subsidy), 180.0);
    }

    #[test]
    fn bucket_sum_matches_record_sum() {
        let records = vec![
            item("A", 12.25),
            item("B", 7.5),
            item("C", 0.0),
            item("B", 3.0),
            item("A", 1.0),
        ];
        let summary = Summary::build(&records, Dimension::Scheme);
        for field in [AmountField::FarmerShare, AmountField::Subsidy, AmountField::Total] {
            let expected: f64 = records.iter().map(|r| Totals::of(r).amount(field)).sum();
            let bucketed: f64 = summary.buckets.values().map(|t| t.amount(field)).sum();
            assert!((expected - bucketed).abs() < 1e-9);
        }
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn ties_sort_by_key_and_labels_shorten() {
        let records = vec![
            item("Zeta", 10.0),
            item("Alpha", 10.0),
            item("A very long scheme name indeed", 99.0),
        ];
        let rows = Summary::build(&records, Dimension::Scheme).rows(AmountField::Subsidy, 10);
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["A very long scheme name indeed", "Alpha", "Zeta"]);
        assert_eq!(rows[0].label, "A very lon...");
    }
}
