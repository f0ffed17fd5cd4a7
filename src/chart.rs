//! Chart-ready datasets. Drawing is left to whatever consumes the JSON.

use serde::Serialize;

use crate::aggregate::{short_label, AmountField, CrossView, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Doughnut,
    StackedBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub amount_field: AmountField,
    /// Axis labels, shortened.
    pub labels: Vec<String>,
    /// Untruncated labels for tooltips.
    pub full_labels: Vec<String>,
    pub series: Vec<Series>,
}

pub fn summary_chart(
    title: &str,
    kind: ChartKind,
    summary: &Summary,
    field: AmountField,
    label_limit: usize,
) -> ChartData {
    let rows = summary.rows(field, label_limit);
    ChartData {
        kind,
        title: title.to_string(),
        amount_field: field,
        labels: rows.iter().map(|r| r.label.clone()).collect(),
        full_labels: rows.iter().map(|r| r.key.clone()).collect(),
        series: vec![Series {
            name: field.label().to_string(),
            values: rows.iter().map(|r| r.totals.amount(field)).collect(),
        }],
    }
}

/// One series per visible column, one point per outer key.
pub fn cross_chart(
    title: &str,
    view: &CrossView<'_>,
    field: AmountField,
    label_limit: usize,
) -> ChartData {
    let rows = view.rows();
    let series = view
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| Series {
            name: column.to_string(),
            values: rows.iter().map(|row| row.cells[idx].amount(field)).collect(),
        })
        .collect();
    ChartData {
        kind: ChartKind::StackedBar,
        title: title.to_string(),
        amount_field: field,
        labels: rows.iter().map(|r| short_label(&r.key, label_limit)).collect(),
        full_labels: rows.iter().map(|r| r.key.clone()).collect(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CrossTable;
    use crate::filter::Dimension;
    use crate::model::BillingLineItem;

    fn item(center: &str, scheme: &str, total: f64) -> BillingLineItem {
        BillingLineItem {
            id: None,
            scheme_name: Some(scheme.into()),
            investment_name: None,
            sub_investment_name: None,
            center_name: Some(center.into()),
            constituency_name: None,
            bill_date: None,
            allocated_quantity: 1.0,
            farmer_share: 0.0,
            subsidy: 0.0,
            total_amount: total,
            bill_report: None,
        }
    }

    #[test]
    fn summary_chart_keeps_full_labels() {
        let records = vec![
            item("Central Warehouse Number Seven", "A", 10.0),
            item("Depot", "A", 40.0),
        ];
        let summary = Summary::build(&records, Dimension::Center);
        let chart = summary_chart("Centers", ChartKind::Bar, &summary, AmountField::Total, 12);
        assert_eq!(chart.labels, vec!["Depot", "Central Ware..."]);
        assert_eq!(chart.full_labels[1], "Central Warehouse Number Seven");
        assert_eq!(chart.series[0].values, vec![40.0, 10.0]);
    }

    #[test]
    fn cross_chart_has_series_per_column() {
        let records = vec![item("X", "A", 1.0), item("X", "B", 2.0), item("Y", "B", 3.0)];
        let table = CrossTable::build(&records, Dimension::Center, Dimension::Scheme);
        let chart = cross_chart("Center x Scheme", &table.view(None), AmountField::Total, 20);
        assert_eq!(chart.kind, ChartKind::StackedBar);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "A");
        assert_eq!(chart.series[0].values, vec![1.0, 0.0]);
        assert_eq!(chart.series[1].values, vec![2.0, 3.0]);
    }
}
