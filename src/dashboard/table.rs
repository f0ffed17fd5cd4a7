use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chart::ChartKind;
use crate::error::{DashboardError, Result};
use crate::filter::Dimension;

/// The aggregation tables of the dashboard.
///
/// Variant order is display priority: open tables are always shown and
/// exported in this order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TableId {
    Scheme,
    Investment,
    SubInvestment,
    Center,
    Constituency,
    InvestmentScheme,
    CenterScheme,
    ConstituencyScheme,
}

/// How a table groups its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    Summary(Dimension),
    Cross { outer: Dimension, inner: Dimension },
}

impl TableId {
    pub const ALL: [TableId; 8] = [
        TableId::Scheme,
        TableId::Investment,
        TableId::SubInvestment,
        TableId::Center,
        TableId::Constituency,
        TableId::InvestmentScheme,
        TableId::CenterScheme,
        TableId::ConstituencyScheme,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            TableId::Scheme => "scheme",
            TableId::Investment => "investment",
            TableId::SubInvestment => "sub-investment",
            TableId::Center => "center",
            TableId::Constituency => "constituency",
            TableId::InvestmentScheme => "investment-scheme",
            TableId::CenterScheme => "center-scheme",
            TableId::ConstituencyScheme => "constituency-scheme",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TableId::Scheme => "Scheme Wise Summary",
            TableId::Investment => "Investment Wise Summary",
            TableId::SubInvestment => "Sub-investment Wise Summary",
            TableId::Center => "Center Wise Summary",
            TableId::Constituency => "Vidhan Sabha Wise Summary",
            TableId::InvestmentScheme => "Investment and Scheme Wise Summary",
            TableId::CenterScheme => "Center and Scheme Wise Summary",
            TableId::ConstituencyScheme => "Vidhan Sabha and Scheme Wise Summary",
        }
    }

    pub fn shape(&self) -> TableShape {
        match self {
            TableId::Scheme => TableShape::Summary(Dimension::Scheme),
            TableId::Investment => TableShape::Summary(Dimension::Investment),
            TableId::SubInvestment => TableShape::Summary(Dimension::SubInvestment),
            TableId::Center => TableShape::Summary(Dimension::Center),
            TableId::Constituency => TableShape::Summary(Dimension::Constituency),
            TableId::InvestmentScheme => TableShape::Cross {
                outer: Dimension::Investment,
                inner: Dimension::Scheme,
            },
            TableId::CenterScheme => TableShape::Cross {
                outer: Dimension::Center,
                inner: Dimension::Scheme,
            },
            TableId::ConstituencyScheme => TableShape::Cross {
                outer: Dimension::Constituency,
                inner: Dimension::Scheme,
            },
        }
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self {
            TableId::Scheme => ChartKind::Doughnut,
            TableId::Constituency => ChartKind::Pie,
            TableId::Investment | TableId::SubInvestment | TableId::Center => ChartKind::Bar,
            TableId::InvestmentScheme | TableId::CenterScheme | TableId::ConstituencyScheme => {
                ChartKind::StackedBar
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let wanted = raw.trim().to_ascii_lowercase().replace('_', "-");
        TableId::ALL
            .into_iter()
            .find(|t| t.slug() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = TableId::ALL.iter().map(|t| t.slug()).collect();
                DashboardError::UnknownTable(raw.to_string(), known.join(", "))
            })
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
