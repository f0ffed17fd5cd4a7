use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::model::BillingLineItem;

/// A record that can be narrowed by multi-select dimensions and a date range.
pub trait Faceted {
    type Dim: Copy + Ord;

    /// Values the record holds for `dim`. A record matches a selection on `dim`
    /// when any of these is selected.
    fn facet_values(&self, dim: Self::Dim) -> Vec<&str>;

    fn timestamp(&self) -> Option<NaiveDateTime>;
}

/// Grouping and filtering dimensions of a billing line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Scheme,
    Investment,
    SubInvestment,
    Center,
    Constituency,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Scheme,
        Dimension::Investment,
        Dimension::SubInvestment,
        Dimension::Center,
        Dimension::Constituency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Scheme => "Scheme",
            Dimension::Investment => "Investment",
            Dimension::SubInvestment => "Sub-investment",
            Dimension::Center => "Center",
            Dimension::Constituency => "Vidhan Sabha",
        }
    }

    /// Key used for records that carry no value for this dimension.
    pub fn fallback(&self) -> &'static str {
        match self {
            Dimension::Scheme => "Unknown Scheme",
            Dimension::Investment => "Unknown Investment",
            Dimension::SubInvestment => "Unknown Sub-investment",
            Dimension::Center => "Unknown Center",
            Dimension::Constituency => "Unknown Vidhan Sabha",
        }
    }

    pub fn key<'a>(&self, item: &'a BillingLineItem) -> &'a str {
        let value = match self {
            Dimension::Scheme => item.scheme_name.as_deref(),
            Dimension::Investment => item.investment_name.as_deref(),
            Dimension::SubInvestment => item.sub_investment_name.as_deref(),
            Dimension::Center => item.center_name.as_deref(),
            Dimension::Constituency => item.constituency_name.as_deref(),
        };
        value.unwrap_or(self.fallback())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Faceted for BillingLineItem {
    type Dim = Dimension;

    fn facet_values(&self, dim: Dimension) -> Vec<&str> {
        vec![dim.key(self)]
    }

    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.bill_date
    }
}

/// Inclusive date range. A missing endpoint leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// The end date counts through the whole day. Undated records only pass
    /// an unbounded range.
    pub fn contains(&self, ts: Option<NaiveDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(ts) = ts else {
            return false;
        };
        let after_start = self
            .start
            .map_or(true, |s| ts >= s.and_time(NaiveTime::MIN));
        let before_end = self
            .end
            .and_then(|e| e.succ_opt())
            .map_or(true, |next| ts < next.and_time(NaiveTime::MIN));
        after_start && before_end
    }
}

/// Selected values per dimension plus a date range.
///
/// A dimension with nothing selected does not restrict anything. Within a
/// dimension selections are OR-ed, across dimensions AND-ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection<D: Ord> {
    selected: BTreeMap<D, BTreeSet<String>>,
    pub date_range: DateRange,
}

impl<D: Ord> Default for FilterSelection<D> {
    fn default() -> Self {
        Self {
            selected: BTreeMap::new(),
            date_range: DateRange::default(),
        }
    }
}

impl<D: Copy + Ord> FilterSelection<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn select(&mut self, dim: D, value: impl Into<String>) {
        self.selected.entry(dim).or_default().insert(value.into());
    }

    pub fn deselect(&mut self, dim: D, value: &str) {
        if let Some(values) = self.selected.get_mut(&dim) {
            values.remove(value);
            if values.is_empty() {
                self.selected.remove(&dim);
            }
        }
    }

    pub fn toggle(&mut self, dim: D, value: &str) {
        if self.is_selected(dim, value) {
            self.deselect(dim, value);
        } else {
            self.select(dim, value);
        }
    }

    /// Replace the selection for `dim`. An empty iterator clears it.
    pub fn set<I, S>(&mut self, dim: D, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selected.remove(&dim);
        } else {
            self.selected.insert(dim, values);
        }
    }

    pub fn clear(&mut self, dim: D) {
        self.selected.remove(&dim);
    }

    pub fn is_selected(&self, dim: D, value: &str) -> bool {
        self.selected
            .get(&dim)
            .is_some_and(|values| values.contains(value))
    }

    /// The selected values for `dim`, `None` when unrestricted.
    pub fn selected(&self, dim: D) -> Option<&BTreeSet<String>> {
        self.selected.get(&dim).filter(|values| !values.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty) && self.date_range.is_unbounded()
    }

    fn matches_except<R>(&self, record: &R, skip: Option<D>) -> bool
    where
        R: Faceted<Dim = D>,
    {
        if !self.date_range.contains(record.timestamp()) {
            return false;
        }
        self.selected
            .iter()
            .filter(|(dim, values)| Some(**dim) != skip && !values.is_empty())
            .all(|(dim, values)| {
                record
                    .facet_values(*dim)
                    .iter()
                    .any(|value| values.contains(*value))
            })
    }

    pub fn matches<R: Faceted<Dim = D>>(&self, record: &R) -> bool {
        self.matches_except(record, None)
    }

    pub fn apply<'a, R: Faceted<Dim = D>>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }

    /// Values available for `dim`: those seen on date-matching records that pass
    /// every other dimension's selection. Selecting in one dimension narrows the
    /// others without touching what they already have selected.
    pub fn options<R: Faceted<Dim = D>>(&self, records: &[R], dim: D) -> Vec<String> {
        let values: BTreeSet<&str> = records
            .iter()
            .filter(|r| self.matches_except(*r, Some(dim)))
            .flat_map(|r| r.facet_values(dim))
            .filter(|v| !v.is_empty())
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    /// Selected values of `dim` that the narrowed option list no longer offers.
    pub fn stale_selections<R: Faceted<Dim = D>>(&self, records: &[R], dim: D) -> Vec<String> {
        let Some(selected) = self.selected(dim) else {
            return Vec::new();
        };
        let options = self.options(records, dim);
        selected
            .iter()
            .filter(|value| !options.contains(value))
            .cloned()
            .collect()
    }
}
