use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::Totals;
use crate::filter::Dimension;
use crate::model::BillingLineItem;

/// Two-dimensional aggregation, e.g. center × scheme.
///
/// Every observed outer key has a cell for every observed inner key; cells with
/// no records read as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTable {
    pub outer: Dimension,
    pub inner: Dimension,
    cells: BTreeMap<String, BTreeMap<String, Totals>>,
    inner_keys: BTreeSet<String>,
}

/// A cross table restricted to a set of inner-key columns.
#[derive(Debug, Clone)]
pub struct CrossView<'a> {
    table: &'a CrossTable,
    columns: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRow {
    pub key: String,
    /// One entry per visible column, in column order.
    pub cells: Vec<Totals>,
    /// Sum across the visible columns.
    pub total: Totals,
}

impl CrossTable {
    pub fn build<'a, I>(records: I, outer: Dimension, inner: Dimension) -> Self
    where
        I: IntoIterator<Item = &'a BillingLineItem>,
    {
        let mut cells: BTreeMap<String, BTreeMap<String, Totals>> = BTreeMap::new();
        let mut inner_keys = BTreeSet::new();
        for item in records {
            let inner_key = inner.key(item);
            inner_keys.insert(inner_key.to_string());
            cells
                .entry(outer.key(item).to_string())
                .or_default()
                .entry(inner_key.to_string())
                .or_default()
                .add(&Totals::of(item));
        }
        Self {
            outer,
            inner,
            cells,
            inner_keys,
        }
    }

    pub fn outer_keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn inner_keys(&self) -> impl Iterator<Item = &str> {
        self.inner_keys.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, outer: &str, inner: &str) -> Totals {
        self.cells
            .get(outer)
            .and_then(|row| row.get(inner))
            .copied()
            .unwrap_or_default()
    }

    /// Restrict the visible inner keys. `None` or an empty set shows them all;
    /// selected keys that were never observed are ignored, so a selection
    /// with no observed key shows them all too.
    pub fn view(&self, columns: Option<&BTreeSet<String>>) -> CrossView<'_> {
        let selected: Vec<&str> = match columns {
            Some(selected) => self
                .inner_keys()
                .filter(|key| selected.contains(*key))
                .collect(),
            None => Vec::new(),
        };
        let columns = if selected.is_empty() {
            self.inner_keys().collect()
        } else {
            selected
        };
        CrossView {
            table: self,
            columns,
        }
    }
}

impl<'a> CrossView<'a> {
    pub fn columns(&self) -> &[&'a str] {
        &self.columns
    }

    pub fn rows(&self) -> Vec<CrossRow> {
        self.table
            .outer_keys()
            .map(|outer| {
                let cells: Vec<Totals> = self
                    .columns
                    .iter()
                    .map(|inner| self.table.cell(outer, inner))
                    .collect();
                CrossRow {
                    key: outer.to_string(),
                    total: cells.iter().sum(),
                    cells,
                }
            })
            .collect()
    }

    /// Per-column sums over all outer keys.
    pub fn column_totals(&self) -> Vec<Totals> {
        self.columns
            .iter()
            .map(|inner| {
                self.table
                    .outer_keys()
                    .map(|outer| self.table.cell(outer, inner))
                    .fold(Totals::default(), |mut acc, t| {
                        acc.add(&t);
                        acc
                    })
            })
            .collect()
    }

    pub fn grand_total(&self) -> Totals {
        self.rows().iter().map(|row| &row.total).sum()
    }
}
