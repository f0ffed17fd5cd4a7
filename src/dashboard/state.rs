use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use super::table::{TableId, TableShape};
use crate::aggregate::{AmountField, CrossTable, Summary, DEFAULT_LABEL_LIMIT};
use crate::error::LoadFailure;
use crate::filter::{DateRange, Dimension, FilterSelection};
use crate::model::BillingLineItem;
use crate::state::LoadState;

/// Everything the aggregation dashboard shows is derived from this value.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub load: LoadState<Vec<BillingLineItem>>,
    pub filters: FilterSelection<Dimension>,
    pub amount_field: AmountField,
    pub open_tables: BTreeSet<TableId>,
    /// Inner-key column selection of cross tables, keyed by table.
    pub columns: BTreeMap<TableId, BTreeSet<String>>,
    pub label_limit: usize,
    /// Dismissible message from a failed export.
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    Loaded(Vec<BillingLineItem>),
    LoadFailed(LoadFailure),
    SetDateRange(DateRange),
    ToggleOption { dim: Dimension, value: String },
    SetOptions { dim: Dimension, values: Vec<String> },
    ClearFilters,
    SetAmountField(AmountField),
    ToggleTable(TableId),
    OpenTable(TableId),
    CloseTable(TableId),
    ToggleColumn { table: TableId, value: String },
    SetColumns { table: TableId, values: Vec<String> },
    ExportFailed(String),
    DismissNotice,
}

/// An aggregation computed for one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableData {
    Summary(Summary),
    Cross(CrossTable),
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            load: LoadState::Loading,
            filters: FilterSelection::new(),
            amount_field: AmountField::default(),
            open_tables: BTreeSet::new(),
            columns: BTreeMap::new(),
            label_limit: DEFAULT_LABEL_LIMIT,
            notice: None,
        }
    }
}

impl DashboardState {
    pub fn new(amount_field: AmountField, label_limit: usize) -> Self {
        Self {
            amount_field,
            label_limit,
            ..Self::default()
        }
    }

    pub fn reduce(mut self, action: DashboardAction) -> Self {
        match action {
            DashboardAction::Loaded(records) => {
                debug!("dashboard loaded {} billing items", records.len());
                self.load = LoadState::Loaded(records);
            }
            DashboardAction::LoadFailed(failure) => self.load = LoadState::Failed(failure),
            DashboardAction::SetDateRange(range) => self.filters.date_range = range,
            DashboardAction::ToggleOption { dim, value } => self.filters.toggle(dim, &value),
            DashboardAction::SetOptions { dim, values } => self.filters.set(dim, values),
            DashboardAction::ClearFilters => self.filters = FilterSelection::new(),
            DashboardAction::SetAmountField(field) => self.amount_field = field,
            DashboardAction::ToggleTable(table) => {
                if !self.open_tables.remove(&table) {
                    self.open_tables.insert(table);
                }
            }
            DashboardAction::OpenTable(table) => {
                self.open_tables.insert(table);
            }
            DashboardAction::CloseTable(table) => {
                self.open_tables.remove(&table);
            }
            DashboardAction::ToggleColumn { table, value } => {
                let selected = self.columns.entry(table).or_default();
                if !selected.remove(&value) {
                    selected.insert(value);
                }
                if selected.is_empty() {
                    self.columns.remove(&table);
                }
            }
            DashboardAction::SetColumns { table, values } => {
                let values: BTreeSet<String> = values.into_iter().collect();
                if values.is_empty() {
                    self.columns.remove(&table);
                } else {
                    self.columns.insert(table, values);
                }
            }
            DashboardAction::ExportFailed(message) => self.notice = Some(message),
            DashboardAction::DismissNotice => self.notice = None,
        }
        self
    }

    pub fn records(&self) -> &[BillingLineItem] {
        self.load.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records inside the date range, before any multi-select filter.
    pub fn date_filtered(&self) -> Vec<&BillingLineItem> {
        self.records()
            .iter()
            .filter(|r| self.filters.date_range.contains(r.bill_date))
            .collect()
    }

    pub fn filtered(&self) -> Vec<&BillingLineItem> {
        self.filters.apply(self.records())
    }

    pub fn options(&self, dim: Dimension) -> Vec<String> {
        self.filters.options(self.records(), dim)
    }

    pub fn column_selection(&self, table: TableId) -> Option<&BTreeSet<String>> {
        self.columns.get(&table)
    }

    pub fn is_open(&self, table: TableId) -> bool {
        self.open_tables.contains(&table)
    }

    /// Open tables in display priority.
    pub fn open_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        self.open_tables.iter().copied()
    }

    pub fn table(&self, table: TableId) -> TableData {
        let filtered = self.filtered();
        match table.shape() {
            TableShape::Summary(dim) => {
                TableData::Summary(Summary::build(filtered.iter().copied(), dim))
            }
            TableShape::Cross { outer, inner } => {
                TableData::Cross(CrossTable::build(filtered.iter().copied(), outer, inner))
            }
        }
    }
}
