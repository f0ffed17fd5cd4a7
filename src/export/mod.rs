mod delimited;
mod html;
mod xlsx;

pub use self::delimited::write_csv_dir;
pub use self::html::render_html;
pub use self::xlsx::write_xlsx;

use log::info;
use serde::Serialize;
use std::path::Path;

use crate::aggregate::{AmountField, CrossView, Summary};
use crate::dashboard::{DashboardState, TableData, TableId};
use crate::error::{DashboardError, Result};
use crate::filter::Dimension;
use crate::fmt;
use crate::model::BillReport;
use crate::pdf::generate_pdf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Number(f64),
    Quantity(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Human-readable rendering used by HTML, PDF and terminal tables.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => fmt::amount(*n),
            Cell::Quantity(q) => fmt::quantity(*q),
        }
    }
}

/// One rectangular table: header, body rows and a trailing totals row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub totals: Vec<Cell>,
}

impl Sheet {
    /// Body rows followed by the totals row.
    pub fn data_rows(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.rows.iter().chain(std::iter::once(&self.totals))
    }

    /// File-name friendly form of the sheet name.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for ch in self.name.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_matches('-').to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// A print-oriented document built from the same sheets as the workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub generated_date: String,
    /// Label/value lines describing the active filters.
    pub details: Vec<(String, String)>,
    pub sheets: Vec<Sheet>,
}

impl Document {
    pub fn new(title: impl Into<String>, workbook: Workbook) -> Self {
        Self {
            title: title.into(),
            generated_date: chrono::Local::now().format("%B %d, %Y").to_string(),
            details: Vec::new(),
            sheets: workbook.sheets,
        }
    }

    pub fn with_detail(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((label.into(), value.into()));
        self
    }

    pub fn workbook(&self) -> Workbook {
        Workbook {
            sheets: self.sheets.clone(),
        }
    }
}

/// Output format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Html,
    Pdf,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "html" | "htm" => Ok(ExportFormat::Html),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(DashboardError::UnsupportedFormat(ext)),
        }
    }
}

/// Write `document` to `path` in the format its extension names.
///
/// CSV output is a directory (the path without its extension) holding one file
/// per sheet; the directory is returned in that case.
pub fn write_document(document: &Document, path: &Path) -> Result<std::path::PathBuf> {
    if document.sheets.is_empty() {
        return Err(DashboardError::NothingToExport);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let written = match ExportFormat::from_path(path)? {
        ExportFormat::Xlsx => {
            write_xlsx(&document.workbook(), path)?;
            path.to_path_buf()
        }
        ExportFormat::Csv => {
            let dir = path.with_extension("");
            write_csv_dir(&document.workbook(), &dir)?;
            dir
        }
        ExportFormat::Html => {
            std::fs::write(path, render_html(document))?;
            path.to_path_buf()
        }
        ExportFormat::Pdf => {
            generate_pdf(document, path)?;
            path.to_path_buf()
        }
    };
    info!(
        "exported {} sheet(s) to {}",
        document.sheets.len(),
        written.display()
    );
    Ok(written)
}

/// Dimension label, quantity and the selected amount, one row per key.
pub fn summary_sheet(name: &str, summary: &Summary, field: AmountField) -> Sheet {
    let rows = summary
        .rows(field, usize::MAX)
        .into_iter()
        .map(|row| {
            vec![
                Cell::Text(row.key),
                Cell::Quantity(row.totals.quantity),
                Cell::Number(row.totals.amount(field)),
            ]
        })
        .collect();
    let grand = summary.grand_total();
    Sheet {
        name: name.to_string(),
        header: vec![
            summary.dimension.label().to_string(),
            "Quantity".to_string(),
            field.label().to_string(),
        ],
        rows,
        totals: vec![
            Cell::text("Total"),
            Cell::Quantity(grand.quantity),
            Cell::Number(grand.amount(field)),
        ],
    }
}

/// Row label, then a quantity/amount pair per visible column, then the row
/// totals pair.
pub fn cross_sheet(name: &str, outer: Dimension, view: &CrossView<'_>, field: AmountField) -> Sheet {
    let mut header = vec![outer.label().to_string()];
    for column in view.columns() {
        header.push(format!("{column} Qty"));
        header.push(format!("{column} {}", field.label()));
    }
    header.push("Total Qty".to_string());
    header.push(match field {
        AmountField::Total => field.label().to_string(),
        _ => format!("Total {}", field.label()),
    });

    let pair = |cells: &mut Vec<Cell>, t: &crate::aggregate::Totals| {
        cells.push(Cell::Quantity(t.quantity));
        cells.push(Cell::Number(t.amount(field)));
    };

    let rows = view
        .rows()
        .into_iter()
        .map(|row| {
            let mut cells = vec![Cell::Text(row.key.clone())];
            for cell in &row.cells {
                pair(&mut cells, cell);
            }
            pair(&mut cells, &row.total);
            cells
        })
        .collect();

    let mut totals = vec![Cell::text("Total")];
    for column in view.column_totals() {
        pair(&mut totals, &column);
    }
    pair(&mut totals, &view.grand_total());

    Sheet {
        name: name.to_string(),
        header,
        rows,
        totals,
    }
}

/// The sheet for one dashboard table under the current selections.
pub fn table_sheet(state: &DashboardState, table: TableId) -> Sheet {
    match state.table(table) {
        TableData::Summary(summary) => summary_sheet(table.title(), &summary, state.amount_field),
        TableData::Cross(cross) => {
            let view = cross.view(state.column_selection(table));
            cross_sheet(table.title(), cross.outer, &view, state.amount_field)
        }
    }
}

/// One sheet per open table, in display priority. Closed tables are skipped.
pub fn dashboard_workbook(state: &DashboardState) -> Workbook {
    Workbook {
        sheets: state
            .open_tables()
            .map(|table| table_sheet(state, table))
            .collect(),
    }
}

pub fn dashboard_document(state: &DashboardState) -> Document {
    let range = &state.filters.date_range;
    let mut document = Document::new("Billing Summary", dashboard_workbook(state))
        .with_detail("Amount", state.amount_field.label());
    if !range.is_unbounded() {
        let side = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        document = document.with_detail(
            "Period",
            format!("{} to {}", side(range.start), side(range.end)),
        );
    }
    for dim in Dimension::ALL {
        if let Some(values) = state.filters.selected(dim) {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            document = document.with_detail(dim.label(), values.join(", "));
        }
    }
    document
}

/// The reports currently shown on one page of the report browser.
pub fn reports_sheet(reports: &[&BillReport]) -> Sheet {
    let rows = reports
        .iter()
        .map(|r| {
            vec![
                Cell::text(r.bill_report_id.clone()),
                Cell::text(r.center_name.clone().unwrap_or_default()),
                Cell::text(r.source_of_receipt.clone().unwrap_or_default()),
                Cell::text(
                    r.created_at
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                ),
                Cell::text(r.status.as_str()),
                Cell::Quantity(r.components.len() as f64),
                Cell::Number(r.total_sold()),
            ]
        })
        .collect();
    Sheet {
        name: "Bill Reports".to_string(),
        header: [
            "Bill Report ID",
            "Center",
            "Source of Receipt",
            "Created",
            "Status",
            "Components",
            "Sold Amount",
        ]
        .map(String::from)
        .to_vec(),
        rows,
        totals: vec![
            Cell::text("Total"),
            Cell::text(""),
            Cell::text(""),
            Cell::text(""),
            Cell::text(""),
            Cell::Quantity(reports.iter().map(|r| r.components.len() as f64).sum()),
            Cell::Number(reports.iter().map(|r| r.total_sold()).sum()),
        ],
    }
}

/// Line items of a single report.
pub fn components_sheet(report: &BillReport) -> Sheet {
    let rows = report
        .components
        .iter()
        .map(|c| {
            vec![
                Cell::text(c.component_name.clone().unwrap_or_default()),
                Cell::text(c.investment_name.clone().unwrap_or_default()),
                Cell::text(c.scheme_name.clone().unwrap_or_default()),
                Cell::text(c.unit.clone().unwrap_or_default()),
                Cell::Quantity(c.allocated_quantity),
                Cell::Quantity(c.updated_quantity),
                Cell::Number(c.rate),
                Cell::Number(c.buy_amount),
                Cell::Number(c.sold_amount),
            ]
        })
        .collect();
    let sum = |f: fn(&crate::model::ReportComponent) -> f64| -> f64 {
        report.components.iter().map(f).sum()
    };
    Sheet {
        name: report.bill_report_id.clone(),
        header: [
            "Component",
            "Investment",
            "Scheme",
            "Unit",
            "Allocated Qty",
            "Updated Qty",
            "Rate",
            "Buy Amount",
            "Sold Amount",
        ]
        .map(String::from)
        .to_vec(),
        rows,
        totals: vec![
            Cell::text("Total"),
            Cell::text(""),
            Cell::text(""),
            Cell::text(""),
            Cell::Quantity(sum(|c| c.allocated_quantity)),
            Cell::Quantity(sum(|c| c.updated_quantity)),
            Cell::text(""),
            Cell::Number(sum(|c| c.buy_amount)),
            Cell::Number(sum(|c| c.sold_amount)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardAction;
    use crate::model::{parse_bill_reports, BillingLineItem};

    fn item(center: &str, scheme: &str, qty: f64, subsidy: f64) -> BillingLineItem {
        BillingLineItem {
            id: None,
            scheme_name: Some(scheme.into()),
            investment_name: Some("Seeds".into()),
            sub_investment_name: None,
            center_name: Some(center.into()),
            constituency_name: None,
            bill_date: None,
            allocated_quantity: qty,
            farmer_share: 0.0,
            subsidy,
            total_amount: subsidy,
            bill_report: None,
        }
    }

    fn state() -> DashboardState {
        DashboardState::default()
            .reduce(DashboardAction::Loaded(vec![
                item("Rampur", "A", 2.0, 100.0),
                item("Rampur", "B", 1.0, 20.0),
                item("Sitapur", "A", 3.0, 5.0),
                item("Mau", "C", 1.0, 7.0),
            ]))
            .reduce(DashboardAction::SetAmountField(AmountField::Subsidy))
    }

    #[test]
    fn summary_sheet_has_key_rows_and_totals() {
        let state = state().reduce(DashboardAction::OpenTable(TableId::Center));
        let sheet = table_sheet(&state, TableId::Center);
        assert_eq!(sheet.header, vec!["Center", "Quantity", "Subsidy"]);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.data_rows().count(), 3 + 1);
        assert_eq!(sheet.rows[0][0], Cell::text("Rampur"));
        assert_eq!(sheet.totals[2], Cell::Number(132.0));
        assert_eq!(sheet.totals[1], Cell::Quantity(7.0));
    }

    #[test]
    fn cross_sheet_column_order() {
        let state = state().reduce(DashboardAction::SetColumns {
            table: TableId::CenterScheme,
            values: vec!["A".into(), "B".into()],
        });
        let sheet = table_sheet(&state, TableId::CenterScheme);
        assert_eq!(
            sheet.header,
            vec![
                "Center",
                "A Qty",
                "A Subsidy",
                "B Qty",
                "B Subsidy",
                "Total Qty",
                "Total Subsidy"
            ]
        );
        // every observed outer key, even with nothing in the visible columns
        assert_eq!(sheet.rows.len(), 3);
        let rampur = &sheet.rows[1];
        assert_eq!(rampur[0], Cell::text("Rampur"));
        assert_eq!(rampur[6], Cell::Number(120.0));
        let mau = &sheet.rows[0];
        assert_eq!(mau[6], Cell::Number(0.0));
        assert_eq!(sheet.totals[2], Cell::Number(105.0));
        assert_eq!(sheet.totals[6], Cell::Number(125.0));
    }

    #[test]
    fn collapsed_tables_are_left_out() {
        let state = state()
            .reduce(DashboardAction::OpenTable(TableId::CenterScheme))
            .reduce(DashboardAction::OpenTable(TableId::Scheme));
        let names: Vec<String> = dashboard_workbook(&state)
            .sheets
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec![TableId::Scheme.title(), TableId::CenterScheme.title()]
        );

        let state = state.reduce(DashboardAction::ToggleTable(TableId::CenterScheme));
        let document = dashboard_document(&state);
        assert_eq!(document.sheets.len(), 1);
        assert_eq!(document.sheets[0].name, TableId::Scheme.title());

        let state = state.reduce(DashboardAction::CloseTable(TableId::Scheme));
        assert!(dashboard_workbook(&state).sheets.is_empty());
    }

    #[test]
    fn document_describes_filters() {
        let mut state = state().reduce(DashboardAction::OpenTable(TableId::Scheme));
        state.filters.select(Dimension::Center, "Rampur");
        let document = dashboard_document(&state);
        assert!(document
            .details
            .contains(&("Center".to_string(), "Rampur".to_string())));
        assert!(document
            .details
            .contains(&("Amount".to_string(), "Subsidy".to_string())));
    }

    #[test]
    fn report_sheets() {
        let reports = parse_bill_reports(
            r#"[{"id": 1, "bill_report_id": "BR-1", "status": "accepted",
                 "components": [{"component_name": "DAP", "sold_amount": 10, "allocated_quantity": 2},
                                {"component_name": "Urea", "sold_amount": 5.5, "allocated_quantity": 1}]},
                {"id": 2, "bill_report_id": "BR-2", "status": "cancelled", "components": []}]"#,
        )
        .unwrap();
        let refs: Vec<&BillReport> = reports.iter().collect();
        let page = reports_sheet(&refs);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.totals[6], Cell::Number(15.5));

        let items = components_sheet(&reports[0]);
        assert_eq!(items.name, "BR-1");
        assert_eq!(items.rows.len(), 2);
        assert_eq!(items.totals[4], Cell::Quantity(3.0));
        assert_eq!(items.totals[8], Cell::Number(15.5));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/summary.XLSX")).unwrap(),
            ExportFormat::Xlsx
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("summary.htm")).unwrap(),
            ExportFormat::Html
        );
        assert!(ExportFormat::from_path(Path::new("summary.ods")).is_err());
        assert!(ExportFormat::from_path(Path::new("summary")).is_err());
    }

    #[test]
    fn empty_document_is_rejected() {
        let document = Document::new("Empty", Workbook::default());
        let err = write_document(&document, Path::new("never-written.html")).unwrap_err();
        assert!(matches!(err, DashboardError::NothingToExport));
    }

    #[test]
    fn sheet_slug() {
        let sheet = components_sheet(&parse_bill_reports(r#"[{"id": 1}]"#).unwrap()[0]);
        assert_eq!(sheet.slug(), "1");
        let sheet = Sheet {
            name: "Center and Scheme Wise Summary".into(),
            header: vec![],
            rows: vec![],
            totals: vec![],
        };
        assert_eq!(sheet.slug(), "center-and-scheme-wise-summary");
    }
}
