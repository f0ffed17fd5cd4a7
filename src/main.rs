use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::debug;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use billdash::aggregate::AmountField;
use billdash::api::{BillingApi, HttpApi, SnapshotApi};
use billdash::chart::{cross_chart, summary_chart};
use billdash::config::{config_dir, load_config, resolve_output_dir, Config, CONFIG_TEMPLATE};
use billdash::dashboard::{DashboardAction, DashboardState, TableData, TableId};
use billdash::error::{DashboardError, Result};
use billdash::export::{
    components_sheet, dashboard_document, reports_sheet, table_sheet, write_document, Document,
    Sheet, Workbook,
};
use billdash::filter::{DateRange, Dimension};
use billdash::fmt;
use billdash::model::BillReport;
use billdash::reports::{confirm_cancel, receipt_url, ReportDimension, ReportsAction, ReportsState};
use billdash::state::LoadState;

#[derive(Parser)]
#[command(name = "billdash")]
#[command(version, about = "Billing and subsidy reporting dashboard", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.billdash)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Read billing data from a snapshot directory instead of the service
    #[arg(long, global = true, value_name = "DIR")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show configuration and data source status
    Status,

    /// Browse and manage submitted bill reports
    #[command(subcommand)]
    Reports(ReportsCommand),

    /// Show the aggregation tables for the current filters
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// List the filter values available under the current filters
    Options {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the chart dataset of one table as JSON
    Chart {
        #[arg(value_enum)]
        table: TableId,

        #[command(flatten)]
        filters: FilterArgs,

        /// Amount field to chart
        #[arg(long, value_enum)]
        amount: Option<AmountField>,
    },

    /// Export the open tables (xlsx, csv, html or pdf, by extension)
    Export {
        /// Output file (default: output_dir/billing-summary-YYYY-MM-DD.xlsx)
        path: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Open the exported file with the system default viewer
        #[arg(long)]
        open_file: bool,
    },
}

#[derive(Subcommand)]
enum ReportsCommand {
    /// List reports, one page at a time
    List {
        #[arg(long, value_name = "NAME")]
        center: Vec<String>,

        #[arg(long, value_name = "STATUS")]
        status: Vec<String>,

        /// Source of receipt
        #[arg(long, value_name = "NAME")]
        source: Vec<String>,

        /// Reports with at least one component under this scheme
        #[arg(long, value_name = "NAME")]
        scheme: Vec<String>,

        /// Created on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Created on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Show the line items of these reports (can be repeated)
        #[arg(short, long, value_name = "BILL_REPORT_ID")]
        expand: Vec<String>,

        /// Write the visible page to a file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },

    /// Show one report with its line items
    Show {
        bill_report_id: String,

        /// Write the line items to a file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },

    /// Cancel an accepted report
    Cancel {
        bill_report_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the receipt URL of a report
    Receipt {
        bill_report_id: String,

        /// Open the receipt with the system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Bills dated on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Bills dated on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Scheme name (can be repeated)
    #[arg(long, value_name = "NAME")]
    scheme: Vec<String>,

    /// Investment name (can be repeated)
    #[arg(long, value_name = "NAME")]
    investment: Vec<String>,

    /// Sub-investment name (can be repeated)
    #[arg(long, value_name = "NAME")]
    sub_investment: Vec<String>,

    /// Center name (can be repeated)
    #[arg(long, value_name = "NAME")]
    center: Vec<String>,

    /// Vidhan sabha name (can be repeated)
    #[arg(long, value_name = "NAME")]
    constituency: Vec<String>,
}

impl FilterArgs {
    fn date_range(&self) -> Result<DateRange> {
        Ok(DateRange::new(
            parse_date(self.from.as_deref())?,
            parse_date(self.to.as_deref())?,
        ))
    }

    fn selections(&self) -> [(Dimension, &Vec<String>); 5] {
        [
            (Dimension::Scheme, &self.scheme),
            (Dimension::Investment, &self.investment),
            (Dimension::SubInvestment, &self.sub_investment),
            (Dimension::Center, &self.center),
            (Dimension::Constituency, &self.constituency),
        ]
    }
}

#[derive(Args, Clone, Default)]
struct ViewArgs {
    /// Amount field shown in every table
    #[arg(long, value_enum)]
    amount: Option<AmountField>,

    /// Tables to show (default: dashboard.open_tables from config)
    #[arg(long = "open", value_enum, value_name = "TABLE")]
    open: Vec<TableId>,

    /// Restrict a cross table's columns, e.g. center-scheme=PMKSY
    #[arg(long = "columns", value_name = "TABLE=VALUE")]
    columns: Vec<String>,
}

/// Loaded configuration plus the data source it points at.
struct Context {
    cfg_dir: PathBuf,
    config: Config,
    api: Box<dyn BillingApi>,
    source: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    if let Commands::Init = cli.command {
        return cmd_init(&cfg_dir);
    }

    let ctx = context(cfg_dir, cli.data)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Status => cmd_status(&ctx),
        Commands::Reports(command) => match command {
            ReportsCommand::List {
                center,
                status,
                source,
                scheme,
                from,
                to,
                page,
                expand,
                export,
            } => {
                let selections = [
                    (ReportDimension::Center, center),
                    (ReportDimension::Status, status),
                    (ReportDimension::Source, source),
                    (ReportDimension::Scheme, scheme),
                ];
                let range = DateRange::new(parse_date(from.as_deref())?, parse_date(to.as_deref())?);
                cmd_reports_list(&ctx, selections, range, page, &expand, export)
            }
            ReportsCommand::Show {
                bill_report_id,
                export,
            } => cmd_reports_show(&ctx, &bill_report_id, export),
            ReportsCommand::Cancel {
                bill_report_id,
                yes,
            } => cmd_reports_cancel(&ctx, &bill_report_id, yes),
            ReportsCommand::Receipt {
                bill_report_id,
                open,
            } => cmd_reports_receipt(&ctx, &bill_report_id, open),
        },
        Commands::Dashboard { filters, view } => cmd_dashboard(&ctx, &filters, &view),
        Commands::Options { filters } => cmd_options(&ctx, &filters),
        Commands::Chart {
            table,
            filters,
            amount,
        } => cmd_chart(&ctx, table, &filters, amount),
        Commands::Export {
            path,
            filters,
            view,
            open_file,
        } => cmd_export(&ctx, path, &filters, &view, open_file),
    }
}

fn context(cfg_dir: PathBuf, data: Option<PathBuf>) -> Result<Context> {
    // A snapshot run works without any config on disk
    let config = match load_config(&cfg_dir) {
        Ok(config) => config,
        Err(DashboardError::ConfigNotFound(_) | DashboardError::ConfigFileNotFound(_))
            if data.is_some() =>
        {
            debug!("no config at {}, using defaults", cfg_dir.display());
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let (api, source): (Box<dyn BillingApi>, String) = match data {
        Some(dir) => {
            let source = format!("snapshot {}", dir.display());
            (Box::new(SnapshotApi::new(dir)), source)
        }
        None => {
            let timeout = Duration::from_secs(config.api.timeout_secs);
            let source = config.api.base_url.clone();
            (Box::new(HttpApi::new(source.clone(), timeout)), source)
        }
    };

    Ok(Context {
        cfg_dir,
        config,
        api,
        source,
    })
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(DashboardError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized billdash config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your billing service:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Check the connection:              billdash status");
    println!();
    println!("Then look at the numbers:");
    println!("  billdash dashboard --amount subsidy");

    Ok(())
}

fn cmd_status(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    println!("Config dir:   {}", ctx.cfg_dir.display());
    println!("Data source:  {}", ctx.source);
    println!("Receipts:     {}", config.api.receipt_base());
    println!("Timeout:      {}s", config.api.timeout_secs);
    println!(
        "Output dir:   {}",
        resolve_output_dir(&config.export.output_dir, &ctx.cfg_dir).display()
    );
    println!("Amount field: {}", config.dashboard.amount_field);
    println!();

    match LoadState::from_result(ctx.api.fetch_reports())? {
        LoadState::Loaded(reports) => {
            let accepted = reports.iter().filter(|r| r.status.is_cancellable()).count();
            println!("Reports:      {} ({} accepted)", reports.len(), accepted);
        }
        LoadState::Failed(failure) => println!("Reports:      {failure}"),
        LoadState::Loading => {}
    }
    match LoadState::from_result(ctx.api.fetch_billing_items())? {
        LoadState::Loaded(items) => println!("Bill items:   {}", items.len()),
        LoadState::Failed(failure) => println!("Bill items:   {failure}"),
        LoadState::Loading => {}
    }

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "BILL REPORT")]
    bill_report_id: String,
    #[tabled(rename = "CENTER")]
    center: String,
    #[tabled(rename = "SOURCE")]
    source: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "ITEMS")]
    items: usize,
    #[tabled(rename = "SOLD")]
    sold: String,
    #[tabled(rename = "ACTION")]
    action: String,
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "FILTER")]
    filter: String,
    #[tabled(rename = "VALUES")]
    values: String,
}

fn sheet_table(sheet: &Sheet) -> String {
    let mut builder = Builder::default();
    builder.push_record(sheet.header.iter().cloned());
    for row in sheet.data_rows() {
        builder.push_record(row.iter().map(|c| c.display()));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn load_reports(ctx: &Context, page_size: usize) -> Result<ReportsState> {
    let state = ReportsState::new(page_size);
    match LoadState::from_result(ctx.api.fetch_reports())? {
        LoadState::Loaded(reports) => Ok(state.reduce(ReportsAction::Loaded(reports))),
        LoadState::Failed(failure) => Err(DashboardError::LoadFailed(failure)),
        LoadState::Loading => Ok(state),
    }
}

fn find_report<'a>(state: &'a ReportsState, bill_report_id: &str) -> Result<&'a BillReport> {
    state
        .find(bill_report_id)
        .ok_or_else(|| DashboardError::ReportNotFound(bill_report_id.to_string()))
}

fn cmd_reports_list(
    ctx: &Context,
    selections: [(ReportDimension, Vec<String>); 4],
    range: DateRange,
    page: usize,
    expand: &[String],
    export: Option<PathBuf>,
) -> Result<()> {
    let mut state = load_reports(ctx, ctx.config.reports.page_size)?
        .reduce(ReportsAction::SetDateRange(range));
    for (dim, values) in selections {
        state = state.reduce(ReportsAction::SetFilter { dim, values });
    }
    state = state.reduce(ReportsAction::SetPage(page));
    for id in expand {
        state = state.reduce(ReportsAction::ToggleExpanded(id.clone()));
    }

    let visible = state.visible();
    if visible.is_empty() {
        println!("No reports match the current filters.");
        return Ok(());
    }

    let offset = (state.page - 1) * state.page_size;
    let rows: Vec<ReportRow> = visible
        .iter()
        .enumerate()
        .map(|(i, r)| ReportRow {
            index: offset + i + 1,
            bill_report_id: r.bill_report_id.clone(),
            center: r.center_name.clone().unwrap_or_default(),
            source: r.source_of_receipt.clone().unwrap_or_default(),
            created: r
                .created_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            status: r.status.to_string(),
            items: r.components.len(),
            sold: fmt::amount(r.total_sold()),
            action: if state.cancel_offered(r) {
                "cancel".to_string()
            } else {
                String::new()
            },
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!(
        "Page {} of {} ({} reports)",
        state.page,
        state.page_count(),
        state.filtered().len()
    );

    for report in visible.iter().filter(|r| state.is_expanded(&r.bill_report_id)) {
        println!();
        println!("{}", report.bill_report_id);
        println!("{}", sheet_table(&components_sheet(report)));
    }

    if let Some(path) = export {
        let document = Document::new(
            "Bill Reports",
            Workbook {
                sheets: vec![reports_sheet(&visible)],
            },
        )
        .with_detail("Page", format!("{} of {}", state.page, state.page_count()));
        let written = write_document(&document, &path)?;
        println!("Saved: {}", written.display());
    }

    Ok(())
}

fn cmd_reports_show(ctx: &Context, bill_report_id: &str, export: Option<PathBuf>) -> Result<()> {
    let state = load_reports(ctx, ctx.config.reports.page_size)?;
    let report = find_report(&state, bill_report_id)?;

    println!("Bill report:  {}", report.bill_report_id);
    println!("Center:       {}", report.center_name.as_deref().unwrap_or("-"));
    println!(
        "Source:       {}",
        report.source_of_receipt.as_deref().unwrap_or("-")
    );
    println!(
        "Created:      {}",
        report
            .created_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Status:       {}", report.status);
    if let Some(url) = receipt_url(ctx.config.api.receipt_base(), report) {
        println!("Receipt:      {url}");
    }
    println!();

    let sheet = components_sheet(report);
    println!("{}", sheet_table(&sheet));

    if let Some(path) = export {
        let mut document = Document::new(
            format!("Bill Report {}", report.bill_report_id),
            Workbook {
                sheets: vec![sheet],
            },
        )
        .with_detail("Status", report.status.as_str());
        if let Some(center) = &report.center_name {
            document = document.with_detail("Center", center.clone());
        }
        let written = write_document(&document, &path)?;
        println!("Saved: {}", written.display());
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn cmd_reports_cancel(ctx: &Context, bill_report_id: &str, yes: bool) -> Result<()> {
    let state = load_reports(ctx, ctx.config.reports.page_size)?;
    let report = find_report(&state, bill_report_id)?;
    if !state.cancel_offered(report) {
        return Err(DashboardError::InvalidTransition {
            bill_report_id: bill_report_id.to_string(),
            status: report.status.to_string(),
        });
    }

    if !yes && !confirm(&format!("Cancel report '{bill_report_id}'?"))? {
        return Err(DashboardError::NotConfirmed(bill_report_id.to_string()));
    }
    let state = state.reduce(ReportsAction::RequestCancel(bill_report_id.to_string()));

    let state = confirm_cancel(state, ctx.api.as_ref());
    if let Some(detail) = state.error {
        return Err(DashboardError::StatusUpdate {
            bill_report_id: bill_report_id.to_string(),
            detail,
        });
    }

    println!("Cancelled report '{bill_report_id}'");
    Ok(())
}

fn cmd_reports_receipt(ctx: &Context, bill_report_id: &str, open: bool) -> Result<()> {
    let state = load_reports(ctx, ctx.config.reports.page_size)?;
    let report = find_report(&state, bill_report_id)?;
    let url = receipt_url(ctx.config.api.receipt_base(), report)
        .ok_or_else(|| DashboardError::NoReceipt(bill_report_id.to_string()))?;

    println!("{url}");
    if open {
        open_path(&url)?;
    }
    Ok(())
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| DashboardError::InvalidDate(s.to_string()))
    })
    .transpose()
}

fn parse_columns(raw: &[String]) -> Result<BTreeMap<TableId, Vec<String>>> {
    let mut columns: BTreeMap<TableId, Vec<String>> = BTreeMap::new();
    for entry in raw {
        let (table, value) = entry
            .split_once('=')
            .filter(|(_, v)| !v.trim().is_empty())
            .ok_or_else(|| DashboardError::InvalidColumnSelection(entry.clone()))?;
        columns
            .entry(TableId::parse(table)?)
            .or_default()
            .push(value.trim().to_string());
    }
    Ok(columns)
}

/// Dashboard state with the billing items loaded and every command-line
/// selection applied.
fn dashboard_state(ctx: &Context, filters: &FilterArgs, view: &ViewArgs) -> Result<DashboardState> {
    let settings = &ctx.config.dashboard;
    let mut state = DashboardState::new(
        view.amount.unwrap_or(settings.amount_field),
        settings.label_limit,
    )
    .reduce(DashboardAction::SetDateRange(filters.date_range()?));

    for (dim, values) in filters.selections() {
        state = state.reduce(DashboardAction::SetOptions {
            dim,
            values: values.clone(),
        });
    }

    let tables = if view.open.is_empty() {
        &settings.open_tables
    } else {
        &view.open
    };
    for table in tables {
        state = state.reduce(DashboardAction::OpenTable(*table));
    }
    for (table, values) in parse_columns(&view.columns)? {
        state = state.reduce(DashboardAction::SetColumns { table, values });
    }

    match LoadState::from_result(ctx.api.fetch_billing_items())? {
        LoadState::Loaded(items) => Ok(state.reduce(DashboardAction::Loaded(items))),
        LoadState::Failed(failure) => Err(DashboardError::LoadFailed(failure)),
        LoadState::Loading => Ok(state),
    }
}

fn warn_stale(state: &DashboardState) {
    for dim in Dimension::ALL {
        let stale = state.filters.stale_selections(state.records(), dim);
        if !stale.is_empty() {
            eprintln!(
                "Note: {} selection no longer matches anything: {}",
                dim.label(),
                stale.join(", ")
            );
        }
    }
}

fn cmd_dashboard(ctx: &Context, filters: &FilterArgs, view: &ViewArgs) -> Result<()> {
    let state = dashboard_state(ctx, filters, view)?;
    warn_stale(&state);

    println!(
        "Showing {} of {} billing items ({})",
        state.filtered().len(),
        state.records().len(),
        state.amount_field
    );

    let open: Vec<TableId> = state.open_tables().collect();
    if open.is_empty() {
        println!("No tables open. Use --open <TABLE>.");
        return Ok(());
    }
    for table in open {
        println!();
        println!("{}", table.title());
        println!("{}", sheet_table(&table_sheet(&state, table)));
    }
    Ok(())
}

fn cmd_options(ctx: &Context, filters: &FilterArgs) -> Result<()> {
    let state = dashboard_state(ctx, filters, &ViewArgs::default())?;

    let rows: Vec<OptionRow> = Dimension::ALL
        .iter()
        .map(|&dim| OptionRow {
            filter: dim.label().to_string(),
            values: state
                .options(dim)
                .iter()
                .map(|value| {
                    if state.filters.is_selected(dim, value) {
                        format!("[x] {value}")
                    } else {
                        value.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    warn_stale(&state);
    Ok(())
}

fn cmd_chart(
    ctx: &Context,
    table: TableId,
    filters: &FilterArgs,
    amount: Option<AmountField>,
) -> Result<()> {
    let view = ViewArgs {
        amount,
        ..ViewArgs::default()
    };
    let state = dashboard_state(ctx, filters, &view)?;
    let chart = match state.table(table) {
        TableData::Summary(summary) => summary_chart(
            table.title(),
            table.chart_kind(),
            &summary,
            state.amount_field,
            state.label_limit,
        ),
        TableData::Cross(cross) => cross_chart(
            table.title(),
            &cross.view(state.column_selection(table)),
            state.amount_field,
            state.label_limit,
        ),
    };
    let json = serde_json::to_string_pretty(&chart).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

fn cmd_export(
    ctx: &Context,
    path: Option<PathBuf>,
    filters: &FilterArgs,
    view: &ViewArgs,
    open_file: bool,
) -> Result<()> {
    let state = dashboard_state(ctx, filters, view)?;
    warn_stale(&state);

    let path = match path {
        Some(p) => p,
        None => {
            let output_dir = resolve_output_dir(&ctx.config.export.output_dir, &ctx.cfg_dir);
            let today = chrono::Local::now().format("%Y-%m-%d");
            output_dir.join(format!("billing-summary-{today}.xlsx"))
        }
    };

    let document = dashboard_document(&state);
    let written = match write_document(&document, &path) {
        Ok(written) => written,
        Err(e) if e.is_export_failure() => {
            let state = state.reduce(DashboardAction::ExportFailed(e.to_string()));
            debug!("export to {} failed: {e:?}", path.display());
            return Err(DashboardError::ExportFailed(
                state.notice.unwrap_or_else(|| e.to_string()),
            ));
        }
        Err(e) => return Err(e),
    };

    println!("Exported {} table(s)", document.sheets.len());
    println!("  Saved: {}", written.display());

    if open_file {
        open_path(&written.to_string_lossy())?;
    }
    Ok(())
}

fn open_path(target: &str) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(target).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(target).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", target])
            .spawn()?;
    }
    Ok(())
}
