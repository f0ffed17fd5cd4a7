pub mod aggregate;
pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod fmt;
pub mod model;
pub mod pdf;
pub mod reports;
pub mod state;

pub use config::Config;
pub use dashboard::{DashboardAction, DashboardState, TableId};
pub use error::{DashboardError, LoadFailure, Result};
pub use reports::{ReportsAction, ReportsState};
