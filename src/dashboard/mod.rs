mod state;
mod table;

pub use state::{DashboardAction, DashboardState, TableData};
pub use table::{TableId, TableShape};
