//! Visualization layer for dashboards and exports.

mod dashboard;
mod export;

pub use dashboard::{render_dashboard, render_top_consumers, DashboardData};
pub use export::{default_export_path, export_csv_file, open_file};
