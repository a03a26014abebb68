//! Dashboard module
//!
//! Provides an overview page showing loan book summaries and charts.

mod cards;
mod charts;
mod handlers;
mod stats;

pub use handlers::get_dashboard_page;
