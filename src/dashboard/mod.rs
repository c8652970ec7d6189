//! Dashboard module
//!
//! Provides an overview page with totals, charts, saving advice and the most
//! recent income and expenses. The aggregation functions are public so they
//! can be used without the web layer.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod suggestion;
mod tables;

pub use aggregation::{
    CategoryTotal, MonthlyTotal, Totals, by_category, latest, monthly_trend, search, totals,
};
pub use handlers::get_dashboard_page;
pub use suggestion::{Advice, CategoryCut, Suggestion, suggest};
