//! The dashboard page: summary cards, charts, the savings goal and spending
//! insights.

mod aggregation;
mod charts;
mod handlers;
mod insight;
mod summary;

pub use handlers::get_dashboard_page;
