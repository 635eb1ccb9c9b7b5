//! Investment tracking for the spending tracker.
//!
//! Investments are named holdings with a current value, e.g. "Index fund".
//! They appear in the asset allocation chart on the dashboard.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod investments_page;

pub use core::{Investment, create_investment, create_investment_table, get_investments};
pub use create_endpoint::create_investment_endpoint;
pub use delete_endpoint::delete_investment_endpoint;
pub use investments_page::get_investments_page;
