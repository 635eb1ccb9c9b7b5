//! Transaction management for the spending tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and database functions for storing and querying transactions
//! - The endpoints for creating and deleting transactions
//! - The pages for listing transactions and entering a new one

mod core;
mod create_endpoint;
mod delete_endpoint;
mod new_transaction_page;
mod transactions_page;

pub use core::{
    NewTransaction, Transaction, create_transaction, create_transaction_table,
    get_recent_categories, get_recent_transactions, get_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use new_transaction_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;
