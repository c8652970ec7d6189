//! Income and expense management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, loading, and deleting income and expenses
//! - The pages and endpoints for recording and deleting income and expenses
//! - CSV export

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod export;

pub use core::{
    ExpenseCategory, Transaction, TransactionBuilder, TransactionId, TransactionKind,
    create_transaction, create_transaction_tables, delete_transaction, get_transactions,
};
pub use create_endpoint::{create_expense_endpoint, create_income_endpoint};
pub use create_page::{get_new_expense_page, get_new_income_page};
pub use delete_endpoint::{delete_expense_endpoint, delete_income_endpoint};
pub use export::{
    export_expenses_endpoint, export_income_endpoint, transactions_to_csv, write_csv,
};
