//! Transaction management for the household.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The business rules a transaction must follow
//! - The endpoints for creating, listing, editing and deleting transactions

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod filter;
mod list;
mod validate;
mod validation;

pub use create::create_transaction_endpoint;
pub use db::{
    count_person_transactions, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, get_transactions, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{Transaction, TransactionBuilder, TransactionForm, TransactionId, TransactionType};
pub use edit::update_transaction_endpoint;
pub use filter::{TransactionFilter, TransactionQuery, filter_transactions};
pub use list::{get_transaction_endpoint, get_transactions_endpoint};
pub use validate::validate_transaction_endpoint;
pub use validation::{
    FailureReason, ValidationReport, check_transaction, ensure_transaction_allowed,
    validate_transaction,
};

#[cfg(test)]
pub use db::count_transactions;
