//! A household expense tracker.
//!
//! People in the household record income and expenses against categories,
//! and the app totals them up per person and per category. Minors may only
//! have expenses and a category only accepts the transaction types its purpose
//! allows.
//!
//! This library provides a JSON REST API backed by SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod database_id;
mod db;
mod description;
mod endpoints;
mod error;
mod extract;
mod logging;
mod money;
mod person;
mod report;
mod repository;
mod routing;
mod transaction;

pub use app_state::AppState;
pub use category::{Category, CategoryId, CategoryPurpose, DeletionCheck, can_delete_category};
pub use db::initialize as initialize_db;
pub use description::Description;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Amount;
pub use person::{Age, Person, PersonId, PersonName};
pub use report::{
    CategoryTotals, PersonTotals, Report, Totals, aggregate_by_category, aggregate_by_person,
};
pub use repository::Repository;
pub use routing::build_router;
pub use transaction::{
    FailureReason, Transaction, TransactionFilter, TransactionId, TransactionType,
    ValidationReport, filter_transactions, validate_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
