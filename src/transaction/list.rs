//! Endpoints for reading transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    extract::QueryParams,
    repository::Repository,
    transaction::{Transaction, TransactionFilter, TransactionId, TransactionQuery, get_transaction},
};

/// The state needed for reading transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the transactions that match the query parameters, newest first.
///
/// Empty parameters, e.g. `?pessoaId=`, place no restriction.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    QueryParams(query): QueryParams<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter::try_from(query)?;
    tracing::debug!("listing transactions with {filter:?}");

    let connection = lock_connection(&state.db_connection)?;

    connection.list_transactions(&filter).map(Json)
}

/// Get a single transaction.
pub async fn get_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<TransactionsState>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(transaction_id, &connection).map(Json)
}
