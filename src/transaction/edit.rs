//! Transaction update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    extract::JsonBody,
    transaction::{
        Transaction, TransactionBuilder, TransactionForm, TransactionId,
        ensure_transaction_allowed, get_transaction, update_transaction,
    },
};

/// The state needed for updating a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace the fields of a transaction, checking the business rules again.
///
/// The creation time of the transaction does not change.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionState>,
    JsonBody(form): JsonBody<TransactionForm>,
) -> Result<Json<Transaction>, Error> {
    let builder = TransactionBuilder::try_from(form)?;

    let connection = lock_connection(&state.db_connection)?;

    get_transaction(transaction_id, &connection)?;
    ensure_transaction_allowed(&*connection, &builder)?;

    let transaction = update_transaction(transaction_id, builder, &connection)?;

    tracing::info!("updated transaction {transaction_id}");

    Ok(Json(transaction))
}
