//! Transaction creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    transaction::{TransactionBuilder, TransactionForm, create_transaction, ensure_transaction_allowed},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle transaction creation, responding with the new transaction.
///
/// The transaction is only stored if it passes every business rule, otherwise
/// all of the broken rules are sent back.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    JsonBody(form): JsonBody<TransactionForm>,
) -> Result<Response, Error> {
    let builder = TransactionBuilder::try_from(form)?;

    let connection = lock_connection(&state.db_connection)?;

    ensure_transaction_allowed(&*connection, &builder)?;
    let transaction = create_transaction(builder, OffsetDateTime::now_utc(), &connection)?;

    tracing::info!(
        "created {} {} of {} for person {}",
        transaction.transaction_type,
        transaction.id,
        transaction.amount,
        transaction.person_id
    );

    let location = format_endpoint(endpoints::TRANSACTION, transaction.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)).into_response())
}
