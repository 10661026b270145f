//! Pre-flight check of a transaction against the business rules.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    extract::QueryParams,
    transaction::{TransactionQuery, TransactionType, ValidationReport, check_transaction},
};

/// The state needed for checking a transaction.
#[derive(Debug, Clone)]
pub struct ValidateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ValidateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Check whether a transaction could be created, without creating it.
///
/// A missing person or category is reported as a broken rule. A missing or
/// unknown type is a bad request, since the rules cannot be checked without it.
pub async fn validate_transaction_endpoint(
    State(state): State<ValidateTransactionState>,
    QueryParams(query): QueryParams<TransactionQuery>,
) -> Result<Json<ValidationReport>, Error> {
    let transaction_type =
        TransactionType::from_str(query.transaction_type.as_deref().unwrap_or(""))?;

    let connection = lock_connection(&state.db_connection)?;

    check_transaction(
        &*connection,
        query.person_id,
        query.category_id,
        transaction_type,
    )
    .map(Json)
}
