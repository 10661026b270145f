//! Person deletion endpoint.
//!
//! Deleting a person always succeeds if the person exists, and takes all of
//! their transactions with them.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    person::{Person, PersonId, delete_person},
    repository::Repository,
};

/// The state needed for deleting a person.
#[derive(Debug, Clone)]
pub struct DeletePersonState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// What deleting a person removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonDeletion {
    /// The number of transactions removed along with the person.
    #[serde(rename = "transacoesRemovidas")]
    pub removed_transactions: u32,
}

/// Work out what deleting the person `person_id` would remove, without deleting anything.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such person, or an error from `repository`.
pub fn plan_person_deletion<R: Repository + ?Sized>(
    repository: &R,
    person_id: PersonId,
) -> Result<(Person, PersonDeletion), Error> {
    let person = repository
        .find_person_by_id(person_id)?
        .ok_or(Error::NotFound)?;
    let removed_transactions = repository.count_transactions_referencing_person(person_id)?;

    Ok((
        person,
        PersonDeletion {
            removed_transactions,
        },
    ))
}

/// Delete a person and their transactions, responding with how many transactions were removed.
pub async fn delete_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<DeletePersonState>,
) -> Result<Json<PersonDeletion>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let (person, plan) = plan_person_deletion(&*connection, person_id)?;
    tracing::info!(
        "deleting person {person_id} \"{}\" and {} transaction(s)",
        person.name,
        plan.removed_transactions
    );

    let removed_transactions = delete_person(person_id, &connection)?;

    Ok(Json(PersonDeletion {
        removed_transactions,
    }))
}
