//! Endpoints for reading people.

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
    person::{Person, PersonId, get_person},
    report::{Totals, totals_by},
    repository::Repository,
    transaction::{Transaction, TransactionFilter},
};

/// The state needed for reading people.
#[derive(Debug, Clone)]
pub struct PeopleState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PeopleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A person along with the totals of their transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSummary {
    /// The person.
    #[serde(flatten)]
    pub person: Person,
    /// The totals of the person's transactions.
    #[serde(flatten)]
    pub totals: Totals,
}

/// Pair each person with the totals of their transactions, keeping the order of `people`.
pub fn summarize_people(people: Vec<Person>, transactions: &[Transaction]) -> Vec<PersonSummary> {
    let mut totals = totals_by(transactions, |transaction| transaction.person_id);

    people
        .into_iter()
        .map(|person| PersonSummary {
            totals: totals.remove(&person.id).unwrap_or_default(),
            person,
        })
        .collect()
}

/// List every person with the totals of their transactions, ordered by name.
pub async fn get_people_endpoint(
    State(state): State<PeopleState>,
) -> Result<Json<Vec<PersonSummary>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let people = connection.list_people()?;
    let transactions = connection.list_transactions(&TransactionFilter::all())?;

    Ok(Json(summarize_people(people, &transactions)))
}

/// Get a single person.
pub async fn get_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<PeopleState>,
) -> Result<Json<Person>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_person(person_id, &connection).map(Json)
}
