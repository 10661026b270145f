//! Person update endpoint.

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
    person::{Age, Person, PersonForm, PersonId, PersonName, ensure_name_available, get_person, update_person},
};

/// The state needed for updating a person.
#[derive(Debug, Clone)]
pub struct UpdatePersonState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdatePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace the name and age of a person.
///
/// Existing transactions are kept as they are, even if the new age makes the
/// person a minor with income.
pub async fn update_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<UpdatePersonState>,
    JsonBody(form): JsonBody<PersonForm>,
) -> Result<Json<Person>, Error> {
    let name = PersonName::new(&form.name)?;
    let age = Age::new(form.age)?;

    let connection = lock_connection(&state.db_connection)?;

    // Report a missing person before complaining about the name.
    get_person(person_id, &connection)?;
    ensure_name_available(&*connection, &name, Some(person_id))?;

    let person = update_person(person_id, name, age, &connection)?;

    tracing::info!("updated person {person_id}");

    Ok(Json(person))
}
