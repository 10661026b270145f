//! Person creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    person::{Age, PersonForm, PersonId, PersonName, create_person},
    repository::Repository,
};

/// The state needed for creating a person.
#[derive(Debug, Clone)]
pub struct CreatePersonState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Check that no other person uses `name`, ignoring case.
///
/// Pass the ID of the person being edited as `excluding` so that they may keep
/// their own name.
///
/// # Errors
/// Returns [Error::DuplicatePersonName] if the name is taken, or an error from
/// `repository`.
pub fn ensure_name_available<R: Repository + ?Sized>(
    repository: &R,
    name: &PersonName,
    excluding: Option<PersonId>,
) -> Result<(), Error> {
    if repository.name_exists(name, excluding)? {
        tracing::warn!("rejected duplicate person name \"{name}\"");
        return Err(Error::DuplicatePersonName(name.to_string()));
    }

    Ok(())
}

/// Handle person creation, responding with the new person.
pub async fn create_person_endpoint(
    State(state): State<CreatePersonState>,
    JsonBody(form): JsonBody<PersonForm>,
) -> Result<Response, Error> {
    let name = PersonName::new(&form.name)?;
    let age = Age::new(form.age)?;

    let connection = lock_connection(&state.db_connection)?;

    ensure_name_available(&*connection, &name, None)?;
    let person = create_person(name, age, &connection)?;

    tracing::info!("created person {} \"{}\"", person.id, person.name);

    let location = format_endpoint(endpoints::PERSON, person.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(person)).into_response())
}
