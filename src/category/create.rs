//! Category creation endpoint.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

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
    category::{CategoryForm, CategoryPurpose, create_category},
    description::Description,
    endpoints::{self, format_endpoint},
    extract::JsonBody,
    repository::Repository,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Check that no category uses `description`, ignoring case.
///
/// # Errors
/// Returns [Error::DuplicateCategoryDescription] if the description is taken,
/// or an error from `repository`.
pub fn ensure_description_available<R: Repository + ?Sized>(
    repository: &R,
    description: &Description,
) -> Result<(), Error> {
    if repository.description_exists(description)? {
        tracing::warn!("rejected duplicate category description \"{description}\"");
        return Err(Error::DuplicateCategoryDescription(description.to_string()));
    }

    Ok(())
}

/// Handle category creation, responding with the new category.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    JsonBody(form): JsonBody<CategoryForm>,
) -> Result<Response, Error> {
    let description = Description::new(&form.description)?;
    let purpose = CategoryPurpose::from_str(&form.purpose)?;

    let connection = lock_connection(&state.db_connection)?;

    ensure_description_available(&*connection, &description)?;
    let category = create_category(description, purpose, &connection)?;

    tracing::info!(
        "created category {} \"{}\" for {}",
        category.id,
        category.description,
        category.purpose
    );

    let location = format_endpoint(endpoints::CATEGORY, category.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(category)).into_response())
}
