//! Category deletion endpoints.
//!
//! A category in use by a transaction is never deleted, the database refuses
//! the delete even if the check here is raced.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    category::{Category, CategoryId, DeletionCheck, can_delete_category, delete_category},
    repository::Repository,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn check_category<R: Repository + ?Sized>(
    repository: &R,
    category_id: CategoryId,
) -> Result<(Category, DeletionCheck), Error> {
    let category = repository
        .find_category_by_id(category_id)?
        .ok_or(Error::NotFound)?;
    let count = repository.count_transactions_referencing_category(category_id)?;
    let check = can_delete_category(&category, count);

    Ok((category, check))
}

/// Report whether a category may be deleted, without deleting it.
pub async fn can_delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
) -> Result<Json<DeletionCheck>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let (_, check) = check_category(&*connection, category_id)?;

    Ok(Json(check))
}

/// Delete a category that no transaction uses, responding with the deleted category.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let (category, check) = check_category(&*connection, category_id)?;

    if !check.allowed {
        tracing::warn!(
            "refused to delete category {category_id}, it is used by {} transaction(s)",
            check.transaction_count
        );
        return Err(Error::CategoryInUse(check.transaction_count));
    }

    delete_category(category_id, &connection)?;

    tracing::info!("deleted category {category_id} \"{}\"", category.description);

    Ok(Json(category))
}
