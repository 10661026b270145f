//! Database operations for categories.

use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryPurpose},
    description::Description,
    error::is_foreign_key_failure,
};

/// Initialize the category table.
///
/// `description_key` holds the lower case description so that the database
/// rejects descriptions that only differ by case.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            description_key TEXT NOT NULL UNIQUE,
            purpose TEXT NOT NULL CHECK (purpose IN ('Despesa', 'Receita', 'Ambas'))
        );

        CREATE INDEX IF NOT EXISTS idx_category_description ON category(description);",
    )?;

    Ok(())
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryDescription] if another category has the same description ignoring case,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    description: Description,
    purpose: CategoryPurpose,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (description, description_key, purpose) VALUES (?1, ?2, ?3)",
            (description.as_ref(), description.key(), purpose.as_str()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("category.description_key") =>
            {
                Error::DuplicateCategoryDescription(description.to_string())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        description,
        purpose,
    })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, description, purpose FROM category WHERE id = :id")?
        .query_row(&[(":id", &id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve a single category by ID, or `None` if there is no such category.
pub fn find_category(id: CategoryId, connection: &Connection) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, description, purpose FROM category WHERE id = :id")?
        .query_row(&[(":id", &id)], map_category_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered by description, then ID.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, description, purpose FROM category ORDER BY description ASC, id ASC")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid category,
/// - [Error::CategoryInUse] if a transaction still refers to the category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [id])
        .map_err(|error| {
            if is_foreign_key_failure(&error) {
                // The count is only for the message, the delete has already been refused.
                let count = count_category_references(id, connection).unwrap_or(1);
                Error::CategoryInUse(count)
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Whether a category already uses `description`, ignoring case.
pub fn description_exists(description: &Description, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE description_key = ?1)",
            [description.key()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Count the transactions that refer to the category `id`.
pub fn count_category_references(id: CategoryId, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE category_id = ?1",
            [id],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_description: String = row.get(1)?;
    let raw_purpose: String = row.get(2)?;

    let purpose = CategoryPurpose::from_str(&raw_purpose).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, error.into())
    })?;

    Ok(Category {
        id,
        description: Description::new_unchecked(&raw_description),
        purpose,
    })
}
