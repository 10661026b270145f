//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::transaction::FailureReason;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An empty string (or only whitespace) was used as a person's name.
    #[error("name cannot be empty")]
    EmptyPersonName,

    /// A person's name was longer than the maximum number of characters.
    #[error("name must be at most {0} characters long")]
    PersonNameTooLong(usize),

    /// A person's age was outside of the accepted range.
    #[error("age must be between 0 and 150, got {0}")]
    InvalidAge(i64),

    /// Another person already uses this name, ignoring case.
    #[error("a person named \"{0}\" already exists")]
    DuplicatePersonName(String),

    /// An empty string (or only whitespace) was used as a description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A description was longer than the maximum number of characters.
    #[error("description must be at most {0} characters long")]
    DescriptionTooLong(usize),

    /// Another category already uses this description, ignoring case.
    #[error("a category described as \"{0}\" already exists")]
    DuplicateCategoryDescription(String),

    /// The category purpose is not one of the known purposes.
    #[error("\"{0}\" is not a valid category purpose, expected Despesa, Receita or Ambas")]
    InvalidPurpose(String),

    /// The transaction type is not one of the known types.
    #[error("\"{0}\" is not a valid transaction type, expected Despesa or Receita")]
    InvalidTransactionType(String),

    /// A transaction amount was zero or negative.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// A transaction amount had more than two digits after the decimal point.
    #[error("amount must have at most two decimal places, got {0}")]
    TooManyDecimalPlaces(Decimal),

    /// A transaction amount does not fit in the stored precision.
    #[error("amount {0} is larger than the largest amount that can be stored")]
    AmountTooLarge(Decimal),

    /// The transaction breaks one or more business rules.
    ///
    /// All of the broken rules are listed, in the order they are checked.
    #[error("the transaction breaks {} business rule(s)", .0.len())]
    InvalidTransaction(Vec<FailureReason>),

    /// The category still has transactions and cannot be deleted.
    #[error("the category is used by {0} transaction(s) and cannot be deleted")]
    CategoryInUse(u32),

    /// A write was rejected by a database constraint.
    ///
    /// This usually means another request changed the data between the
    /// advisory checks and the write.
    #[error("the change conflicts with existing data: {0}")]
    IntegrityConflict(String),

    /// The request body or query string could not be decoded.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

/// Whether `error` is a foreign key constraint failure.
///
/// SQLite reports `ON DELETE RESTRICT` failures with the trigger extended code
/// rather than the foreign key one, so the message is checked as well.
pub fn is_foreign_key_failure(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, description) => {
            sql_error.code == rusqlite::ErrorCode::ConstraintViolation
                && (sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                    || description
                        .as_deref()
                        .is_some_and(|description| description.contains("FOREIGN KEY")))
        }
        _ => false,
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        if is_foreign_key_failure(&value) {
            tracing::warn!("a foreign key constraint rejected a write: {value}");
            return Error::IntegrityConflict(value.to_string());
        }

        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                description,
            ) => {
                let description = description.unwrap_or_else(|| "constraint failed".to_owned());
                tracing::warn!("a database constraint rejected a write: {description}");
                Error::IntegrityConflict(description)
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");
        Error::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");
        Error::MalformedRequest(rejection.to_string())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(rename = "mensagem")]
    message: String,
    #[serde(rename = "motivos", skip_serializing_if = "Option::is_none")]
    reasons: Option<Vec<FailureReason>>,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match self {
            Error::InvalidTransaction(reasons) => ErrorBody {
                message: "The transaction breaks one or more business rules.".to_owned(),
                reasons: Some(reasons),
            },
            // Internal details are for the server logs only.
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                ErrorBody {
                    message: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                    reasons: None,
                }
            }
            error => ErrorBody {
                message: error.to_string(),
                reasons: None,
            },
        };

        (status_code, Json(body)).into_response()
    }
}
