//! Request extractors that report malformed requests as JSON [Error]s.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// A JSON request body.
///
/// Same as [axum::Json], except that a body that cannot be decoded (e.g., a
/// missing field) is rejected with [Error::MalformedRequest].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// Query string parameters.
///
/// Same as [axum_extra::extract::Query], except that a query string that
/// cannot be decoded is rejected with [Error::MalformedRequest].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);
