//! Endpoints for the income and expense reports.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    report::{CategoryTotals, PersonTotals, Report, Totals, aggregate_by_category, aggregate_by_person},
    repository::Repository,
    transaction::TransactionFilter,
};

/// The state needed for the reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The totals of each person, ordered by name, and the grand total.
pub async fn get_people_report_endpoint(
    State(state): State<ReportState>,
) -> Result<Json<Report<PersonTotals>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let people = connection.list_people()?;
    let transactions = connection.list_transactions(&TransactionFilter::all())?;

    Ok(Json(aggregate_by_person(&people, &transactions)))
}

/// The totals of each category, ordered by description, and the grand total.
pub async fn get_categories_report_endpoint(
    State(state): State<ReportState>,
) -> Result<Json<Report<CategoryTotals>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let categories = connection.list_categories()?;
    let transactions = connection.list_transactions(&TransactionFilter::all())?;

    Ok(Json(aggregate_by_category(&categories, &transactions)))
}

/// The totals over every transaction.
pub async fn get_statistics_endpoint(
    State(state): State<ReportState>,
) -> Result<Json<Totals>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transactions = connection.list_transactions(&TransactionFilter::all())?;

    Ok(Json(Totals::from_transactions(&transactions)))
}
