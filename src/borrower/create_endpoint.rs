//! Defines the endpoint for creating a new borrower.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    borrower::{insert_borrower, ledger},
    endpoints,
};

/// The state needed to create a borrower.
#[derive(Debug, Clone)]
pub struct CreateBorrowerState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBorrowerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a borrower.
#[derive(Debug, Clone, Deserialize)]
pub struct BorrowerForm {
    /// The borrower's name.
    pub name: String,
    /// The borrower's phone number, may be empty.
    #[serde(default)]
    pub phone: String,
    /// The borrower's email address, may be empty.
    #[serde(default)]
    pub email: String,
    /// The loan principal in dollars.
    pub loan_amount: f64,
    /// The date the loan was issued.
    pub start_date: Date,
    /// A free-text note, may be empty.
    #[serde(default)]
    pub note: String,
}

impl From<BorrowerForm> for ledger::BorrowerInput {
    fn from(form: BorrowerForm) -> Self {
        Self {
            name: form.name,
            phone: form.phone,
            email: form.email,
            loan_amount: form.loan_amount,
            start_date: form.start_date,
            note: form.note,
        }
    }
}

/// A route handler for creating a new borrower, redirects to the borrower
/// list on success.
///
/// Validation failures are returned as alert fragments before anything is
/// persisted.
pub async fn create_borrower_endpoint(
    State(state): State<CreateBorrowerState>,
    Form(form): Form<BorrowerForm>,
) -> Response {
    let new_borrower = match ledger::create(form.into()) {
        Ok(new_borrower) => new_borrower,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match insert_borrower(&new_borrower, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::BORROWERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a borrower: {error}");
            error.into_alert_response()
        }
    }
}
