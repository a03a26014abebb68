//! Defines the endpoint for topping up a loan with additional principal.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    borrower::{BorrowerId, get_borrower, ledger, update_borrower},
    endpoints::{self, format_endpoint},
};

/// The state needed to top up a loan.
#[derive(Debug, Clone)]
pub struct TopUpState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TopUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for topping up a loan.
#[derive(Debug, Deserialize)]
pub struct TopUpForm {
    /// The additional principal, in dollars.
    pub amount: f64,
}

/// A route handler that adds principal to a loan and redirects back to the
/// borrower's statement.
///
/// Top-ups do not appear in the payment history; only the loan terms change.
pub async fn top_up_endpoint(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<TopUpState>,
    Form(form): Form<TopUpForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let borrower = match get_borrower(borrower_id, &connection) {
        Ok(borrower) => borrower,
        Err(error) => {
            tracing::error!("Failed to retrieve borrower {borrower_id}: {error}");
            return error.into_alert_response();
        }
    };

    let updated = match ledger::top_up(&borrower, form.amount) {
        Ok(updated) => updated,
        Err(error) => return error.into_alert_response(),
    };

    match update_borrower(&updated, &connection) {
        Ok(()) => (
            HxRedirect(format_endpoint(endpoints::STATEMENT_VIEW, borrower_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while topping up borrower {borrower_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
