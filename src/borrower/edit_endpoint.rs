//! Defines the endpoint for updating a borrower's details.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    borrower::{
        BorrowerId, create_endpoint::BorrowerForm, get_borrower, ledger, update_borrower,
    },
    endpoints,
};

/// The state needed to update a borrower.
#[derive(Debug, Clone)]
pub struct EditBorrowerState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBorrowerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a borrower, redirects to the borrower list
/// on success.
///
/// The loan's repaid amount and payment history are untouched; the status is
/// rederived from the new principal.
pub async fn edit_borrower_endpoint(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<EditBorrowerState>,
    Form(form): Form<BorrowerForm>,
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
        Err(Error::NotFound) => return Error::UpdateMissingBorrower.into_alert_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve borrower {borrower_id}: {error}");
            return error.into_alert_response();
        }
    };

    let updated = match ledger::apply_edit(&borrower, form.into()) {
        Ok(updated) => updated,
        Err(error) => return error.into_alert_response(),
    };

    match update_borrower(&updated, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::BORROWERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating borrower {borrower_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
