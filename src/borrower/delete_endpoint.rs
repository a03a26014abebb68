//! Defines the endpoint for deleting a borrower and their payment history.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    borrower::{BorrowerId, delete_borrower},
};

/// The state needed for deleting a borrower.
#[derive(Debug, Clone)]
pub struct DeleteBorrowerState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBorrowerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle borrower deletion. Returns a success alert or an error.
///
/// Deleting the borrower row cascades to the payment table, so the whole
/// repayment history goes with it.
pub async fn delete_borrower_endpoint(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<DeleteBorrowerState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_borrower(borrower_id, &connection) {
        Ok(_) => Alert::SuccessSimple {
            message: "Borrower deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingBorrower) => Error::DeleteMissingBorrower.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting borrower {borrower_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
