//! Defines the endpoint for recording a repayment against a loan.

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
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    borrower::{
        BorrowerId, get_borrower, ledger, payment::insert_payment, update_borrower,
    },
    endpoints::{self, format_endpoint},
};

/// The state needed to record a repayment.
#[derive(Debug, Clone)]
pub struct RepaymentState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RepaymentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording a repayment.
#[derive(Debug, Deserialize)]
pub struct RepaymentForm {
    /// The amount paid, in dollars.
    pub amount: f64,
}

/// A route handler that records a repayment and redirects back to the
/// borrower's statement.
///
/// The borrower update and the payment history entry are committed in a
/// single transaction so the repaid amount and the history can never
/// disagree.
pub async fn record_repayment_endpoint(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<RepaymentState>,
    Form(form): Form<RepaymentForm>,
) -> Response {
    let mut connection = match state.db_connection.lock() {
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

    let (updated, new_payment) =
        match ledger::record_repayment(&borrower, form.amount, OffsetDateTime::now_utc()) {
            Ok(result) => result,
            Err(error) => return error.into_alert_response(),
        };

    let result = (|| -> Result<(), Error> {
        let transaction = connection.transaction()?;
        update_borrower(&updated, &transaction)?;
        insert_payment(borrower_id, new_payment.date, new_payment.amount, &transaction)?;
        transaction.commit()?;
        Ok(())
    })();

    match result {
        Ok(()) => (
            HxRedirect(format_endpoint(endpoints::STATEMENT_VIEW, borrower_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while recording a repayment for borrower \
                {borrower_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
