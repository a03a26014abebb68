//! Loanbook is a web app for tracking small-business loans: who borrowed,
//! how much, what has been repaid, and what is still outstanding.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod borrower;
mod dashboard;
mod db;
mod endpoints;
mod export;
mod forgot_password;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod password;
mod register_user;
mod routing;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserID, get_user_by_email, set_user_password};

use crate::{
    alert::Alert,
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email/password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to register a user already exists in the database.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A borrower was given an empty name.
    ///
    /// The name is the only required contact field, so an empty string is
    /// rejected before any persistence call.
    #[error("borrower name cannot be empty")]
    EmptyBorrowerName,

    /// A negative amount was used as a loan principal.
    #[error("loan amount cannot be negative")]
    NegativeLoanAmount,

    /// A repayment was recorded with a zero or negative amount.
    #[error("payment amount must be greater than zero")]
    NonPositivePaymentAmount,

    /// A top-up was requested with a zero or negative amount.
    #[error("top-up amount must be greater than zero")]
    NonPositiveTopUpAmount,

    /// A repayment was recorded against a loan that is already fully repaid.
    ///
    /// The UI hides the repayment form for completed loans, but the rule is
    /// enforced here at the data-model boundary as well.
    #[error("the loan is already fully repaid")]
    LoanAlreadyCompleted,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a borrower that does not exist
    #[error("tried to update a borrower that is not in the database")]
    UpdateMissingBorrower,

    /// Tried to delete a borrower that does not exist
    #[error("tried to delete a borrower that is not in the database")]
    DeleteMissingBorrower,

    /// A date time could not be formatted, parsed, or adjusted without overflow.
    #[error("a date time operation failed")]
    DateError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while writing a CSV export.
    #[error("could not write CSV export: {0}")]
    ExportError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptyBorrowerName => Alert::error(
                "Invalid borrower name",
                "The borrower name cannot be empty. Enter a name and try again.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NegativeLoanAmount => Alert::error(
                "Invalid loan amount",
                "The loan amount cannot be negative. Enter zero or a positive amount.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NonPositivePaymentAmount => Alert::error(
                "Invalid payment amount",
                "The payment amount must be greater than zero.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NonPositiveTopUpAmount => Alert::error(
                "Invalid top-up amount",
                "The top-up amount must be greater than zero.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::LoanAlreadyCompleted => Alert::error(
                "Loan already completed",
                "This loan is fully repaid. Top up the loan before recording further payments.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::UpdateMissingBorrower => Alert::error(
                "Could not update borrower",
                "The borrower could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingBorrower => Alert::error(
                "Could not delete borrower",
                "The borrower could not be found. \
                Try refreshing the page to see if the borrower has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::NotFound => Alert::error(
                "Not found",
                "The borrower could not be found. Try refreshing the page.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DuplicateEmail => Alert::error(
                "Email already registered",
                "A user with this email address already exists.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
