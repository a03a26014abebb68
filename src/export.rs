//! CSV exports of the borrower list and individual loan statements.
//!
//! The CSV generation itself is kept in pure functions so it can be tested
//! without going through the HTTP layer; the route handlers fetch the data
//! and attach the download headers.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::macros::format_description;

use crate::{
    AppState, Error,
    borrower::{
        Borrower, BorrowerId, BorrowerListQuery, filter_borrowers, get_all_borrowers, get_borrower,
        payment::{Payment, get_payments_for_borrower},
    },
};

/// The state needed for serving CSV exports.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the borrower list as CSV, one row per borrower.
pub fn borrowers_csv(borrowers: &[Borrower]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "Name",
            "Phone",
            "Email",
            "Loan Amount",
            "Total Payable",
            "Repaid",
            "Outstanding",
            "Status",
            "Start Date",
            "Note",
        ])
        .map_err(|error| Error::ExportError(error.to_string()))?;

    for borrower in borrowers {
        writer
            .write_record([
                borrower.name.as_str(),
                borrower.phone.as_str(),
                borrower.email.as_str(),
                &format!("{:.2}", borrower.loan_amount),
                &format!("{:.2}", borrower.total_payable),
                &format!("{:.2}", borrower.repaid_amount),
                &format!("{:.2}", borrower.total_payable - borrower.repaid_amount),
                borrower.status.as_str(),
                &borrower.start_date.to_string(),
                borrower.note.as_str(),
            ])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    finish_csv(writer)
}

/// Renders a borrower's loan statement as CSV: a key/value summary block
/// followed by the payment history.
pub fn statement_csv(borrower: &Borrower, payments: &[Payment]) -> Result<String, Error> {
    let date_format = format_description!("[year]-[month]-[day] [hour]:[minute]");

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    let outstanding = borrower.total_payable - borrower.repaid_amount;
    let summary_rows = [
        ("Name", borrower.name.clone()),
        ("Phone", borrower.phone.clone()),
        ("Email", borrower.email.clone()),
        ("Status", borrower.status.to_string()),
        ("Start Date", borrower.start_date.to_string()),
        ("Loan Amount", format!("{:.2}", borrower.loan_amount)),
        ("Total Payable", format!("{:.2}", borrower.total_payable)),
        ("Repaid", format!("{:.2}", borrower.repaid_amount)),
        ("Outstanding", format!("{outstanding:.2}")),
        ("Note", borrower.note.clone()),
    ];

    for (key, value) in summary_rows {
        writer
            .write_record([key, value.as_str()])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    // An empty record writes just a terminator, separating the two blocks.
    writer
        .write_record(None::<&[u8]>)
        .map_err(|error| Error::ExportError(error.to_string()))?;

    writer
        .write_record(["Payment Date", "Amount Paid"])
        .map_err(|error| Error::ExportError(error.to_string()))?;

    for payment in payments {
        let date = payment
            .date
            .format(&date_format)
            .map_err(|error| Error::ExportError(error.to_string()))?;

        writer
            .write_record([date.as_str(), &format!("{:.2}", payment.amount)])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    finish_csv(writer)
}

/// Extracts the written CSV bytes as a UTF-8 string.
fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::ExportError(error.to_string()))
}

/// A route handler that downloads the borrower list as a CSV file.
///
/// The same search and status filters as the borrowers page apply, so the
/// export matches what the user is currently looking at.
pub async fn get_borrowers_export(
    Query(query): Query<BorrowerListQuery>,
    State(state): State<ExportState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let borrowers = get_all_borrowers(&connection)
        .inspect_err(|error| tracing::error!("could not get borrowers: {error}"))?;
    let borrowers = filter_borrowers(borrowers, query.search_text(), query.status_filter());

    let csv = borrowers_csv(&borrowers)
        .inspect_err(|error| tracing::error!("could not render borrowers CSV: {error}"))?;

    Ok(csv_download_response("borrowers.csv", csv))
}

/// A route handler that downloads a borrower's loan statement as a CSV file.
pub async fn get_statement_export(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<ExportState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let borrower = get_borrower(borrower_id, &connection)
        .inspect_err(|error| tracing::error!("could not get borrower {borrower_id}: {error}"))?;
    let payments = get_payments_for_borrower(borrower_id, &connection).inspect_err(|error| {
        tracing::error!("could not get payments for borrower {borrower_id}: {error}")
    })?;

    let csv = statement_csv(&borrower, &payments)
        .inspect_err(|error| tracing::error!("could not render statement CSV: {error}"))?;

    Ok(csv_download_response(
        &format!("statement-{borrower_id}.csv"),
        csv,
    ))
}

fn csv_download_response(file_name: &str, csv: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    )
        .into_response()
}



#[cfg(test)]
mod export_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        borrower::{
            BorrowerListQuery, LoanStatus, create_borrower_table, insert_borrower,
            ledger::NewBorrower,
            payment::{create_payment_table, insert_payment},
        },
        test_utils::{assert_content_type, assert_status_ok, get_header},
    };

    use super::{ExportState, get_borrowers_export, get_statement_export};

    fn get_test_state() -> ExportState {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_borrower_table(&connection).expect("Could not create borrower table");
        create_payment_table(&connection).expect("Could not create payment table");

        ExportState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn insert_test_borrower(state: &ExportState, name: &str, status: LoanStatus) -> i64 {
        let repaid_amount = match status {
            LoanStatus::Active => 0.0,
            LoanStatus::Completed => 1000.0,
        };

        insert_borrower(
            &NewBorrower {
                name: name.to_owned(),
                phone: String::new(),
                email: String::new(),
                loan_amount: 1000.0,
                total_payable: 1000.0,
                repaid_amount,
                status,
                start_date: date!(2025 - 03 - 14),
                note: String::new(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not insert borrower")
        .id
    }

    async fn response_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn borrowers_export_downloads_csv() {
        let state = get_test_state();
        insert_test_borrower(&state, "Jane Doe", LoanStatus::Active);

        let response = get_borrowers_export(Query(BorrowerListQuery::default()), State(state))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"borrowers.csv\""
        );

        let text = response_text(response).await;
        assert!(text.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn borrowers_export_applies_filters() {
        let state = get_test_state();
        insert_test_borrower(&state, "Jane Doe", LoanStatus::Active);
        insert_test_borrower(&state, "John Smith", LoanStatus::Completed);

        let query = BorrowerListQuery {
            search: None,
            status: Some("Completed".to_owned()),
        };

        let response = get_borrowers_export(Query(query), State(state))
            .await
            .unwrap();
        let text = response_text(response).await;

        assert!(text.contains("John Smith"));
        assert!(!text.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn statement_export_downloads_csv() {
        let state = get_test_state();
        let borrower_id = insert_test_borrower(&state, "Jane Doe", LoanStatus::Active);
        insert_payment(
            borrower_id,
            datetime!(2025-03-20 09:00 UTC),
            100.0,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not insert payment");

        let response = get_statement_export(Path(borrower_id), State(state))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv");
        assert_eq!(
            get_header(&response, "content-disposition"),
            format!("attachment; filename=\"statement-{borrower_id}.csv\"")
        );

        let text = response_text(response).await;
        assert!(text.contains("Name,Jane Doe"));
        assert!(text.contains("2025-03-20 09:00,100.00"));
    }

    #[tokio::test]
    async fn statement_export_for_missing_borrower_errors() {
        let state = get_test_state();

        let result = get_statement_export(Path(999), State(state)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }
}
