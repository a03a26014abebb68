//! Displays a single borrower's statement: the loan summary, forms for
//! recording repayments and top-ups, and the full payment history.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    borrower::{
        Borrower, BorrowerId, LoanStatus, borrowers_page::status_badge, get_borrower,
        payment::{Payment, get_payments_for_borrower},
    },
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        dollar_input_styles, error_view, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the statement page.
#[derive(Debug, Clone)]
pub struct StatementPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatementPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

const PAYMENT_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

fn payment_date(date: OffsetDateTime) -> String {
    date.format(PAYMENT_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

fn summary_row(label: &str, value: Markup) -> Markup {
    html!(
        div class="flex justify-between gap-4 py-1"
        {
            dt class="text-gray-500 dark:text-gray-400" { (label) }
            dd class="font-medium text-right" { (value) }
        }
    )
}

fn summary_view(borrower: &Borrower) -> Markup {
    let outstanding = borrower.total_payable - borrower.repaid_amount;

    html!(
        section class="rounded border border-gray-200 bg-white p-4 shadow-sm dark:border-gray-700 dark:bg-gray-800"
        {
            header class="flex items-start justify-between gap-3 mb-2"
            {
                h1 class="text-xl font-bold" { (borrower.name) }
                (status_badge(borrower.status))
            }

            dl class="text-sm divide-y divide-gray-100 dark:divide-gray-700"
            {
                @if !borrower.phone.is_empty() {
                    (summary_row("Phone", html!((borrower.phone))))
                }

                @if !borrower.email.is_empty() {
                    (summary_row("Email", html!((borrower.email))))
                }

                (summary_row("Start Date", html!((borrower.start_date))))
                (summary_row("Loan Amount", html!((format_currency(borrower.loan_amount)))))
                (summary_row("Total Payable", html!((format_currency(borrower.total_payable)))))
                (summary_row("Repaid", html!((format_currency(borrower.repaid_amount)))))
                (summary_row("Outstanding", html!((format_currency(outstanding)))))
            }

            @if !borrower.note.is_empty() {
                p class="mt-3 text-sm text-gray-500 dark:text-gray-400" { (borrower.note) }
            }
        }
    )
}

fn amount_form(
    title: &str,
    submit_label: &str,
    endpoint: &str,
    input_id: &str,
) -> Markup {
    html!(
        form
            hx-post=(endpoint)
            hx-target-error="#alert-container"
            class="space-y-2"
        {
            h2 class="text-lg font-semibold" { (title) }

            div
            {
                label for=(input_id) class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id=(input_id)
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    )
}

fn payments_view(payments: &[Payment]) -> Markup {
    html!(
        section class="w-full overflow-x-auto"
        {
            h2 class="text-lg font-semibold mb-2" { "Payment History" }

            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Payment Date" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount Paid" }
                    }
                }

                tbody
                {
                    @for payment in payments {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                time datetime=(payment_date(payment.date))
                                {
                                    (payment_date(payment.date))
                                }
                            }

                            td class="px-6 py-4 text-right" { (format_currency(payment.amount)) }
                        }
                    }

                    @if payments.is_empty() {
                        tr
                        {
                            td
                                colspan="2"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No payments recorded yet."
                            }
                        }
                    }
                }
            }
        }
    )
}

fn statement_view(borrower: &Borrower, payments: &[Payment]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BORROWERS_VIEW).into_html();
    let repayment_endpoint = format_endpoint(endpoints::PAYMENTS_API, borrower.id);
    let top_up_endpoint = format_endpoint(endpoints::TOP_UP_API, borrower.id);
    let export_url = format_endpoint(endpoints::STATEMENT_EXPORT, borrower.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 lg:max-w-3xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    a href=(endpoints::BORROWERS_VIEW) class=(LINK_STYLE) { "Back to Borrowers" }
                    a href=(export_url) class=(LINK_STYLE) { "Export CSV" }
                }

                (summary_view(borrower))

                div class="grid grid-cols-1 md:grid-cols-2 gap-6"
                {
                    // A completed loan takes no further repayments until it
                    // is topped up, so the form is suppressed. The endpoint
                    // rejects stray requests either way.
                    @if borrower.status == LoanStatus::Active {
                        (amount_form(
                            "Record Repayment",
                            "Record Repayment",
                            &repayment_endpoint,
                            "repayment-amount",
                        ))
                    }

                    (amount_form("Top Up Loan", "Top Up", &top_up_endpoint, "top-up-amount"))
                }

                (payments_view(payments))
            }
        }
    );

    base("Statement", &[dollar_input_styles()], &content)
}

/// Renders a borrower's statement page.
pub async fn get_statement_page(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<StatementPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let borrower = match get_borrower(borrower_id, &connection) {
        Ok(borrower) => borrower,
        Err(Error::NotFound) => {
            return Ok(error_view(
                "Borrower Not Found",
                "404",
                "This borrower does not exist.",
                "It may have been deleted. Head back to the borrower list.",
            )
            .into_response());
        }
        Err(error) => {
            tracing::error!("Failed to retrieve borrower {borrower_id}: {error}");
            return Err(error);
        }
    };

    let payments = get_payments_for_borrower(borrower_id, &connection).inspect_err(|error| {
        tracing::error!("could not get payments for borrower {borrower_id}: {error}")
    })?;

    Ok(statement_view(&borrower, &payments).into_response())
}
