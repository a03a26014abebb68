//! Defines the route handler for the page for editing a borrower.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    borrower::{Borrower, BorrowerId, get_borrower},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        base, dollar_input_styles, error_view,
    },
    navigation::NavBar,
};

/// The state needed for the edit borrower page.
#[derive(Debug, Clone)]
pub struct EditBorrowerPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBorrowerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_borrower_view(borrower: &Borrower) -> Markup {
    let update_endpoint = format_endpoint(endpoints::BORROWER, borrower.id);
    let nav_bar = NavBar::new(endpoints::BORROWERS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Borrower" }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        name="name"
                        id="name"
                        type="text"
                        value=(borrower.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="phone" class=(FORM_LABEL_STYLE) { "Phone" }

                    input
                        name="phone"
                        id="phone"
                        type="tel"
                        value=(borrower.phone)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                    input
                        name="email"
                        id="email"
                        type="email"
                        value=(borrower.email)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="loan_amount" class=(FORM_LABEL_STYLE) { "Loan Amount" }

                    // w-full needed to ensure input takes the full width when prefilled with a value
                    div class="input-wrapper w-full"
                    {
                        input
                            name="loan_amount"
                            id="loan_amount"
                            type="number"
                            step="0.01"
                            min="0"
                            value=(borrower.loan_amount)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="start_date" class=(FORM_LABEL_STYLE) { "Start Date" }

                    input
                        name="start_date"
                        id="start_date"
                        type="date"
                        value=(borrower.start_date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="note" class=(FORM_LABEL_STYLE) { "Note" }

                    textarea
                        name="note"
                        id="note"
                        rows="3"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        (borrower.note)
                    }
                }

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Update Borrower"
                }
            }
        }
    };

    base("Edit Borrower", &[dollar_input_styles()], &content)
}

/// Renders the page for editing a borrower.
pub async fn get_edit_borrower_page(
    Path(borrower_id): Path<BorrowerId>,
    State(state): State<EditBorrowerPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_borrower(borrower_id, &connection) {
        Ok(borrower) => Ok(edit_borrower_view(&borrower).into_response()),
        Err(Error::NotFound) => Ok(error_view(
            "Borrower Not Found",
            "404",
            "This borrower does not exist.",
            "It may have been deleted. Head back to the borrower list.",
        )
        .into_response()),
        Err(error) => {
            tracing::error!("Failed to retrieve borrower {borrower_id}: {error}");
            Err(error)
        }
    }
}
