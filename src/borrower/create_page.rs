//! Defines the route handler for the page for adding a new borrower.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_offset,
};

pub(super) fn borrower_fields(default_date: Date) -> Markup {
    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Name"
            }

            input
                name="name"
                id="name"
                type="text"
                placeholder="Full name"
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="phone"
                class=(FORM_LABEL_STYLE)
            {
                "Phone"
            }

            input
                name="phone"
                id="phone"
                type="tel"
                placeholder="021 555 1234"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="email"
                class=(FORM_LABEL_STYLE)
            {
                "Email"
            }

            input
                name="email"
                id="email"
                type="email"
                placeholder="name@example.com"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="loan_amount"
                class=(FORM_LABEL_STYLE)
            {
                "Loan Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="loan_amount"
                    id="loan_amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="start_date"
                class=(FORM_LABEL_STYLE)
            {
                "Start Date"
            }

            input
                name="start_date"
                id="start_date"
                type="date"
                max=(default_date)
                required
                value=(default_date)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="note"
                class=(FORM_LABEL_STYLE)
            {
                "Note"
            }

            textarea
                name="note"
                id="note"
                rows="3"
                placeholder="Anything worth remembering about this loan"
                class=(FORM_TEXT_INPUT_STYLE)
            {}
        }
    }
}

fn create_borrower_view(default_date: Date) -> Markup {
    let create_borrower_route = endpoints::BORROWERS_API;
    let nav_bar = NavBar::new(endpoints::NEW_BORROWER_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_borrower_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Borrower" }

                (borrower_fields(default_date))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Add Borrower"
                }
            }
        }
    };

    base("Add Borrower", &[dollar_input_styles()], &content)
}

/// The state needed for the new borrower page.
#[derive(Debug, Clone)]
pub struct CreateBorrowerPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateBorrowerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for adding a borrower.
pub async fn get_create_borrower_page(
    State(state): State<CreateBorrowerPageState>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::DateError
    })?;

    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    Ok(create_borrower_view(today).into_response())
}
