//! Alert fragments for displaying success and error messages to users.
//!
//! Endpoints return these fragments to htmx, which swaps them into the
//! `#alert-container` element rendered by [crate::html::base].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};

const SUCCESS_ALERT_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg \
    bg-green-50 dark:bg-gray-800 dark:text-green-400 shadow";

const ERROR_ALERT_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg \
    bg-red-50 dark:bg-gray-800 dark:text-red-400 shadow";

/// A message to display to the user at the bottom of the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something worked and the summary says it all.
    SuccessSimple {
        /// A short summary of what succeeded.
        message: String,
    },
    /// Something went wrong.
    Error {
        /// A short summary of what went wrong.
        message: String,
        /// What the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as a dismissable HTML fragment.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_ALERT_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_ALERT_STYLE, message, details),
        };

        html! {
            div class=(style) role="alert"
            {
                div class="flex items-center justify-between gap-4"
                {
                    p class="font-medium" { (message) }

                    button
                        type="button"
                        class="font-bold cursor-pointer"
                        aria-label="Dismiss"
                        onclick="dismissAlert(this)"
                    {
                        (PreEscaped("&times;"))
                    }
                }

                @if !details.is_empty()
                {
                    p { (details) }
                }
            }

            // The container starts out hidden so stale alerts do not block taps.
            script { (PreEscaped("showAlertContainer();")) }
        }
    }

    /// Render the alert as an HTTP response with `status_code`.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}
