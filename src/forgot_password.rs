//! The page describing how a forgotten password can be reset.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{endpoints, html::base};

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    let content = html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto max-w-md text-gray-900 dark:text-white"
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl mb-4"
            {
                "Forgot your password?"
            }

            p class="mb-4"
            {
                "Passwords can be reset by whoever runs the server. \
                Ask them to run the command below on the server and follow the prompts:"
            }

            pre class="w-full p-4 mb-4 rounded bg-gray-100 dark:bg-gray-800 text-sm overflow-x-auto"
            {
                code { "loanbook-reset-password --db-path <path to database>" }
            }

            p
            {
                a
                    href=(endpoints::LOG_IN_VIEW)
                    class="font-semibold text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                    "Back to log in"
                }
            }
        }
    };

    base("Forgot Password", &[], &content).into_response()
}
