//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/borrowers/{borrower_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing all borrowers.
pub const BORROWERS_VIEW: &str = "/borrowers";
/// The page for adding a new borrower.
pub const NEW_BORROWER_VIEW: &str = "/borrowers/new";
/// The page for editing an existing borrower.
pub const EDIT_BORROWER_VIEW: &str = "/borrowers/{borrower_id}/edit";
/// The statement page for a single borrower.
pub const STATEMENT_VIEW: &str = "/borrowers/{borrower_id}/statement";
/// The CSV export of the (filtered) borrower list.
pub const BORROWERS_EXPORT: &str = "/borrowers/export.csv";
/// The CSV export of a single borrower's statement.
pub const STATEMENT_EXPORT: &str = "/borrowers/{borrower_id}/statement.csv";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create a borrower.
pub const BORROWERS_API: &str = "/api/borrowers";
/// The route to update or delete a borrower.
pub const BORROWER: &str = "/api/borrowers/{borrower_id}";
/// The route to record a repayment against a borrower's loan.
pub const PAYMENTS_API: &str = "/api/borrowers/{borrower_id}/payments";
/// The route to top up a borrower's loan.
pub const TOP_UP_API: &str = "/api/borrowers/{borrower_id}/top_up";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/borrowers/{borrower_id}/edit',
/// '{borrower_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::BORROWERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_BORROWER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_BORROWER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATEMENT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::BORROWERS_EXPORT);
        assert_endpoint_is_valid_uri(endpoints::STATEMENT_EXPORT);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::FORGOT_PASSWORD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::BORROWERS_API);
        assert_endpoint_is_valid_uri(endpoints::BORROWER);
        assert_endpoint_is_valid_uri(endpoints::PAYMENTS_API);
        assert_endpoint_is_valid_uri(endpoints::TOP_UP_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
