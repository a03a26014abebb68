//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{AuthState, auth_guard, auth_guard_hx},
    borrower::{
        create_borrower_endpoint, delete_borrower_endpoint, edit_borrower_endpoint,
        get_borrowers_page, get_create_borrower_page, get_edit_borrower_page, get_statement_page,
        record_repayment_endpoint, top_up_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    export::{get_borrowers_export, get_statement_export},
    forgot_password::get_forgot_password_page,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register_user::{get_register_page, register_user},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::BORROWERS_VIEW, get(get_borrowers_page))
        .route(endpoints::NEW_BORROWER_VIEW, get(get_create_borrower_page))
        .route(endpoints::EDIT_BORROWER_VIEW, get(get_edit_borrower_page))
        .route(endpoints::STATEMENT_VIEW, get(get_statement_page))
        .route(endpoints::BORROWERS_EXPORT, get(get_borrowers_export))
        .route(endpoints::STATEMENT_EXPORT, get(get_statement_export))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_guard,
        ));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth
    // redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::BORROWERS_API, post(create_borrower_endpoint))
            .route(
                endpoints::BORROWER,
                put(edit_borrower_endpoint).delete(delete_borrower_endpoint),
            )
            .route(endpoints::PAYMENTS_API, post(record_repayment_endpoint))
            .route(endpoints::TOP_UP_API, post(top_up_endpoint))
            .layer(middleware::from_fn_with_state(auth_state, auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
