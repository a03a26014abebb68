//! Dashboard HTTP handlers and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    borrower::{Borrower, get_all_borrowers, payment::get_all_payments},
    dashboard::{
        cards::stat_cards_view,
        charts::{DashboardChart, charts_script, charts_view, collections_chart},
        stats::loan_stats,
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading borrowers and payments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the loan book.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let borrowers = get_all_borrowers(&connection)
        .inspect_err(|error| tracing::error!("could not get borrowers: {error}"))?;

    if borrowers.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let payments = get_all_payments(&connection)
        .inspect_err(|error| tracing::error!("could not get payments: {error}"))?;

    let charts = [DashboardChart {
        id: "collections-chart",
        options: collections_chart(&payments).to_string(),
    }];

    Ok(dashboard_view(nav_bar, &borrowers, &charts).into_response())
}

/// Renders the dashboard page when no borrowers exist yet.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_borrower_link = link(endpoints::NEW_BORROWER_VIEW, "adding a borrower");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Summaries and charts will show up here once you start
                lending. Get started by " (new_borrower_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with summary cards and charts.
fn dashboard_view(nav_bar: NavBar, borrowers: &[Borrower], charts: &[DashboardChart]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let stats = loan_stats(borrowers);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (stat_cards_view(&stats))

            (charts_view(charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}
