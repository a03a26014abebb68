//! Displays the borrower list with search, status filtering, and CSV export.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    borrower::{
        Borrower, LoanStatus,
        core::{filter_borrowers, get_all_borrowers},
    },
    endpoints::{self, format_endpoint},
    html::{
        ACTIVE_BADGE_STYLE, COMPLETED_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the borrower list page.
#[derive(Debug, Clone)]
pub struct BorrowerListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BorrowerListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The search and status filters carried by the borrower list and its CSV
/// export link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BorrowerListQuery {
    /// Free text matched against borrower names and phone numbers.
    pub search: Option<String>,
    /// "Active" or "Completed"; anything else means no status filter.
    pub status: Option<String>,
}

impl BorrowerListQuery {
    /// The search text, defaulting to the empty string.
    pub fn search_text(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    /// The status filter, if the query named a valid status.
    pub fn status_filter(&self) -> Option<LoanStatus> {
        match self.status.as_deref() {
            Some("Active") => Some(LoanStatus::Active),
            Some("Completed") => Some(LoanStatus::Completed),
            _ => None,
        }
    }

    /// The query string (including the leading '?') that reproduces this
    /// filter, or the empty string if there is nothing to carry.
    fn to_query_string(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("?{query}"),
            _ => String::new(),
        }
    }
}

/// The borrower data to display in the view.
#[derive(Debug, PartialEq)]
struct BorrowerTableRow {
    name: String,
    phone: String,
    loan_amount: f64,
    repaid_amount: f64,
    outstanding: f64,
    status: LoanStatus,
    statement_url: String,
    edit_url: String,
    delete_url: String,
}

impl From<&Borrower> for BorrowerTableRow {
    fn from(borrower: &Borrower) -> Self {
        Self {
            name: borrower.name.clone(),
            phone: borrower.phone.clone(),
            loan_amount: borrower.loan_amount,
            repaid_amount: borrower.repaid_amount,
            outstanding: borrower.total_payable - borrower.repaid_amount,
            status: borrower.status,
            statement_url: format_endpoint(endpoints::STATEMENT_VIEW, borrower.id),
            edit_url: format_endpoint(endpoints::EDIT_BORROWER_VIEW, borrower.id),
            delete_url: format_endpoint(endpoints::BORROWER, borrower.id),
        }
    }
}

pub(super) fn status_badge(status: LoanStatus) -> Markup {
    let style = match status {
        LoanStatus::Active => ACTIVE_BADGE_STYLE,
        LoanStatus::Completed => COMPLETED_BADGE_STYLE,
    };

    html!(span class=(style) { (status) })
}

fn filter_form(query: &BorrowerListQuery) -> Markup {
    let status = query.status.as_deref().unwrap_or("All");

    html!(
        form
            method="get"
            action=(endpoints::BORROWERS_VIEW)
            class="flex flex-wrap items-center gap-2"
        {
            input
                type="search"
                name="search"
                placeholder="Search name or phone"
                value=(query.search_text())
                class=(FORM_TEXT_INPUT_STYLE)
                style="max-width: 16rem";

            select
                name="status"
                onchange="this.form.submit()"
                class=(FORM_TEXT_INPUT_STYLE)
                style="max-width: 10rem"
            {
                @for option in ["All", "Active", "Completed"] {
                    option value=(option) selected[option == status] { (option) }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 hover:bg-blue-600 rounded text-white text-sm"
            {
                "Search"
            }
        }
    )
}

fn borrowers_view(borrowers: &[BorrowerTableRow], query: &BorrowerListQuery) -> Markup {
    let create_borrower_page_url = endpoints::NEW_BORROWER_VIEW;
    let export_url = format!(
        "{}{}",
        endpoints::BORROWERS_EXPORT,
        query.to_query_string()
    );
    let nav_bar = NavBar::new(endpoints::BORROWERS_VIEW).into_html();

    let table_row = |borrower: &BorrowerTableRow| {
        let action_links = edit_delete_action_links(
            &borrower.edit_url,
            &borrower.delete_url,
            &format!(
                "Are you sure you want to delete the borrower '{}'? \
                Their payment history will be deleted too. This cannot be undone.",
                borrower.name
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(borrower.statement_url) class=(LINK_STYLE) { (borrower.name) }
                }

                td class=(TABLE_CELL_STYLE) { (borrower.phone) }

                td class="px-6 py-4 text-right" { (format_currency(borrower.loan_amount)) }

                td class="px-6 py-4 text-right" { (format_currency(borrower.repaid_amount)) }

                td class="px-6 py-4 text-right" { (format_currency(borrower.outstanding)) }

                td class=(TABLE_CELL_STYLE) { (status_badge(borrower.status)) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(borrower.statement_url) class=(LINK_STYLE) { "Statement" }
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Borrowers" }

                    div class="flex gap-4"
                    {
                        a href=(export_url) class=(LINK_STYLE) { "Export CSV" }
                        a href=(create_borrower_page_url) class=(LINK_STYLE) { "Add Borrower" }
                    }
                }

                (filter_form(query))

                (borrowers_cards_view(borrowers, create_borrower_page_url))

                section class="hidden lg:block w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Phone" }
                                th scope="col" class="px-6 py-3 text-right" { "Loan" }
                                th scope="col" class="px-6 py-3 text-right" { "Repaid" }
                                th scope="col" class="px-6 py-3 text-right" { "Outstanding" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for borrower in borrowers {
                                (table_row(borrower))
                            }

                            @if borrowers.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No borrowers found. Add a borrower "
                                        a href=(create_borrower_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Borrowers", &[], &content)
}

fn borrowers_cards_view(borrowers: &[BorrowerTableRow], create_borrower_page_url: &str) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for borrower in borrowers {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-borrower-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div class="text-sm font-semibold text-gray-900 dark:text-white"
                        {
                            a href=(borrower.statement_url) class=(LINK_STYLE) { (borrower.name) }
                        }
                        (status_badge(borrower.status))
                    }

                    div class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                    { (borrower.phone) }

                    div class="mt-1 text-sm tabular-nums text-gray-900 dark:text-white"
                    {
                        (format_currency(borrower.outstanding)) " outstanding of "
                        (format_currency(borrower.loan_amount))
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        a href=(borrower.statement_url) class=(LINK_STYLE) { "Statement" }
                        (edit_delete_action_links(
                            &borrower.edit_url,
                            &borrower.delete_url,
                            &format!(
                                "Are you sure you want to delete the borrower '{}'? \
                                Their payment history will be deleted too. This cannot be undone.",
                                borrower.name
                            ),
                            "closest [data-borrower-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if borrowers.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No borrowers found. Add a borrower "
                    a href=(create_borrower_page_url) class=(LINK_STYLE)
                    {
                        "here"
                    }
                    "."
                }
            }
        }
    )
}

/// Renders the borrower list, filtered by the search and status query
/// parameters.
pub async fn get_borrowers_page(
    State(state): State<BorrowerListState>,
    Query(query): Query<BorrowerListQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let borrowers = get_all_borrowers(&connection)
        .inspect_err(|error| tracing::error!("could not get all borrowers: {error}"))?;
    let borrowers = filter_borrowers(borrowers, query.search_text(), query.status_filter());
    let rows: Vec<BorrowerTableRow> = borrowers.iter().map(BorrowerTableRow::from).collect();

    Ok(borrowers_view(&rows, &query).into_response())
}


#[cfg(test)]
mod get_borrowers_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        borrower::{
            LoanStatus, create_borrower_table, insert_borrower, ledger::NewBorrower,
        },
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{BorrowerListQuery, BorrowerListState, get_borrowers_page};

    fn get_test_state() -> BorrowerListState {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        create_borrower_table(&connection).expect("Could not create borrower table");

        BorrowerListState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn insert_test_borrower(state: &BorrowerListState, name: &str, status: LoanStatus) {
        let repaid_amount = match status {
            LoanStatus::Active => 0.0,
            LoanStatus::Completed => 1000.0,
        };

        insert_borrower(
            &NewBorrower {
                name: name.to_owned(),
                phone: "021 555 1234".to_owned(),
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
        .expect("Could not insert borrower");
    }

    #[tokio::test]
    async fn lists_all_borrowers() {
        let state = get_test_state();
        insert_test_borrower(&state, "Jane Doe", LoanStatus::Active);
        insert_test_borrower(&state, "John Smith", LoanStatus::Completed);

        let response = get_borrowers_page(
            State(state),
            Query(BorrowerListQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);
    }

    #[tokio::test]
    async fn status_filter_narrows_the_list() {
        let state = get_test_state();
        insert_test_borrower(&state, "Jane Doe", LoanStatus::Active);
        insert_test_borrower(&state, "John Smith", LoanStatus::Completed);

        let query = BorrowerListQuery {
            search: None,
            status: Some("Active".to_owned()),
        };

        let response = get_borrowers_page(State(state), Query(query)).await.unwrap();

        let html = parse_html_document(response).await;
        let row_selector = Selector::parse("tbody tr th a").unwrap();
        let names: Vec<String> = html
            .select(&row_selector)
            .map(|name| name.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(names, ["Jane Doe"]);
    }

    #[tokio::test]
    async fn search_narrows_the_list() {
        let state = get_test_state();
        insert_test_borrower(&state, "Jane Doe", LoanStatus::Active);
        insert_test_borrower(&state, "John Smith", LoanStatus::Active);

        let query = BorrowerListQuery {
            search: Some("smith".to_owned()),
            status: None,
        };

        let response = get_borrowers_page(State(state), Query(query)).await.unwrap();

        let html = parse_html_document(response).await;
        let row_selector = Selector::parse("tbody tr th a").unwrap();
        let names: Vec<String> = html
            .select(&row_selector)
            .map(|name| name.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(names, ["John Smith"]);
    }
}
