//! Card components for the dashboard's headline figures.

use maud::{Markup, html};

use crate::{dashboard::stats::LoanStats, html::currency_rounded_with_tooltip};

/// Renders the grid of summary cards for the loan book.
pub(super) fn stat_cards_view(stats: &LoanStats) -> Markup {
    html! {
        section class="w-full mx-auto mt-4 mb-8" {
            div class="grid grid-cols-2 md:grid-cols-3 xl:grid-cols-6 gap-4" {
                (currency_card("Total Lent", stats.total_lent))
                (currency_card("Total Repaid", stats.total_repaid))
                (currency_card("Outstanding", stats.total_outstanding))
                (count_card("Borrowers", stats.total_borrowers))
                (count_card("Active Loans", stats.active_count))
                (count_card("Completed Loans", stats.completed_count))
            }
        }
    }
}

fn currency_card(title: &str, amount: f64) -> Markup {
    card(title, currency_rounded_with_tooltip(amount))
}

fn count_card(title: &str, count: usize) -> Markup {
    card(title, html!((count)))
}

fn card(title: &str, value: Markup) -> Markup {
    html! {
        div class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md" {
            h4 class="text-sm text-gray-600 dark:text-gray-400 mb-1" {
                (title)
            }
            div class="text-2xl font-bold" {
                (value)
            }
        }
    }
}
