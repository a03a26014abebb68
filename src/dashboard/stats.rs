//! Pure aggregation functions for the dashboard.
//!
//! These take slices of borrowers and payments and produce the headline
//! numbers and monthly series that the cards and charts render. No I/O
//! happens here, which keeps the maths trivially testable.

use std::collections::HashMap;

use time::{Date, Month};

use crate::borrower::{Borrower, LoanStatus, payment::Payment};

/// Headline figures summarising the whole loan book.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct LoanStats {
    /// Number of borrowers in the book.
    pub total_borrowers: usize,
    /// Sum of loan principal across all borrowers.
    pub total_lent: f64,
    /// Sum of amounts repaid across all borrowers.
    pub total_repaid: f64,
    /// Sum of what is still owed across all borrowers.
    pub total_outstanding: f64,
    /// Number of loans still being repaid.
    pub active_count: usize,
    /// Number of fully repaid loans.
    pub completed_count: usize,
}

/// Calculates the headline figures for a set of borrowers.
///
/// An empty slice produces all zeros.
pub(super) fn loan_stats(borrowers: &[Borrower]) -> LoanStats {
    let mut stats = LoanStats {
        total_borrowers: borrowers.len(),
        ..LoanStats::default()
    };

    for borrower in borrowers {
        stats.total_lent += borrower.loan_amount;
        stats.total_repaid += borrower.repaid_amount;
        stats.total_outstanding += borrower.total_payable - borrower.repaid_amount;

        match borrower.status {
            LoanStatus::Active => stats.active_count += 1,
            LoanStatus::Completed => stats.completed_count += 1,
        }
    }

    stats
}

/// Sums payment amounts by calendar month.
///
/// # Returns
/// HashMap mapping each month (as a Date with day=1) to the total collected.
fn aggregate_by_month(payments: &[Payment]) -> HashMap<Date, f64> {
    let mut totals = HashMap::new();

    for payment in payments {
        let month = payment.date.date().replace_day(1).unwrap();
        *totals.entry(month).or_insert(0.0) += payment.amount;
    }

    totals
}

/// Formats a month date as a label like "Mar 2025".
fn format_month_label(date: &Date) -> String {
    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{} {}", month, date.year())
}

/// Produces chronologically sorted month labels and collection totals for
/// charting.
///
/// Months with no payments are simply absent; the chart plots only the
/// months that saw collections.
pub(super) fn monthly_collections(payments: &[Payment]) -> (Vec<String>, Vec<f64>) {
    let totals = aggregate_by_month(payments);

    let mut months: Vec<_> = totals.keys().copied().collect();
    months.sort();

    let labels = months.iter().map(format_month_label).collect();
    let values = months.iter().map(|month| totals[month]).collect();

    (labels, values)
}

#[cfg(test)]
mod loan_stats_tests {
    use time::macros::date;

    use crate::borrower::{Borrower, LoanStatus};

    use super::{LoanStats, loan_stats};

    fn create_test_borrower(
        loan_amount: f64,
        total_payable: f64,
        repaid_amount: f64,
        status: LoanStatus,
    ) -> Borrower {
        Borrower {
            id: 1,
            name: "Jane Doe".to_owned(),
            phone: String::new(),
            email: String::new(),
            loan_amount,
            total_payable,
            repaid_amount,
            status,
            start_date: date!(2025 - 03 - 14),
            note: String::new(),
        }
    }

    #[test]
    fn empty_book_produces_zeros() {
        assert_eq!(loan_stats(&[]), LoanStats::default());
    }

    #[test]
    fn sums_across_borrowers() {
        let borrowers = vec![
            create_test_borrower(1000.0, 1000.0, 250.0, LoanStatus::Active),
            create_test_borrower(500.0, 500.0, 500.0, LoanStatus::Completed),
        ];

        let stats = loan_stats(&borrowers);

        assert_eq!(stats.total_borrowers, 2);
        assert_eq!(stats.total_lent, 1500.0);
        assert_eq!(stats.total_repaid, 750.0);
        assert_eq!(stats.total_outstanding, 750.0);
        assert_eq!(stats.active_count, 1);
        assert_eq!(stats.completed_count, 1);
    }

    #[test]
    fn overpayment_produces_negative_outstanding() {
        let borrowers = vec![create_test_borrower(
            100.0,
            100.0,
            120.0,
            LoanStatus::Completed,
        )];

        let stats = loan_stats(&borrowers);

        assert_eq!(stats.total_outstanding, -20.0);
    }
}
