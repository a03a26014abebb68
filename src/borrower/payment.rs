//! The payment model and its database operations.
//!
//! Payments are the loan's audit trail: each repayment appends exactly one
//! row, rows are never updated, and they are only removed when the borrower
//! itself is deleted (via ON DELETE CASCADE).

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, borrower::BorrowerId};

pub type PaymentId = i64;

/// A single repayment made against a borrower's loan.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// The id for the payment.
    pub id: PaymentId,
    /// The borrower the payment was made against.
    pub borrower_id: BorrowerId,
    /// When the payment was recorded.
    pub date: OffsetDateTime,
    /// The amount paid, in dollars. Always positive.
    pub amount: f64,
}

pub fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment (
            id INTEGER PRIMARY KEY,
            borrower_id INTEGER NOT NULL REFERENCES borrower(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_payment_borrower ON payment(borrower_id);",
    )?;

    Ok(())
}

fn map_row_to_payment(row: &Row) -> Result<Payment, rusqlite::Error> {
    Ok(Payment {
        id: row.get(0)?,
        borrower_id: row.get(1)?,
        date: row.get(2)?,
        amount: row.get(3)?,
    })
}

/// Insert a payment and return it with its generated ID.
pub fn insert_payment(
    borrower_id: BorrowerId,
    date: OffsetDateTime,
    amount: f64,
    connection: &Connection,
) -> Result<Payment, Error> {
    connection.execute(
        "INSERT INTO payment (borrower_id, date, amount) VALUES (?1, ?2, ?3)",
        (borrower_id, date, amount),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Payment {
        id,
        borrower_id,
        date,
        amount,
    })
}

/// Retrieve a borrower's payments, newest first.
///
/// Payments are stored in insertion order; the ordering here is display-only.
pub fn get_payments_for_borrower(
    borrower_id: BorrowerId,
    connection: &Connection,
) -> Result<Vec<Payment>, Error> {
    connection
        .prepare(
            "SELECT id, borrower_id, date, amount FROM payment
            WHERE borrower_id = :borrower_id
            ORDER BY date DESC, id DESC;",
        )?
        .query_map(&[(":borrower_id", &borrower_id)], map_row_to_payment)?
        .map(|maybe_payment| maybe_payment.map_err(Error::from))
        .collect()
}

/// Retrieve every payment across all borrowers, oldest first.
pub fn get_all_payments(connection: &Connection) -> Result<Vec<Payment>, Error> {
    connection
        .prepare(
            "SELECT id, borrower_id, date, amount FROM payment
            ORDER BY date ASC, id ASC;",
        )?
        .query_map([], map_row_to_payment)?
        .map(|maybe_payment| maybe_payment.map_err(Error::from))
        .collect()
}
