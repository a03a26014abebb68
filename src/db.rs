//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{
    Error,
    borrower::{create_borrower_table, create_payment_table},
    user::create_user_table,
};

/// Create the tables for the application's domain models.
///
/// This function is idempotent: tables that already exist are left untouched.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // The payment table references the borrower table and relies on
    // ON DELETE CASCADE to remove a borrower's history with the borrower.
    connection.execute("PRAGMA foreign_keys = ON;", ())?;

    create_user_table(connection)?;
    create_borrower_table(connection)?;
    create_payment_table(connection)?;

    Ok(())
}
