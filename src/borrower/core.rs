//! The borrower model and its database operations.
//!
//! A borrower row carries both the loan terms (principal, total payable) and
//! the running repayment state (repaid amount, status). The repayment history
//! lives in the payment table, see [crate::borrower::payment].

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::Error;

pub type BorrowerId = i64;

/// Whether a loan still has money owing on it.
///
/// A loan is [LoanStatus::Completed] exactly when the repaid amount has
/// reached the total payable. Use [crate::borrower::ledger::recompute_status]
/// to derive the status, do not set it by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// The loan still has an outstanding amount.
    Active,
    /// The loan has been fully repaid.
    Completed,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for LoanStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for LoanStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Active" => Ok(LoanStatus::Active),
            "Completed" => Ok(LoanStatus::Completed),
            other => Err(FromSqlError::Other(
                format!("invalid loan status '{other}'").into(),
            )),
        }
    }
}

/// A person that the business has lent money to, along with their loan state.
#[derive(Debug, Clone, PartialEq)]
pub struct Borrower {
    /// The id for the borrower.
    pub id: BorrowerId,
    /// The borrower's name. The only required contact field.
    pub name: String,
    /// The borrower's phone number. Free text, may be empty.
    pub phone: String,
    /// The borrower's email address. Free text, may be empty.
    pub email: String,
    /// The cumulative principal lent out, including top-ups.
    pub loan_amount: f64,
    /// The total the borrower owes. Equals the principal under the
    /// zero-interest policy but is stored independently.
    pub total_payable: f64,
    /// How much the borrower has repaid so far. Never decreases.
    pub repaid_amount: f64,
    /// Whether the loan is still owing.
    pub status: LoanStatus,
    /// The date the loan was issued.
    pub start_date: Date,
    /// A free-text note about the borrower or the loan.
    pub note: String,
}

pub fn create_borrower_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS borrower (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            loan_amount REAL NOT NULL,
            total_payable REAL NOT NULL,
            repaid_amount REAL NOT NULL,
            status TEXT NOT NULL,
            start_date TEXT NOT NULL,
            note TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_borrower(row: &Row) -> Result<Borrower, rusqlite::Error> {
    Ok(Borrower {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        loan_amount: row.get(4)?,
        total_payable: row.get(5)?,
        repaid_amount: row.get(6)?,
        status: row.get(7)?,
        start_date: row.get(8)?,
        note: row.get(9)?,
    })
}

/// Retrieve a single borrower by ID.
///
/// # Errors
/// Returns [Error::NotFound] if no borrower has the given ID.
pub fn get_borrower(borrower_id: BorrowerId, connection: &Connection) -> Result<Borrower, Error> {
    connection
        .prepare(
            "SELECT id, name, phone, email, loan_amount, total_payable, repaid_amount,
                status, start_date, note
            FROM borrower WHERE id = :id;",
        )?
        .query_row(&[(":id", &borrower_id)], map_row_to_borrower)
        .map_err(|error| error.into())
}

/// Retrieve all borrowers ordered alphabetically by name.
pub fn get_all_borrowers(connection: &Connection) -> Result<Vec<Borrower>, Error> {
    connection
        .prepare(
            "SELECT id, name, phone, email, loan_amount, total_payable, repaid_amount,
                status, start_date, note
            FROM borrower ORDER BY name ASC;",
        )?
        .query_map([], map_row_to_borrower)?
        .map(|maybe_borrower| maybe_borrower.map_err(Error::from))
        .collect()
}

/// Insert a new borrower and return it with its generated ID.
pub fn insert_borrower(
    borrower: &crate::borrower::ledger::NewBorrower,
    connection: &Connection,
) -> Result<Borrower, Error> {
    connection.execute(
        "INSERT INTO borrower
            (name, phone, email, loan_amount, total_payable, repaid_amount,
             status, start_date, note)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            &borrower.name,
            &borrower.phone,
            &borrower.email,
            borrower.loan_amount,
            borrower.total_payable,
            borrower.repaid_amount,
            borrower.status,
            borrower.start_date,
            &borrower.note,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Borrower {
        id,
        name: borrower.name.clone(),
        phone: borrower.phone.clone(),
        email: borrower.email.clone(),
        loan_amount: borrower.loan_amount,
        total_payable: borrower.total_payable,
        repaid_amount: borrower.repaid_amount,
        status: borrower.status,
        start_date: borrower.start_date,
        note: borrower.note.clone(),
    })
}

/// Write every mutable field of `borrower` back to the database.
///
/// # Errors
/// Returns [Error::UpdateMissingBorrower] if the borrower does not exist.
pub fn update_borrower(borrower: &Borrower, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE borrower SET
            name = ?1, phone = ?2, email = ?3, loan_amount = ?4, total_payable = ?5,
            repaid_amount = ?6, status = ?7, start_date = ?8, note = ?9
        WHERE id = ?10",
        (
            &borrower.name,
            &borrower.phone,
            &borrower.email,
            borrower.loan_amount,
            borrower.total_payable,
            borrower.repaid_amount,
            borrower.status,
            borrower.start_date,
            &borrower.note,
            borrower.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBorrower);
    }

    Ok(())
}

/// Delete a borrower by ID. The payment table cascades, so the borrower's
/// payment history is removed in the same statement.
///
/// # Errors
/// Returns [Error::DeleteMissingBorrower] if the borrower does not exist.
pub fn delete_borrower(borrower_id: BorrowerId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM borrower WHERE id = ?1", [borrower_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBorrower);
    }

    Ok(())
}

/// Select the borrowers that match a search string and a status filter.
///
/// The search string matches case-insensitively against name and phone.
/// A `None` status keeps borrowers of either status.
pub fn filter_borrowers(
    borrowers: Vec<Borrower>,
    search: &str,
    status: Option<LoanStatus>,
) -> Vec<Borrower> {
    let search = search.trim().to_lowercase();

    borrowers
        .into_iter()
        .filter(|borrower| {
            search.is_empty()
                || borrower.name.to_lowercase().contains(&search)
                || borrower.phone.to_lowercase().contains(&search)
        })
        .filter(|borrower| status.is_none_or(|status| borrower.status == status))
        .collect()
}


#[cfg(test)]
mod borrower_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        borrower::{
            LoanStatus,
            core::{delete_borrower, get_all_borrowers, get_borrower, update_borrower},
            insert_borrower,
            ledger::NewBorrower,
        },
    };

    use super::create_borrower_table;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_borrower_table(&connection).expect("Could not create borrower table");
        connection
    }

    fn new_test_borrower(name: &str) -> NewBorrower {
        NewBorrower {
            name: name.to_owned(),
            phone: "021 555 1234".to_owned(),
            email: "jane@example.com".to_owned(),
            loan_amount: 1000.0,
            total_payable: 1000.0,
            repaid_amount: 0.0,
            status: LoanStatus::Active,
            start_date: date!(2025 - 03 - 14),
            note: String::new(),
        }
    }

    #[test]
    fn insert_borrower_succeeds() {
        let connection = get_test_connection();

        let borrower = insert_borrower(&new_test_borrower("Jane Doe"), &connection)
            .expect("Could not insert borrower");

        assert!(borrower.id > 0);
        assert_eq!(borrower.name, "Jane Doe");
        assert_eq!(borrower.status, LoanStatus::Active);
    }

    #[test]
    fn get_borrower_round_trips() {
        let connection = get_test_connection();
        let inserted = insert_borrower(&new_test_borrower("Jane Doe"), &connection)
            .expect("Could not insert borrower");

        let selected = get_borrower(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_borrower_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let selected = get_borrower(999, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_all_borrowers_sorts_by_name() {
        let connection = get_test_connection();
        insert_borrower(&new_test_borrower("Zane"), &connection).unwrap();
        insert_borrower(&new_test_borrower("Amy"), &connection).unwrap();

        let borrowers = get_all_borrowers(&connection).expect("Could not get all borrowers");

        let names: Vec<&str> = borrowers
            .iter()
            .map(|borrower| borrower.name.as_str())
            .collect();
        assert_eq!(names, ["Amy", "Zane"]);
    }

    #[test]
    fn update_borrower_persists_changes() {
        let connection = get_test_connection();
        let mut borrower = insert_borrower(&new_test_borrower("Jane Doe"), &connection).unwrap();

        borrower.repaid_amount = 250.0;
        borrower.note = "Paid first instalment".to_owned();
        update_borrower(&borrower, &connection).expect("Could not update borrower");

        let selected = get_borrower(borrower.id, &connection);
        assert_eq!(Ok(borrower), selected);
    }

    #[test]
    fn update_borrower_with_invalid_id_returns_error() {
        let connection = get_test_connection();
        let mut borrower = insert_borrower(&new_test_borrower("Jane Doe"), &connection).unwrap();
        borrower.id += 123;

        let result = update_borrower(&borrower, &connection);

        assert_eq!(result, Err(Error::UpdateMissingBorrower));
    }

    #[test]
    fn delete_borrower_removes_exactly_one_row() {
        let connection = get_test_connection();
        let keep = insert_borrower(&new_test_borrower("Keep Me"), &connection).unwrap();
        let remove = insert_borrower(&new_test_borrower("Remove Me"), &connection).unwrap();

        delete_borrower(remove.id, &connection).expect("Could not delete borrower");

        assert_eq!(get_borrower(remove.id, &connection), Err(Error::NotFound));
        assert_eq!(get_borrower(keep.id, &connection), Ok(keep));
    }

    #[test]
    fn delete_borrower_with_invalid_id_returns_error() {
        let connection = get_test_connection();

        let result = delete_borrower(999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingBorrower));
    }
}

#[cfg(test)]
mod filter_borrowers_tests {
    use time::macros::date;

    use crate::borrower::{Borrower, LoanStatus};

    use super::filter_borrowers;

    fn test_borrower(id: i64, name: &str, phone: &str, status: LoanStatus) -> Borrower {
        Borrower {
            id,
            name: name.to_owned(),
            phone: phone.to_owned(),
            email: String::new(),
            loan_amount: 1000.0,
            total_payable: 1000.0,
            repaid_amount: 0.0,
            status,
            start_date: date!(2025 - 01 - 01),
            note: String::new(),
        }
    }

    #[test]
    fn empty_search_and_no_status_keeps_everything() {
        let borrowers = vec![
            test_borrower(1, "Jane Doe", "021 555 1234", LoanStatus::Active),
            test_borrower(2, "John Smith", "027 555 9876", LoanStatus::Completed),
        ];

        let filtered = filter_borrowers(borrowers.clone(), "", None);

        assert_eq!(filtered, borrowers);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let borrowers = vec![
            test_borrower(1, "Jane Doe", "021 555 1234", LoanStatus::Active),
            test_borrower(2, "John Smith", "027 555 9876", LoanStatus::Active),
        ];

        let filtered = filter_borrowers(borrowers, "jane", None);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Jane Doe");
    }

    #[test]
    fn search_matches_phone() {
        let borrowers = vec![
            test_borrower(1, "Jane Doe", "021 555 1234", LoanStatus::Active),
            test_borrower(2, "John Smith", "027 555 9876", LoanStatus::Active),
        ];

        let filtered = filter_borrowers(borrowers, "9876", None);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "John Smith");
    }

    #[test]
    fn status_filter_keeps_matching_status_only() {
        let borrowers = vec![
            test_borrower(1, "Jane Doe", "021 555 1234", LoanStatus::Active),
            test_borrower(2, "John Smith", "027 555 9876", LoanStatus::Completed),
        ];

        let filtered = filter_borrowers(borrowers, "", Some(LoanStatus::Completed));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].status, LoanStatus::Completed);
    }

    #[test]
    fn search_and_status_compose() {
        let borrowers = vec![
            test_borrower(1, "Jane Doe", "021 555 1234", LoanStatus::Active),
            test_borrower(2, "Jane Smith", "027 555 9876", LoanStatus::Completed),
        ];

        let filtered = filter_borrowers(borrowers, "jane", Some(LoanStatus::Active));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }
}
