//! The pure bookkeeping rules for loans.
//!
//! Every mutating operation on a loan goes through one of the functions in
//! this module before anything is persisted: they validate the input,
//! compute the next borrower state, and derive the status through
//! [recompute_status]. None of them touch the database.

use time::{Date, OffsetDateTime};

use crate::{
    Error,
    borrower::{Borrower, LoanStatus},
};

/// A borrower that has not been persisted yet, so it has no ID.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBorrower {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub loan_amount: f64,
    pub total_payable: f64,
    pub repaid_amount: f64,
    pub status: LoanStatus,
    pub start_date: Date,
    pub note: String,
}

/// A repayment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub date: OffsetDateTime,
    pub amount: f64,
}

/// The user-editable fields of a borrower.
///
/// Used both when creating a borrower and when editing one, since the two
/// forms carry the same fields and the same validation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub loan_amount: f64,
    pub start_date: Date,
    pub note: String,
}

/// Derive a loan's status from its repayment state.
///
/// This is the single place the Active/Completed rule lives: a loan is
/// completed exactly when the repaid amount has reached the total payable.
pub fn recompute_status(repaid_amount: f64, total_payable: f64) -> LoanStatus {
    if repaid_amount >= total_payable {
        LoanStatus::Completed
    } else {
        LoanStatus::Active
    }
}

/// Build a new loan from user input.
///
/// The total payable starts equal to the principal (no interest) and nothing
/// has been repaid yet.
///
/// # Errors
/// Returns [Error::EmptyBorrowerName] if the name is empty or whitespace, and
/// [Error::NegativeLoanAmount] if the principal is negative.
pub fn create(input: BorrowerInput) -> Result<NewBorrower, Error> {
    let name = validate_name(&input.name)?;
    validate_loan_amount(input.loan_amount)?;

    Ok(NewBorrower {
        name,
        phone: input.phone.trim().to_owned(),
        email: input.email.trim().to_owned(),
        loan_amount: input.loan_amount,
        total_payable: input.loan_amount,
        repaid_amount: 0.0,
        status: recompute_status(0.0, input.loan_amount),
        start_date: input.start_date,
        note: input.note.trim().to_owned(),
    })
}

/// Apply a repayment of `amount` to `borrower`, stamped with `now`.
///
/// Returns the updated borrower together with the single payment entry to
/// append to the history. Overpayment is allowed and recorded as-is.
///
/// # Errors
/// Returns [Error::NonPositivePaymentAmount] if the amount is zero or
/// negative, and [Error::LoanAlreadyCompleted] if the loan is fully repaid.
pub fn record_repayment(
    borrower: &Borrower,
    amount: f64,
    now: OffsetDateTime,
) -> Result<(Borrower, NewPayment), Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositivePaymentAmount);
    }

    if borrower.status == LoanStatus::Completed {
        return Err(Error::LoanAlreadyCompleted);
    }

    let repaid_amount = borrower.repaid_amount + amount;

    let updated = Borrower {
        repaid_amount,
        status: recompute_status(repaid_amount, borrower.total_payable),
        ..borrower.clone()
    };

    Ok((updated, NewPayment { date: now, amount }))
}

/// Increase a loan's principal by `amount`.
///
/// The total payable grows by the same amount since top-ups carry no
/// interest. Topping up a completed loan reopens it; this is the only
/// Completed to Active transition. No history entry is produced.
///
/// # Errors
/// Returns [Error::NonPositiveTopUpAmount] if the amount is zero or negative.
pub fn top_up(borrower: &Borrower, amount: f64) -> Result<Borrower, Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveTopUpAmount);
    }

    let loan_amount = borrower.loan_amount + amount;
    let total_payable = borrower.total_payable + amount;

    Ok(Borrower {
        loan_amount,
        total_payable,
        status: recompute_status(borrower.repaid_amount, total_payable),
        ..borrower.clone()
    })
}

/// Replace a borrower's editable fields with `input`.
///
/// The total payable is recomputed from the new principal (the zero-interest
/// policy overwrites any independently stored value) and the status is
/// rederived against the existing repaid amount. The ID and the payment
/// history are untouched.
///
/// # Errors
/// Same validation as [create].
pub fn apply_edit(borrower: &Borrower, input: BorrowerInput) -> Result<Borrower, Error> {
    let name = validate_name(&input.name)?;
    validate_loan_amount(input.loan_amount)?;

    Ok(Borrower {
        id: borrower.id,
        name,
        phone: input.phone.trim().to_owned(),
        email: input.email.trim().to_owned(),
        loan_amount: input.loan_amount,
        total_payable: input.loan_amount,
        repaid_amount: borrower.repaid_amount,
        status: recompute_status(borrower.repaid_amount, input.loan_amount),
        start_date: input.start_date,
        note: input.note.trim().to_owned(),
    })
}

fn validate_name(name: &str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyBorrowerName);
    }

    Ok(name.to_owned())
}

fn validate_loan_amount(loan_amount: f64) -> Result<(), Error> {
    if loan_amount < 0.0 {
        return Err(Error::NegativeLoanAmount);
    }

    Ok(())
}


#[cfg(test)]
mod recompute_status_tests {
    use crate::borrower::LoanStatus;

    use super::recompute_status;

    #[test]
    fn active_while_under_payable() {
        assert_eq!(recompute_status(999.99, 1000.0), LoanStatus::Active);
    }

    #[test]
    fn completed_at_exactly_payable() {
        assert_eq!(recompute_status(1000.0, 1000.0), LoanStatus::Completed);
    }

    #[test]
    fn completed_when_overpaid() {
        assert_eq!(recompute_status(1200.0, 1000.0), LoanStatus::Completed);
    }
}

#[cfg(test)]
mod record_repayment_tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        borrower::{Borrower, LoanStatus},
    };

    use super::{NewPayment, record_repayment};

    fn test_borrower(repaid_amount: f64, status: LoanStatus) -> Borrower {
        Borrower {
            id: 1,
            name: "Jane Doe".to_owned(),
            phone: String::new(),
            email: String::new(),
            loan_amount: 1000.0,
            total_payable: 1000.0,
            repaid_amount,
            status,
            start_date: date!(2025 - 03 - 14),
            note: String::new(),
        }
    }

    #[test]
    fn repayment_adds_to_repaid_amount() {
        let borrower = test_borrower(100.0, LoanStatus::Active);
        let now = OffsetDateTime::now_utc();

        let (updated, payment) =
            record_repayment(&borrower, 250.0, now).expect("Could not record repayment");

        assert_eq!(updated.repaid_amount, 350.0);
        assert_eq!(updated.status, LoanStatus::Active);
        assert_eq!(
            payment,
            NewPayment {
                date: now,
                amount: 250.0
            }
        );
    }

    #[test]
    fn repayment_reaching_payable_completes_the_loan() {
        let borrower = test_borrower(0.0, LoanStatus::Active);

        let (updated, _) = record_repayment(&borrower, 1000.0, OffsetDateTime::now_utc())
            .expect("Could not record repayment");

        assert_eq!(updated.repaid_amount, 1000.0);
        assert_eq!(updated.status, LoanStatus::Completed);
    }

    #[test]
    fn overpayment_is_recorded_as_is() {
        let borrower = test_borrower(900.0, LoanStatus::Active);

        let (updated, payment) = record_repayment(&borrower, 250.0, OffsetDateTime::now_utc())
            .expect("Could not record repayment");

        assert_eq!(updated.repaid_amount, 1150.0);
        assert_eq!(updated.status, LoanStatus::Completed);
        assert_eq!(payment.amount, 250.0);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let borrower = test_borrower(0.0, LoanStatus::Active);
        let now = OffsetDateTime::now_utc();

        assert_eq!(
            record_repayment(&borrower, 0.0, now),
            Err(Error::NonPositivePaymentAmount)
        );
        assert_eq!(
            record_repayment(&borrower, -5.0, now),
            Err(Error::NonPositivePaymentAmount)
        );
    }

    #[test]
    fn rejects_completed_loan() {
        let borrower = test_borrower(1000.0, LoanStatus::Completed);

        let result = record_repayment(&borrower, 10.0, OffsetDateTime::now_utc());

        assert_eq!(result, Err(Error::LoanAlreadyCompleted));
    }
}
