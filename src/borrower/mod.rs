//! Everything for tracking borrowers and their loans: the data models, the
//! pure ledger rules, and the pages and endpoints that operate on them.

mod borrowers_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
pub mod ledger;
pub mod payment;
mod repayment_endpoint;
mod statement_page;
mod topup_endpoint;

pub use borrowers_page::{BorrowerListQuery, get_borrowers_page};
pub use core::{
    Borrower, BorrowerId, LoanStatus, create_borrower_table, delete_borrower, filter_borrowers,
    get_all_borrowers, get_borrower, insert_borrower, map_row_to_borrower, update_borrower,
};
pub use create_endpoint::create_borrower_endpoint;
pub use create_page::get_create_borrower_page;
pub use delete_endpoint::delete_borrower_endpoint;
pub use edit_endpoint::edit_borrower_endpoint;
pub use edit_page::get_edit_borrower_page;
pub use payment::create_payment_table;
pub use repayment_endpoint::record_repayment_endpoint;
pub use statement_page::get_statement_page;
pub use topup_endpoint::top_up_endpoint;
