pub mod availability;
mod borrowing_service;
mod errors;

pub use borrowing_service::{
    ServiceDependencies, complete_return, compute_outstanding_fines, create_borrow,
};
pub use errors::{BorrowingError, Result};
