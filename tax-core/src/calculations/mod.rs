//! Bracket allocation and flow-graph construction.
//!
//! [`allocate`] splits taxable income across a progressive bracket table and
//! [`build_flow`] turns the result into a weighted graph of where the money
//! goes. [`TaxFlowReport`] chains the two for a complete [`crate::TaxInput`].

pub mod allocator;
pub mod common;
pub mod error;
pub mod flow;
pub mod report;

pub use allocator::{Allocation, allocate, validate_brackets};
pub use error::InvalidInput;
pub use flow::build_flow;
pub use report::{TaxFlowReport, TaxSummary};
