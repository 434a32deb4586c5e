pub mod calculations;
pub mod models;

pub use calculations::{
    Allocation, InvalidInput, TaxFlowReport, TaxSummary, allocate, build_flow,
};
pub use models::*;
