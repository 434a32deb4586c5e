pub mod amount;
pub mod brackets;
pub mod income;

pub use amount::{ParseAmountError, parse_amount};
pub use brackets::{BracketRecord, BracketTableLoader, BracketTableLoaderError, default_brackets};
pub use income::{IncomeSourceLoader, IncomeSourceLoaderError, parse_inline_source};
