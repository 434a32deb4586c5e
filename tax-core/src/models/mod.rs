mod bracket;
mod flow;
mod income;

pub use bracket::{Bracket, BracketResult};
pub use flow::{FlowEdge, FlowGraph, FlowNode, FlowNodeKind, SankeyData};
pub use income::{IncomeSource, TaxInput};
