use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// The stage a flow node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowNodeKind {
    Income,
    Deductions,
    TaxableIncome,
    Bracket,
    TotalTaxPaid,
    AmountKept,
}

impl FlowNodeKind {
    /// Fixed label for every kind except [`FlowNodeKind::Bracket`], whose
    /// label is derived from its bounds and rate.
    pub fn fixed_label(&self) -> Option<&'static str> {
        match self {
            Self::Income => Some("Income"),
            Self::Deductions => Some("Deductions"),
            Self::TaxableIncome => Some("Taxable Income"),
            Self::Bracket => None,
            Self::TotalTaxPaid => Some("Total Tax Paid"),
            Self::AmountKept => Some("Amount Kept"),
        }
    }

    /// Terminal nodes are exempt from conservation; money ends there.
    pub fn is_sink(&self) -> bool {
        matches!(self, Self::TotalTaxPaid | Self::AmountKept)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub label: String,
    pub kind: FlowNodeKind,
}

/// A directed, weighted link between two nodes, by index into
/// [`FlowGraph::nodes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: Decimal,
}

/// Nodes, edges and the `label -> index` mapping produced by one run of
/// [`crate::build_flow`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub label_index: BTreeMap<String, usize>,
}

impl FlowGraph {
    pub fn index_of(
        &self,
        label: &str,
    ) -> Option<usize> {
        self.label_index.get(label).copied()
    }

    /// Finds the edge between two labelled nodes.
    pub fn edge(
        &self,
        source: &str,
        target: &str,
    ) -> Option<&FlowEdge> {
        let (source, target) = (self.index_of(source)?, self.index_of(target)?);
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    pub fn inflow(
        &self,
        node: usize,
    ) -> Decimal {
        self.edges
            .iter()
            .filter(|e| e.target == node)
            .map(|e| e.value)
            .sum()
    }

    pub fn outflow(
        &self,
        node: usize,
    ) -> Decimal {
        self.edges
            .iter()
            .filter(|e| e.source == node)
            .map(|e| e.value)
            .sum()
    }

    /// Total flowing into the `Amount Kept` sink.
    pub fn amount_kept(&self) -> Decimal {
        self.sink_total(FlowNodeKind::AmountKept)
    }

    /// Total flowing into the `Total Tax Paid` sink.
    pub fn total_tax_paid(&self) -> Decimal {
        self.sink_total(FlowNodeKind::TotalTaxPaid)
    }

    fn sink_total(
        &self,
        kind: FlowNodeKind,
    ) -> Decimal {
        self.nodes
            .iter()
            .position(|n| n.kind == kind)
            .map(|idx| self.inflow(idx))
            .unwrap_or(Decimal::ZERO)
    }

    /// Bracket nodes in allocation order.
    pub fn bracket_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == FlowNodeKind::Bracket)
    }

    /// Flattens the graph into the parallel arrays a generic Sankey renderer
    /// consumes.
    pub fn to_sankey(&self) -> SankeyData {
        SankeyData {
            labels: self.nodes.iter().map(|n| n.label.clone()).collect(),
            sources: self.edges.iter().map(|e| e.source).collect(),
            targets: self.edges.iter().map(|e| e.target).collect(),
            values: self
                .edges
                .iter()
                .map(|e| e.value.to_f64().unwrap_or_default())
                .collect(),
        }
    }
}

/// Renderer-facing form of a [`FlowGraph`]: node labels plus three parallel
/// edge arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyData {
    pub labels: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub values: Vec<f64>,
}
