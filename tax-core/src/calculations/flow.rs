//! Flow graph construction.
//!
//! The topology is fixed:
//!
//! | Source          | Target          | Value                          |
//! |-----------------|-----------------|--------------------------------|
//! | Income          | Deductions      | deductions                     |
//! | Income          | Taxable Income  | total income - deductions      |
//! | Deductions      | Amount Kept     | deductions                     |
//! | Taxable Income  | each bracket    | income in bracket              |
//! | each bracket    | Total Tax Paid  | tax in bracket                 |
//! | each bracket    | Amount Kept     | income in bracket - its tax    |
//!
//! Deductions flow to `Amount Kept`: deducted income is retained, not lost.
//! Zero-valued edges are kept so the edge list has the same shape for every
//! input with the same number of brackets.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Bracket, allocate, build_flow};
//!
//! let brackets = vec![
//!     Bracket::bounded(dec!(22000), dec!(0.10)),
//!     Bracket::unbounded(dec!(0.12)),
//! ];
//! let allocation = allocate(dec!(30000), &brackets).unwrap();
//!
//! let graph = build_flow(dec!(42000), dec!(12000), dec!(30000), &allocation.results).unwrap();
//!
//! assert_eq!(graph.nodes.len(), 7);
//! assert_eq!(graph.amount_kept(), dec!(42000) - allocation.total_tax);
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::calculations::InvalidInput;
use crate::{BracketResult, FlowEdge, FlowGraph, FlowNode, FlowNodeKind};

/// Accumulates nodes and edges, keeping the label index in step.
#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    label_index: BTreeMap<String, usize>,
}

impl GraphBuilder {
    fn node(
        &mut self,
        kind: FlowNodeKind,
        label: String,
    ) -> Result<usize, InvalidInput> {
        if self.label_index.contains_key(&label) {
            return Err(InvalidInput::DuplicateNodeLabel(label));
        }
        let idx = self.nodes.len();
        self.label_index.insert(label.clone(), idx);
        self.nodes.push(FlowNode { label, kind });
        Ok(idx)
    }

    fn fixed(
        &mut self,
        kind: FlowNodeKind,
    ) -> Result<usize, InvalidInput> {
        let label = kind.fixed_label().unwrap_or_default().to_string();
        self.node(kind, label)
    }

    fn edge(
        &mut self,
        source: usize,
        target: usize,
        value: Decimal,
    ) {
        self.edges.push(FlowEdge {
            source,
            target,
            value,
        });
    }

    fn finish(self) -> FlowGraph {
        FlowGraph {
            nodes: self.nodes,
            edges: self.edges,
            label_index: self.label_index,
        }
    }
}

/// Checks that the amounts describe one consistent, conservable flow.
fn validate(
    total_income: Decimal,
    deductions: Decimal,
    taxable_income: Decimal,
    bracket_results: &[BracketResult],
) -> Result<(), InvalidInput> {
    if total_income < Decimal::ZERO {
        return Err(InvalidInput::NegativeIncome(total_income));
    }
    if deductions < Decimal::ZERO {
        return Err(InvalidInput::NegativeDeductions(deductions));
    }
    if deductions > total_income {
        return Err(InvalidInput::DeductionsExceedIncome {
            deductions,
            total_income,
        });
    }

    let expected = total_income - deductions;
    if taxable_income != expected {
        return Err(InvalidInput::TaxableIncomeMismatch {
            taxable_income,
            expected,
        });
    }

    for (index, r) in bracket_results.iter().enumerate() {
        if r.income_in_bracket < Decimal::ZERO
            || r.tax_in_bracket < Decimal::ZERO
            || r.tax_in_bracket > r.income_in_bracket
        {
            return Err(InvalidInput::InconsistentBracketResult { index });
        }
    }

    let allocated = bracket_results
        .iter()
        .try_fold(Decimal::ZERO, |total, r| total.checked_add(r.income_in_bracket))
        .ok_or(InvalidInput::AmountOverflow)?;
    if allocated != taxable_income {
        return Err(InvalidInput::AllocationMismatch {
            allocated,
            taxable_income,
        });
    }

    Ok(())
}

/// Builds the income flow graph for one calculation.
///
/// Nodes come out as `Income`, `Deductions`, `Taxable Income`, the brackets in
/// allocation order, `Total Tax Paid`, `Amount Kept`.
///
/// # Errors
///
/// Returns [`InvalidInput`] if:
/// - `total_income` or `deductions` is negative
/// - `deductions` exceeds `total_income`
/// - `taxable_income` is not `total_income - deductions`
/// - the bracket results do not sum to `taxable_income`, or one of them has
///   negative income or tax outside `[0, income_in_bracket]`
pub fn build_flow(
    total_income: Decimal,
    deductions: Decimal,
    taxable_income: Decimal,
    bracket_results: &[BracketResult],
) -> Result<FlowGraph, InvalidInput> {
    validate(total_income, deductions, taxable_income, bracket_results)?;

    let mut graph = GraphBuilder::default();

    let income = graph.fixed(FlowNodeKind::Income)?;
    let deducted = graph.fixed(FlowNodeKind::Deductions)?;
    let taxable = graph.fixed(FlowNodeKind::TaxableIncome)?;
    let brackets = bracket_results
        .iter()
        .map(|r| graph.node(FlowNodeKind::Bracket, r.label()))
        .collect::<Result<Vec<_>, _>>()?;
    let tax_paid = graph.fixed(FlowNodeKind::TotalTaxPaid)?;
    let kept = graph.fixed(FlowNodeKind::AmountKept)?;

    graph.edge(income, deducted, deductions);
    graph.edge(income, taxable, total_income - deductions);
    graph.edge(deducted, kept, deductions);

    for (&node, r) in brackets.iter().zip(bracket_results) {
        graph.edge(taxable, node, r.income_in_bracket);
    }
    for (&node, r) in brackets.iter().zip(bracket_results) {
        graph.edge(node, tax_paid, r.tax_in_bracket);
    }
    for (&node, r) in brackets.iter().zip(bracket_results) {
        graph.edge(node, kept, r.kept_in_bracket());
    }

    Ok(graph.finish())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Bracket, allocate};

    fn brackets() -> Vec<Bracket> {
        vec![
            Bracket::bounded(dec!(22000), dec!(0.10)),
            Bracket::bounded(dec!(89450), dec!(0.12)),
            Bracket::unbounded(dec!(0.22)),
        ]
    }

    fn flow_for(
        total_income: Decimal,
        deductions: Decimal,
    ) -> (FlowGraph, Decimal) {
        let taxable = total_income - deductions;
        let allocation = allocate(taxable, &brackets()).unwrap();
        let graph = build_flow(total_income, deductions, taxable, &allocation.results).unwrap();
        (graph, allocation.total_tax)
    }

    fn assert_conserved(graph: &FlowGraph) {
        for (idx, node) in graph.nodes.iter().enumerate() {
            if node.kind.is_sink() || node.kind == FlowNodeKind::Income {
                continue;
            }
            assert_eq!(
                graph.inflow(idx),
                graph.outflow(idx),
                "node '{}' does not conserve",
                node.label
            );
        }
    }

    #[test]
    fn node_order_is_fixed() {
        let (graph, _) = flow_for(dec!(130000), dec!(27700));

        let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Income",
                "Deductions",
                "Taxable Income",
                "Bracket 0-22000 (10%)",
                "Bracket 22000-89450 (12%)",
                "Bracket 89450+ (22%)",
                "Total Tax Paid",
                "Amount Kept",
            ]
        );
    }

    #[test]
    fn label_index_matches_node_positions() {
        let (graph, _) = flow_for(dec!(130000), dec!(27700));

        assert_eq!(graph.label_index.len(), graph.nodes.len());
        for (idx, node) in graph.nodes.iter().enumerate() {
            assert_eq!(graph.index_of(&node.label), Some(idx));
        }
    }

    #[test]
    fn edges_follow_topology() {
        let (graph, _) = flow_for(dec!(50000), dec!(20000));

        let edge = |s: &str, t: &str| graph.edge(s, t).expect("edge exists").value;
        assert_eq!(edge("Income", "Deductions"), dec!(20000));
        assert_eq!(edge("Income", "Taxable Income"), dec!(30000));
        assert_eq!(edge("Deductions", "Amount Kept"), dec!(20000));
        assert_eq!(
            edge("Taxable Income", "Bracket 0-22000 (10%)"),
            dec!(22000)
        );
        assert_eq!(
            edge("Taxable Income", "Bracket 22000-89450 (12%)"),
            dec!(8000)
        );
        assert_eq!(
            edge("Bracket 0-22000 (10%)", "Total Tax Paid"),
            dec!(2200)
        );
        assert_eq!(
            edge("Bracket 22000-89450 (12%)", "Total Tax Paid"),
            dec!(960)
        );
        assert_eq!(edge("Bracket 0-22000 (10%)", "Amount Kept"), dec!(19800));
        assert_eq!(
            edge("Bracket 22000-89450 (12%)", "Amount Kept"),
            dec!(7040)
        );
        assert_eq!(graph.edges.len(), 3 + 3 * 2);
    }

    #[test]
    fn edges_are_grouped_by_stage() {
        let (graph, _) = flow_for(dec!(130000), dec!(27700));
        let taxable = graph.index_of("Taxable Income").unwrap();
        let tax_paid = graph.index_of("Total Tax Paid").unwrap();

        let sources: Vec<_> = graph.edges[3..6].iter().map(|e| e.source).collect();
        let targets: Vec<_> = graph.edges[6..9].iter().map(|e| e.target).collect();
        assert_eq!(sources, vec![taxable; 3]);
        assert_eq!(targets, vec![tax_paid; 3]);
    }

    #[test]
    fn every_non_sink_conserves() {
        for (income, deductions) in [
            (dec!(0), dec!(0)),
            (dec!(15000), dec!(0)),
            (dec!(50000), dec!(20000)),
            (dec!(130000), dec!(27700)),
            (dec!(2500000.55), dec!(31000.10)),
        ] {
            let (graph, _) = flow_for(income, deductions);
            assert_conserved(&graph);
            let income_idx = graph.index_of("Income").unwrap();
            assert_eq!(graph.outflow(income_idx), income);
        }
    }

    #[test]
    fn amount_kept_is_income_minus_tax() {
        for (income, deductions) in [
            (dec!(30000), dec!(0)),
            (dec!(130000), dec!(27700)),
            (dec!(987654.32), dec!(12345.67)),
        ] {
            let (graph, total_tax) = flow_for(income, deductions);

            assert_eq!(graph.amount_kept(), income - total_tax);
            assert_eq!(graph.total_tax_paid(), total_tax);
        }
    }

    #[test]
    fn deductions_equal_to_income() {
        let (graph, total_tax) = flow_for(dec!(50000), dec!(50000));

        assert_eq!(
            graph.edge("Income", "Deductions").unwrap().value,
            dec!(50000)
        );
        assert_eq!(
            graph.edge("Income", "Taxable Income").unwrap().value,
            dec!(0)
        );
        assert_eq!(graph.bracket_nodes().count(), 0);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(total_tax, dec!(0));
        assert_eq!(graph.amount_kept(), dec!(50000));
    }

    #[test]
    fn deductions_exceeding_income_are_rejected() {
        assert_eq!(
            build_flow(dec!(40000), dec!(50000), dec!(0), &[]),
            Err(InvalidInput::DeductionsExceedIncome {
                deductions: dec!(50000),
                total_income: dec!(40000),
            })
        );
    }

    #[test]
    fn negative_income_is_rejected() {
        assert_eq!(
            build_flow(dec!(-1), dec!(0), dec!(0), &[]),
            Err(InvalidInput::NegativeIncome(dec!(-1)))
        );
    }

    #[test]
    fn negative_deductions_are_rejected() {
        assert_eq!(
            build_flow(dec!(100), dec!(-1), dec!(101), &[]),
            Err(InvalidInput::NegativeDeductions(dec!(-1)))
        );
    }

    #[test]
    fn taxable_income_must_match_income_minus_deductions() {
        assert_eq!(
            build_flow(dec!(100), dec!(10), dec!(80), &[]),
            Err(InvalidInput::TaxableIncomeMismatch {
                taxable_income: dec!(80),
                expected: dec!(90),
            })
        );
    }

    #[test]
    fn bracket_results_must_cover_taxable_income() {
        let allocation = allocate(dec!(30000), &brackets()).unwrap();

        assert_eq!(
            build_flow(dec!(40000), dec!(0), dec!(40000), &allocation.results),
            Err(InvalidInput::AllocationMismatch {
                allocated: dec!(30000),
                taxable_income: dec!(40000),
            })
        );
    }

    #[test]
    fn tax_above_bracket_income_is_rejected() {
        let results = vec![BracketResult {
            lower_bound: dec!(0),
            upper_limit: None,
            rate: dec!(0.10),
            income_in_bracket: dec!(100),
            tax_in_bracket: dec!(150),
        }];

        assert_eq!(
            build_flow(dec!(100), dec!(0), dec!(100), &results),
            Err(InvalidInput::InconsistentBracketResult { index: 0 })
        );
    }

    #[test]
    fn overflowing_bracket_results_are_rejected() {
        let huge = BracketResult {
            lower_bound: dec!(0),
            upper_limit: None,
            rate: dec!(0),
            income_in_bracket: Decimal::MAX,
            tax_in_bracket: dec!(0),
        };
        let one = BracketResult {
            lower_bound: dec!(1),
            income_in_bracket: dec!(1),
            ..huge.clone()
        };

        assert_eq!(
            build_flow(Decimal::MAX, dec!(0), Decimal::MAX, &[huge, one]),
            Err(InvalidInput::AmountOverflow)
        );
    }

    #[test]
    fn duplicate_bracket_labels_are_rejected() {
        let result = BracketResult {
            lower_bound: dec!(0),
            upper_limit: Some(dec!(100)),
            rate: dec!(0.10),
            income_in_bracket: dec!(50),
            tax_in_bracket: dec!(5),
        };

        assert_eq!(
            build_flow(dec!(100), dec!(0), dec!(100), &[result.clone(), result]),
            Err(InvalidInput::DuplicateNodeLabel(
                "Bracket 0-100 (10%)".to_string()
            ))
        );
    }

    #[test]
    fn sub_unit_brackets_get_distinct_labels() {
        let table = vec![
            Bracket::bounded(dec!(10), dec!(0.10)),
            Bracket::bounded(dec!(10.3), dec!(0.10)),
            Bracket::bounded(dec!(10.6), dec!(0.10)),
            Bracket::unbounded(dec!(0.20)),
        ];
        let allocation = allocate(dec!(100), &table).unwrap();

        let graph = build_flow(dec!(100), dec!(0), dec!(100), &allocation.results).unwrap();

        let labels: Vec<_> = graph.bracket_nodes().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Bracket 0-10 (10%)",
                "Bracket 10-10.3 (10%)",
                "Bracket 10.3-10.6 (10%)",
                "Bracket 10.6+ (20%)",
            ]
        );
        assert_eq!(graph.label_index.len(), graph.nodes.len());
    }

    #[test]
    fn build_flow_is_deterministic() {
        let (first, _) = flow_for(dec!(130000), dec!(27700));
        let (second, _) = flow_for(dec!(130000), dec!(27700));

        assert_eq!(first, second);
        assert_eq!(first.to_sankey(), second.to_sankey());
    }
}
