//! Worked scenarios against the public API.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::{
    Bracket, BracketResult, FlowNodeKind, IncomeSource, InvalidInput, TaxFlowReport, TaxInput,
    allocate, build_flow,
};

fn mfj_2023() -> Vec<Bracket> {
    vec![
        Bracket::bounded(dec!(22000), dec!(0.10)),
        Bracket::bounded(dec!(89450), dec!(0.12)),
        Bracket::bounded(dec!(190750), dec!(0.22)),
        Bracket::bounded(dec!(364200), dec!(0.24)),
        Bracket::bounded(dec!(462500), dec!(0.32)),
        Bracket::bounded(dec!(693750), dec!(0.35)),
        Bracket::unbounded(dec!(0.37)),
    ]
}

#[test]
fn zero_taxable_income_allocates_nothing() {
    let allocation = allocate(dec!(0), &mfj_2023()).unwrap();

    assert!(allocation.results.is_empty());
    assert_eq!(allocation.total_tax, dec!(0));
}

#[test]
fn thirty_thousand_across_two_brackets() {
    let brackets = vec![
        Bracket::bounded(dec!(22000), dec!(0.10)),
        Bracket::unbounded(dec!(0.12)),
    ];

    let allocation = allocate(dec!(30000), &brackets).unwrap();

    assert_eq!(
        allocation.results,
        vec![
            BracketResult {
                lower_bound: dec!(0),
                upper_limit: Some(dec!(22000)),
                rate: dec!(0.10),
                income_in_bracket: dec!(22000),
                tax_in_bracket: dec!(2200.0),
            },
            BracketResult {
                lower_bound: dec!(22000),
                upper_limit: None,
                rate: dec!(0.12),
                income_in_bracket: dec!(8000),
                tax_in_bracket: dec!(960.0),
            },
        ]
    );
    assert_eq!(allocation.total_tax, dec!(3160.0));
}

#[test]
fn fully_deducted_income_is_all_kept() {
    let graph = build_flow(dec!(50000), dec!(50000), dec!(0), &[]).unwrap();

    assert_eq!(
        graph.edge("Income", "Deductions").map(|e| e.value),
        Some(dec!(50000))
    );
    assert_eq!(
        graph.edge("Income", "Taxable Income").map(|e| e.value),
        Some(dec!(0))
    );
    assert_eq!(graph.bracket_nodes().count(), 0);
    assert_eq!(graph.amount_kept(), dec!(50000));
}

#[test]
fn deductions_above_income_fail() {
    let result = build_flow(dec!(50000), dec!(50001), dec!(0), &[]);

    assert!(matches!(
        result,
        Err(InvalidInput::DeductionsExceedIncome { .. })
    ));
}

#[test]
fn conservation_holds_across_incomes() {
    let brackets = mfj_2023();

    for income in [
        dec!(0),
        dec!(27700),
        dec!(60000),
        dec!(250000),
        dec!(700000),
        dec!(5000000),
    ] {
        let input = TaxInput::new(vec![IncomeSource::new("Wages", income)], dec!(27700));
        let report = TaxFlowReport::calculate(&input, &brackets).unwrap();
        let graph = &report.graph;

        for (idx, node) in graph.nodes.iter().enumerate() {
            match node.kind {
                FlowNodeKind::TotalTaxPaid | FlowNodeKind::AmountKept => {}
                FlowNodeKind::Income => assert_eq!(graph.outflow(idx), report.total_income),
                _ => assert_eq!(graph.inflow(idx), graph.outflow(idx), "{}", node.label),
            }
        }
        assert_eq!(graph.amount_kept(), report.total_income - report.total_tax());
        assert_eq!(
            report.allocation.allocated_income(),
            report.taxable_income
        );
        assert!(graph.edges.iter().all(|e| e.value >= Decimal::ZERO));
    }
}

#[test]
fn sankey_payload_indexes_labels() {
    let input = TaxInput::new(vec![IncomeSource::new("Wages", dec!(60000))], dec!(27700));
    let report = TaxFlowReport::calculate(&input, &mfj_2023()).unwrap();

    let sankey = report.graph.to_sankey();

    assert_eq!(sankey.sources.len(), sankey.targets.len());
    assert_eq!(sankey.sources.len(), sankey.values.len());
    assert_eq!(sankey.labels[0], "Income");
    assert_eq!(sankey.labels.last().map(String::as_str), Some("Amount Kept"));
    assert!(
        sankey
            .sources
            .iter()
            .chain(&sankey.targets)
            .all(|&i| i < sankey.labels.len())
    );

    let json = serde_json::to_value(&sankey).unwrap();
    assert_eq!(json["values"][0], serde_json::json!(27700.0));
}
