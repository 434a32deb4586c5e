use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income range taxed at one marginal rate.
///
/// The lower bound is implicit: it is the previous bracket's `upper_limit`,
/// or zero for the first bracket in a table. `upper_limit` is exclusive and
/// `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl Bracket {
    pub fn bounded(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_limit.is_none()
    }
}

/// The share of taxable income that landed in one bracket.
///
/// Only brackets that received income are represented; the allocator stops
/// emitting results once all income has been placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResult {
    pub lower_bound: Decimal,
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
    pub income_in_bracket: Decimal,
    pub tax_in_bracket: Decimal,
}

impl BracketResult {
    /// Income left over after this bracket's tax.
    pub fn kept_in_bracket(&self) -> Decimal {
        self.income_in_bracket - self.tax_in_bracket
    }

    /// Rate as a whole percentage without trailing zeros (`0.10` -> `10`,
    /// `0.125` -> `12.5`).
    pub fn rate_percent(&self) -> Decimal {
        (self.rate * Decimal::ONE_HUNDRED).normalize()
    }

    /// Node label for the flow graph, e.g. `Bracket 0-22000 (10%)` or
    /// `Bracket 693750+ (37%)` for the open-ended bracket.
    ///
    /// Bounds are printed exactly, without trailing zeros (`89450.50` ->
    /// `89450.5`). Lower bounds strictly increase across an allocation, so
    /// labels are unique within one result set.
    pub fn label(&self) -> String {
        let lower = self.lower_bound.normalize();
        match self.upper_limit {
            Some(upper) => format!(
                "Bracket {}-{} ({}%)",
                lower,
                upper.normalize(),
                self.rate_percent()
            ),
            None => format!("Bracket {}+ ({}%)", lower, self.rate_percent()),
        }
    }
}
