use std::collections::HashMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Largest single row amount. Totals are stored as `DECIMAL(20,2)`, which
/// leaves room for a million maximal rows per employee and period.
pub const MAX_ROW_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PayGroup {
    pub id: String,
    pub rate: Decimal,
}

impl PayGroup {
    pub fn new(id: impl Into<String>, rate: Decimal) -> Self {
        Self {
            id: id.into(),
            rate,
        }
    }

    /// The two groups every deployment starts with.
    pub fn defaults() -> Vec<PayGroup> {
        vec![
            PayGroup::new("A", Decimal::new(2000, 2)),
            PayGroup::new("B", Decimal::new(3000, 2)),
        ]
    }
}

/// Hourly rates keyed by pay group id.
///
/// Loaded once at startup and shared read-only. A group that is not in the
/// table pays nothing: lookups fall back to a zero rate instead of failing.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn rate_for(&self, pay_group: &str) -> Decimal {
        match self.rates.get(pay_group) {
            Some(rate) => *rate,
            None => {
                tracing::warn!(pay_group, "No rate for pay group, using zero");
                Decimal::ZERO
            }
        }
    }

    /// `rate * hours` rounded to cents, half away from zero as the database
    /// rounds. `None` when `hours` has no decimal representation or the
    /// amount is beyond [`MAX_ROW_AMOUNT`].
    pub fn amount_for(&self, pay_group: &str, hours: f64) -> Option<Decimal> {
        let hours = Decimal::from_f64(hours)?;
        let amount = self
            .rate_for(pay_group)
            .checked_mul(hours)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        (amount.abs() <= MAX_ROW_AMOUNT).then_some(amount)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

impl FromIterator<PayGroup> for RateTable {
    fn from_iter<I: IntoIterator<Item = PayGroup>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().map(|g| (g.id, g.rate)).collect(),
        }
    }
}
