pub mod advance;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod membership;
pub mod password;
pub mod players;
pub mod standings;
mod transaction;

#[cfg(test)]
pub(crate) mod testing;

use common::GamePeriod;
use rust_decimal::Decimal;

use advance::Scoring;
use ledger::RefundPolicy;

/// Tunable rules of the game shared by every operation in this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRules {
    /// Budget a roster starts with when its player joins a league.
    pub starting_budget: Decimal,
    /// Amount credited back when an artist leaves a roster.
    pub refund_policy: RefundPolicy,
    /// Rates applied by the monthly advance.
    pub scoring: Scoring,
    /// Period the game clock starts at when it is first read.
    pub initial_period: GamePeriod,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_budget: Decimal::from(2000),
            refund_policy: RefundPolicy::default(),
            scoring: Scoring::default(),
            initial_period: GamePeriod::default(),
        }
    }
}
