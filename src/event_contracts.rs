// 6.2: prediction market aggregates over open event contracts.
// concentration here is the largest single stake against account value, not against total stake.

use crate::account::AccountState;
use crate::classify::ClassifiedPositions;
use crate::types::{percent_of, Usd};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAggregates {
    pub total_stake: Usd,
    pub position_count: usize,
    pub largest_stake: Usd,
    #[serde(with = "rust_decimal::serde::float")]
    pub concentration_percent: Decimal,
}

pub fn compute_event_aggregates(
    account: &AccountState,
    classified: &ClassifiedPositions<'_>,
) -> EventAggregates {
    let total_stake: Usd = classified.events.iter().map(|s| s.stake()).sum();
    let largest_stake = classified
        .events
        .iter()
        .map(|s| s.stake())
        .max()
        .unwrap_or_else(Usd::zero);

    // percent_of already returns zero when account value is not positive
    let concentration_percent = percent_of(largest_stake.value(), account.account_value().value());

    EventAggregates {
        total_stake,
        position_count: classified.events.len(),
        largest_stake,
        concentration_percent,
    }
}
