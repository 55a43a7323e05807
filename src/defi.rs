// 6.0: defi aggregates over active deposits. totals, count, largest single deposit.
// 6.1 per-protocol rollup and deposit-weighted apy for the yield card.

use crate::classify::ClassifiedPositions;
use crate::types::{percent_of, Usd};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolExposure {
    pub protocol: String,
    pub deposit_usd: Usd,
    pub position_count: usize,
    // share of total active deposits, unrounded
    #[serde(with = "rust_decimal::serde::float")]
    pub share_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiAggregates {
    pub total_deposits: Usd,
    pub active_count: usize,
    pub max_protocol_exposure: Usd,
    #[serde(with = "rust_decimal::serde::float")]
    pub weighted_apy_pct: Decimal,
    pub by_protocol: Vec<ProtocolExposure>,
}

pub fn compute_defi_aggregates(classified: &ClassifiedPositions<'_>) -> DefiAggregates {
    let total_deposits = classified.total_defi_deposits();
    let max_protocol_exposure = classified
        .defi
        .iter()
        .map(|p| p.deposit())
        .max()
        .unwrap_or_else(Usd::zero);

    // apy weighted by share of deposits, saturating at Decimal::MAX
    let weighted_apy_pct = if total_deposits.is_positive() {
        classified.defi.iter().fold(Decimal::ZERO, |acc, p| {
            let weight = p
                .deposit()
                .value()
                .checked_div(total_deposits.value())
                .unwrap_or(Decimal::ONE);
            let contribution = weight.checked_mul(p.apy()).unwrap_or(Decimal::MAX);
            acc.checked_add(contribution).unwrap_or(Decimal::MAX)
        })
    } else {
        Decimal::ZERO
    };

    DefiAggregates {
        total_deposits,
        active_count: classified.defi.len(),
        max_protocol_exposure,
        weighted_apy_pct,
        by_protocol: protocol_rollup(classified, total_deposits),
    }
}

// first-seen order, linear scan is fine at dashboard sizes
fn protocol_rollup(classified: &ClassifiedPositions<'_>, total: Usd) -> Vec<ProtocolExposure> {
    let mut rollup: Vec<ProtocolExposure> = Vec::new();
    for position in &classified.defi {
        match rollup.iter_mut().find(|r| r.protocol == position.protocol) {
            Some(entry) => {
                entry.deposit_usd = entry.deposit_usd.add(position.deposit());
                entry.position_count += 1;
            }
            None => rollup.push(ProtocolExposure {
                protocol: position.protocol.clone(),
                deposit_usd: position.deposit(),
                position_count: 1,
                share_pct: Decimal::ZERO,
            }),
        }
    }

    for entry in &mut rollup {
        entry.share_pct = percent_of(entry.deposit_usd.value(), total.value());
    }
    rollup
}
