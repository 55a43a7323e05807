// 3.0: position classifier. splits the raw lists into open perps, open events, active defi.
// every other aggregator reads these views, so the open/active predicates live in exactly one place.
// 3.1 flattens the views into the unified open positions list the dashboard table renders.

use crate::position::{DefiPosition, DefiStatus, InstrumentType, Strategy, StrategyStatus};
use crate::types::{EventSide, PositionId, Side, Usd};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnclassifiedReason {
    UnsupportedInstrument,
    UnknownStatus,
}

/// A record the classifier could not place. Reported so data-entry gaps stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnclassifiedEntry {
    pub id: PositionId,
    pub reason: UnclassifiedReason,
}

#[derive(Debug, Clone, Default)]
pub struct ClassifiedPositions<'a> {
    pub perps: Vec<&'a Strategy>,
    pub events: Vec<&'a Strategy>,
    pub defi: Vec<&'a DefiPosition>,
    pub unclassified: Vec<UnclassifiedEntry>,
}

impl<'a> ClassifiedPositions<'a> {
    pub fn open_count(&self) -> usize {
        self.perps.len() + self.events.len() + self.defi.len()
    }

    pub fn total_defi_deposits(&self) -> Usd {
        self.defi.iter().map(|p| p.deposit()).sum()
    }
}

pub fn classify_positions<'a>(
    strategies: &'a [Strategy],
    defi_positions: &'a [DefiPosition],
) -> ClassifiedPositions<'a> {
    let mut classified = ClassifiedPositions::default();

    for strategy in strategies {
        if strategy.status == StrategyStatus::Unknown {
            warn!("strategy {} has an unrecognized status, excluded from exposure", strategy.id);
            classified.unclassified.push(UnclassifiedEntry {
                id: strategy.id.clone(),
                reason: UnclassifiedReason::UnknownStatus,
            });
            continue;
        }

        match strategy.instrument_type {
            InstrumentType::Perp if strategy.is_open() => classified.perps.push(strategy),
            InstrumentType::Event if strategy.is_open() => classified.events.push(strategy),
            InstrumentType::Perp | InstrumentType::Event => {}
            InstrumentType::Unsupported => {
                warn!("strategy {} has an unsupported instrument type, excluded from exposure", strategy.id);
                classified.unclassified.push(UnclassifiedEntry {
                    id: strategy.id.clone(),
                    reason: UnclassifiedReason::UnsupportedInstrument,
                });
            }
        }
    }

    for position in defi_positions {
        match position.status {
            DefiStatus::Active => classified.defi.push(position),
            DefiStatus::Proposed | DefiStatus::Closed => {}
            DefiStatus::Unknown => {
                warn!("defi position {} has an unrecognized status, excluded from exposure", position.id);
                classified.unclassified.push(UnclassifiedEntry {
                    id: position.id.clone(),
                    reason: UnclassifiedReason::UnknownStatus,
                });
            }
        }
    }

    classified
}

// 3.1: one row per open position, tagged by kind for the table view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OpenPosition {
    #[serde(rename_all = "camelCase")]
    Perp {
        id: PositionId,
        market: String,
        side: Option<Side>,
        notional_usd: Usd,
        #[serde(with = "rust_decimal::serde::float")]
        leverage: Decimal,
        #[serde(with = "rust_decimal::serde::float_option")]
        stop_loss: Option<Decimal>,
    },
    #[serde(rename_all = "camelCase")]
    Event {
        id: PositionId,
        label: String,
        side: Option<EventSide>,
        stake_usd: Usd,
    },
    #[serde(rename_all = "camelCase")]
    Defi {
        id: PositionId,
        protocol: String,
        asset: String,
        deposit_usd: Usd,
        #[serde(with = "rust_decimal::serde::float")]
        apy_pct: Decimal,
    },
}

impl OpenPosition {
    pub fn id(&self) -> &PositionId {
        match self {
            OpenPosition::Perp { id, .. } | OpenPosition::Event { id, .. } | OpenPosition::Defi { id, .. } => id,
        }
    }

    pub fn exposure(&self) -> Usd {
        match self {
            OpenPosition::Perp { notional_usd, .. } => *notional_usd,
            OpenPosition::Event { stake_usd, .. } => *stake_usd,
            OpenPosition::Defi { deposit_usd, .. } => *deposit_usd,
        }
    }
}

pub fn open_positions_from(classified: &ClassifiedPositions<'_>) -> Vec<OpenPosition> {
    let perps = classified.perps.iter().map(|s| OpenPosition::Perp {
        id: s.id.clone(),
        market: s.label().to_string(),
        side: s.side,
        notional_usd: s.notional(),
        leverage: s.leverage_value(),
        stop_loss: s.stop_loss,
    });
    let events = classified.events.iter().map(|s| OpenPosition::Event {
        id: s.id.clone(),
        label: s.label().to_string(),
        side: s.event_side,
        stake_usd: s.stake(),
    });
    let defi = classified.defi.iter().map(|p| OpenPosition::Defi {
        id: p.id.clone(),
        protocol: p.protocol.clone(),
        asset: p.asset.clone(),
        deposit_usd: p.deposit(),
        apy_pct: p.apy(),
    });

    perps.chain(events).chain(defi).collect()
}

pub fn compute_open_positions_list(
    strategies: &[Strategy],
    defi_positions: &[DefiPosition],
) -> Vec<OpenPosition> {
    open_positions_from(&classify_positions(strategies, defi_positions))
}
