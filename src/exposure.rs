//! Exposure aggregation across the four top-level buckets.
//!
//! Perp and event exposure come pre-aggregated on the account, DeFi is summed
//! from the active deposits, and spot & cash is whatever account value is left
//! over (clamped at zero, the deficit is not reported). Each bucket's percentage
//! is rounded on its own, so the reported shares can drift from 100 by up to
//! half a point per non-zero bucket.
//!
//! Accounts with nothing to aggregate get the configured placeholder split so the
//! dashboard is never blank. Those rows are flagged `placeholder` and carry no USD.

use crate::account::AccountState;
use crate::classify::ClassifiedPositions;
use crate::config::PlaceholderSlice;
use crate::types::{percent_of, round_percent, Usd};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExposureBucket {
    SpotCash,
    Perps,
    Defi,
    Events,
}

impl ExposureBucket {
    /// Output order of the breakdown. Concentration ties resolve to the earlier bucket.
    pub const ALL: [ExposureBucket; 4] = [
        ExposureBucket::SpotCash,
        ExposureBucket::Perps,
        ExposureBucket::Defi,
        ExposureBucket::Events,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExposureBucket::SpotCash => "Spot & Cash",
            ExposureBucket::Perps => "Perps",
            ExposureBucket::Defi => "DeFi",
            ExposureBucket::Events => "Events",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.label() == label)
    }
}

/// USD per bucket before any percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureByType {
    pub spot_and_cash: Usd,
    pub perps: Usd,
    pub defi: Usd,
    pub events: Usd,
}

impl ExposureByType {
    pub fn amount(&self, bucket: ExposureBucket) -> Usd {
        match bucket {
            ExposureBucket::SpotCash => self.spot_and_cash,
            ExposureBucket::Perps => self.perps,
            ExposureBucket::Defi => self.defi,
            ExposureBucket::Events => self.events,
        }
    }

    pub fn total(&self) -> Usd {
        ExposureBucket::ALL.iter().map(|b| self.amount(*b)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureByAsset {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    pub amount_usd: Usd,
    /// Synthetic row from the zero-exposure fallback, not live data.
    pub placeholder: bool,
}

pub fn compute_exposure_by_type(
    account: &AccountState,
    classified: &ClassifiedPositions<'_>,
) -> ExposureByType {
    let defi = classified.total_defi_deposits();
    let events = account.event_exposure();
    let perps = account.perp_exposure();

    let committed = perps.add(defi).add(events);
    let spot_and_cash = account.account_value().sub(committed).clamp_non_negative();

    ExposureByType {
        spot_and_cash,
        perps,
        defi,
        events,
    }
}

pub fn compute_exposure_by_asset(
    account: &AccountState,
    classified: &ClassifiedPositions<'_>,
    placeholder: &[PlaceholderSlice],
) -> Vec<ExposureByAsset> {
    exposure_breakdown(&compute_exposure_by_type(account, classified), placeholder)
}

pub fn exposure_breakdown(
    by_type: &ExposureByType,
    placeholder: &[PlaceholderSlice],
) -> Vec<ExposureByAsset> {
    let total = by_type.total();
    if total.is_zero() {
        return placeholder
            .iter()
            .map(|slice| ExposureByAsset {
                label: slice.label.clone(),
                percentage: slice.percentage,
                amount_usd: Usd::zero(),
                placeholder: true,
            })
            .collect();
    }

    ExposureBucket::ALL
        .iter()
        .map(|bucket| (bucket, by_type.amount(*bucket)))
        .filter(|(_, amount)| amount.is_positive())
        .map(|(bucket, amount)| ExposureByAsset {
            label: bucket.label().to_string(),
            percentage: round_percent(percent_of(amount.value(), total.value())),
            amount_usd: amount,
            placeholder: false,
        })
        .collect()
}
