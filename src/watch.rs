// 9.0: liquidation watch list. user-added assets the dashboard keeps an eye on.
// informational only: none of this feeds exposure, margin or the alert table.

use crate::config::RiskProfile;
use crate::types::{percent_of, PositionId, Side, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualWatchAsset {
    pub id: PositionId,
    pub symbol: String,
    pub side: Side,
    #[serde(default)]
    pub entry_price: Option<Decimal>,
    #[serde(default)]
    pub liquidation_price: Option<Decimal>,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub added_at: Option<Timestamp>,
}

impl ManualWatchAsset {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, side: Side) -> Self {
        Self {
            id: PositionId::new(id),
            symbol: symbol.into(),
            side,
            entry_price: None,
            liquidation_price: None,
            current_price: None,
            added_at: Some(Timestamp::now()),
        }
    }

    pub fn with_prices(mut self, entry: Decimal, liquidation: Decimal, current: Decimal) -> Self {
        self.entry_price = Some(entry);
        self.liquidation_price = Some(liquidation);
        self.current_price = Some(current);
        self
    }

    /// Distance to liquidation as a percent of the current price.
    /// Negative once price has crossed the liquidation level.
    pub fn liquidation_buffer_pct(&self) -> Option<Decimal> {
        let current = self.current_price.filter(|p| *p > Decimal::ZERO)?;
        let liquidation = self.liquidation_price.filter(|p| *p > Decimal::ZERO)?;

        let distance = match self.side {
            Side::Long => current - liquidation,
            Side::Short => liquidation - current,
        };
        Some(percent_of(distance, current))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchStatus {
    pub id: PositionId,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub buffer_pct: Option<Decimal>,
    pub below_minimum: bool,
}

pub fn evaluate_watch_list(assets: &[ManualWatchAsset], profile: &RiskProfile) -> Vec<WatchStatus> {
    assets
        .iter()
        .map(|asset| {
            let buffer_pct = asset.liquidation_buffer_pct();
            WatchStatus {
                id: asset.id.clone(),
                symbol: asset.symbol.clone(),
                buffer_pct,
                below_minimum: buffer_pct.map_or(false, |b| b < profile.min_liquidation_buffer_pct),
            }
        })
        .collect()
}
