//! Account state and the full snapshot the dashboard hands to the engine.
//!
//! `account_value` is authoritative. Pre-aggregated perp and event exposure come
//! from upstream and are read as-is (clamped at zero); the engine never tries to
//! reconcile them against the strategy list.

use crate::position::{DefiPosition, Strategy};
use crate::types::Usd;
use crate::watch::ManualWatchAsset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub symbol: String,
    #[serde(default)]
    pub balance_usd: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountState {
    pub account_value: Decimal,
    pub open_perp_exposure: Decimal,
    pub event_exposure_usd: Decimal,
    pub total_pnl_pct: Decimal,
    pub balances: Vec<Balance>,
}

impl AccountState {
    pub fn new(account_value: Decimal) -> Self {
        Self {
            account_value,
            ..Self::default()
        }
    }

    pub fn with_perp_exposure(mut self, exposure: Decimal) -> Self {
        self.open_perp_exposure = exposure;
        self
    }

    pub fn with_event_exposure(mut self, exposure: Decimal) -> Self {
        self.event_exposure_usd = exposure;
        self
    }

    pub fn with_balance(mut self, symbol: impl Into<String>, balance_usd: Decimal) -> Self {
        self.balances.push(Balance {
            symbol: symbol.into(),
            balance_usd,
        });
        self
    }

    pub fn account_value(&self) -> Usd {
        Usd::from_raw(Some(self.account_value))
    }

    pub fn perp_exposure(&self) -> Usd {
        Usd::from_raw(Some(self.open_perp_exposure))
    }

    pub fn event_exposure(&self) -> Usd {
        Usd::from_raw(Some(self.event_exposure_usd))
    }

    pub fn total_balances(&self) -> Usd {
        self.balances
            .iter()
            .map(|b| Usd::from_raw(Some(b.balance_usd)))
            .sum()
    }
}

/// Everything one analysis pass needs. Owned by the caller, only ever borrowed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSnapshot {
    pub account: AccountState,
    pub strategies: Vec<Strategy>,
    pub defi_positions: Vec<DefiPosition>,
    pub watch_list: Vec<ManualWatchAsset>,
}

impl PortfolioSnapshot {
    pub fn new(account: AccountState) -> Self {
        Self {
            account,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_defi(mut self, position: DefiPosition) -> Self {
        self.defi_positions.push(position);
        self
    }

    pub fn with_watch(mut self, asset: ManualWatchAsset) -> Self {
        self.watch_list.push(asset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_upstream_numbers_read_as_zero() {
        let account = AccountState::new(dec!(-10))
            .with_perp_exposure(dec!(-5))
            .with_event_exposure(dec!(300));

        assert!(account.account_value().is_zero());
        assert!(account.perp_exposure().is_zero());
        assert_eq!(account.event_exposure().value(), dec!(300));
    }

    #[test]
    fn balances_keep_order_and_sum() {
        let account = AccountState::new(dec!(1000))
            .with_balance("USDC", dec!(600))
            .with_balance("ETH", dec!(400))
            .with_balance("DUST", dec!(-1));

        let symbols: Vec<_> = account.balances.iter().map(|b| b.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USDC", "ETH", "DUST"]);
        assert_eq!(account.total_balances().value(), dec!(1000));
    }

    #[test]
    fn snapshot_missing_fields_default_to_empty() {
        let snapshot: PortfolioSnapshot =
            serde_json::from_str(r#"{"account": {"accountValue": 5000}}"#).unwrap();

        assert_eq!(snapshot.account.account_value, dec!(5000));
        assert_eq!(snapshot.account.open_perp_exposure, dec!(0));
        assert!(snapshot.strategies.is_empty());
        assert!(snapshot.defi_positions.is_empty());
        assert!(snapshot.watch_list.is_empty());
    }
}
