//! Margin usage for the account header.
//!
//! Margin used is perp exposure as a rounded share of account value. It is not
//! clamped: an account running more perp notional than it is worth reports more
//! than 100% used and a negative available figure, which the alert engine reads
//! as a risk signal. The two always sum to 100.

use crate::account::AccountState;
use crate::types::{percent_of, round_percent};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginMetrics {
    #[serde(with = "rust_decimal::serde::float")]
    pub margin_used: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub available_margin: Decimal,
}

impl MarginMetrics {
    pub fn is_overextended(&self) -> bool {
        self.margin_used > dec!(100)
    }
}

pub fn compute_margin_metrics(account: &AccountState) -> MarginMetrics {
    let account_value = account.account_value();
    let margin_used = if account_value.is_positive() {
        round_percent(percent_of(account.perp_exposure().value(), account_value.value()))
    } else {
        Decimal::ZERO
    };

    MarginMetrics {
        margin_used,
        available_margin: dec!(100) - margin_used,
    }
}
