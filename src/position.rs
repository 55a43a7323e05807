// 2.0: raw position records as the execution and DeFi subsystems hand them over.
// fields mirror the dashboard store, so nearly everything is optional and read defensively.
// 2.1 has the strategy lifecycle (strict forward state machine) at the bottom.

use crate::types::{non_negative, EventSide, PositionId, Side, Usd};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Perp,
    Event,
    /// Anything the execution layer added after this crate was built.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Draft,
    Queued,
    Executing,
    Executed,
    Closed,
    #[serde(other)]
    Unknown,
}

impl StrategyStatus {
    fn rank(&self) -> Option<u8> {
        match self {
            StrategyStatus::Draft => Some(0),
            StrategyStatus::Queued => Some(1),
            StrategyStatus::Executing => Some(2),
            StrategyStatus::Executed => Some(3),
            StrategyStatus::Closed => Some(4),
            StrategyStatus::Unknown => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, StrategyStatus::Executing | StrategyStatus::Executed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StrategyStatus::Closed | StrategyStatus::Unknown)
    }

    /// Moves only forward. Skipping stages is allowed, going back is not.
    pub fn can_advance_to(&self, next: StrategyStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyStatus::Draft => "draft",
            StrategyStatus::Queued => "queued",
            StrategyStatus::Executing => "executing",
            StrategyStatus::Executed => "executed",
            StrategyStatus::Closed => "closed",
            StrategyStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A perp or event trade as drafted by chat and tracked through execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: PositionId,
    pub instrument_type: InstrumentType,
    pub status: StrategyStatus,
    /// Settled flag. An executed strategy keeps its status label once closed out.
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub event_side: Option<EventSide>,
    #[serde(default)]
    pub risk_percent: Option<Decimal>,
    #[serde(default)]
    pub notional_usd: Option<Decimal>,
    #[serde(default)]
    pub stake_usd: Option<Decimal>,
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub leverage: Option<Decimal>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub event_label: Option<String>,
}

impl Strategy {
    fn blank(id: impl Into<String>, instrument_type: InstrumentType) -> Self {
        Self {
            id: PositionId::new(id),
            instrument_type,
            status: StrategyStatus::Draft,
            is_closed: false,
            side: None,
            event_side: None,
            risk_percent: None,
            notional_usd: None,
            stake_usd: None,
            stop_loss: None,
            leverage: None,
            market: None,
            event_label: None,
        }
    }

    pub fn perp(id: impl Into<String>, market: impl Into<String>, side: Side, notional: Decimal) -> Self {
        let mut strategy = Self::blank(id, InstrumentType::Perp);
        strategy.market = Some(market.into());
        strategy.side = Some(side);
        strategy.notional_usd = Some(notional);
        strategy
    }

    pub fn event(id: impl Into<String>, label: impl Into<String>, side: EventSide, stake: Decimal) -> Self {
        let mut strategy = Self::blank(id, InstrumentType::Event);
        strategy.event_label = Some(label.into());
        strategy.event_side = Some(side);
        strategy.stake_usd = Some(stake);
        strategy
    }

    pub fn with_status(mut self, status: StrategyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_leverage(mut self, leverage: Decimal) -> Self {
        self.leverage = Some(leverage);
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_risk_percent(mut self, risk_percent: Decimal) -> Self {
        self.risk_percent = Some(risk_percent);
        self
    }

    pub fn settled(mut self) -> Self {
        self.is_closed = true;
        self
    }

    /// The one open predicate. Exposure, counts and alerts all go through here.
    pub fn is_open(&self) -> bool {
        self.status.is_live() && !self.is_closed
    }

    pub fn notional(&self) -> Usd {
        Usd::from_raw(self.notional_usd)
    }

    pub fn stake(&self) -> Usd {
        Usd::from_raw(self.stake_usd)
    }

    pub fn leverage_value(&self) -> Decimal {
        non_negative(self.leverage)
    }

    pub fn risk_percent_value(&self) -> Decimal {
        non_negative(self.risk_percent)
    }

    // missing, zero and negative stops all count as no stop
    pub fn has_stop_loss(&self) -> bool {
        non_negative(self.stop_loss) > Decimal::ZERO
    }

    pub fn label(&self) -> &str {
        let named = match self.instrument_type {
            InstrumentType::Perp => self.market.as_deref(),
            InstrumentType::Event => self.event_label.as_deref(),
            InstrumentType::Unsupported => None,
        };
        named.unwrap_or(self.id.as_str())
    }

    // 2.1: lifecycle step for whoever owns the record. never called by the derivations.
    pub fn advance(&mut self, next: StrategyStatus) -> Result<(), StrategyError> {
        if !self.status.can_advance_to(next) {
            return Err(StrategyError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefiStatus {
    Proposed,
    Active,
    Closed,
    #[serde(other)]
    Unknown,
}

/// A yield deposit planned or executed through the DeFi flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefiPosition {
    pub id: PositionId,
    pub status: DefiStatus,
    pub protocol: String,
    pub asset: String,
    #[serde(default)]
    pub deposit_usd: Option<Decimal>,
    #[serde(default)]
    pub apy_pct: Option<Decimal>,
}

impl DefiPosition {
    pub fn new(
        id: impl Into<String>,
        protocol: impl Into<String>,
        asset: impl Into<String>,
        deposit: Decimal,
    ) -> Self {
        Self {
            id: PositionId::new(id),
            status: DefiStatus::Proposed,
            protocol: protocol.into(),
            asset: asset.into(),
            deposit_usd: Some(deposit),
            apy_pct: None,
        }
    }

    pub fn with_status(mut self, status: DefiStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_apy(mut self, apy_pct: Decimal) -> Self {
        self.apy_pct = Some(apy_pct);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == DefiStatus::Active
    }

    pub fn deposit(&self) -> Usd {
        Usd::from_raw(self.deposit_usd)
    }

    pub fn apy(&self) -> Decimal {
        non_negative(self.apy_pct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("Strategy {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: PositionId,
        from: StrategyStatus,
        to: StrategyStatus,
    },
}
