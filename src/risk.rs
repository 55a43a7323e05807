//! Risk alerts and pre-trade checks.
//!
//! The alert engine runs a fixed rule table over one snapshot. Rules run in a
//! fixed order and never short-circuit each other, so the same snapshot always
//! yields the same alerts in the same order, at most one per rule. When a rule
//! is caused by exactly one position the alert focuses that position; when
//! several positions are involved it pre-fills a chat prompt instead.
//!
//! The pre-trade check is the single-strategy counterpart: it validates a draft
//! against the user's risk profile before it is queued.

use crate::account::AccountState;
use crate::classify::{classify_positions, ClassifiedPositions};
use crate::concentration::{compute_concentration, Concentration};
use crate::config::{AlertThresholds, RiskProfile};
use crate::exposure::{compute_exposure_by_asset, ExposureBucket};
use crate::position::{DefiPosition, InstrumentType, Strategy};
use crate::types::{percent_of, round_percent, PositionId, Severity};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Alert rules in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertRule {
    Concentration,
    PositionCount,
    PerpExposure,
    MissingStopLoss,
    HighLeverage,
}

impl AlertRule {
    pub const ORDER: [AlertRule; 5] = [
        AlertRule::Concentration,
        AlertRule::PositionCount,
        AlertRule::PerpExposure,
        AlertRule::MissingStopLoss,
        AlertRule::HighLeverage,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AlertRule::Concentration => "concentration",
            AlertRule::PositionCount => "position-count",
            AlertRule::PerpExposure => "perp-exposure",
            AlertRule::MissingStopLoss => "missing-stop-loss",
            AlertRule::HighLeverage => "high-leverage",
        }
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RiskAlert> {
        match self {
            AlertRule::Concentration => concentration_alert(ctx),
            AlertRule::PositionCount => position_count_alert(ctx),
            AlertRule::PerpExposure => perp_exposure_alert(ctx),
            AlertRule::MissingStopLoss => missing_stop_loss_alert(ctx),
            AlertRule::HighLeverage => high_leverage_alert(ctx),
        }
    }
}

// UI event names. the dashboard dispatches on these strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    FocusPosition,
    PrefillChat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionPayload {
    Position {
        #[serde(rename = "positionId")]
        position_id: PositionId,
    },
    Prompt {
        prompt: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub detail: String,
    pub action_type: ActionType,
    pub action_payload: ActionPayload,
    pub action_label: String,
}

impl RiskAlert {
    pub fn focus_position(
        rule: AlertRule,
        severity: Severity,
        title: String,
        detail: String,
        position_id: PositionId,
        action_label: &str,
    ) -> Self {
        Self {
            id: rule.id().to_string(),
            severity,
            title,
            detail,
            action_type: ActionType::FocusPosition,
            action_payload: ActionPayload::Position { position_id },
            action_label: action_label.to_string(),
        }
    }

    pub fn prefill_chat(
        rule: AlertRule,
        severity: Severity,
        title: String,
        detail: String,
        prompt: String,
        action_label: &str,
    ) -> Self {
        Self {
            id: rule.id().to_string(),
            severity,
            title,
            detail,
            action_type: ActionType::PrefillChat,
            action_payload: ActionPayload::Prompt { prompt },
            action_label: action_label.to_string(),
        }
    }

    pub fn position_id(&self) -> Option<&PositionId> {
        match &self.action_payload {
            ActionPayload::Position { position_id } => Some(position_id),
            ActionPayload::Prompt { .. } => None,
        }
    }
}

struct RuleContext<'a> {
    account: &'a AccountState,
    classified: &'a ClassifiedPositions<'a>,
    concentration: Concentration,
    thresholds: &'a AlertThresholds,
}

// What to offer when a rule fires: the exact position if there is one, a chat prompt otherwise.
struct Remedy<'a> {
    focus_label: &'a str,
    prompt: String,
    prompt_label: &'a str,
}

fn targeted_alert(
    rule: AlertRule,
    severity: Severity,
    title: String,
    detail: String,
    offenders: &[&PositionId],
    remedy: Remedy<'_>,
) -> RiskAlert {
    match offenders {
        [only] => RiskAlert::focus_position(rule, severity, title, detail, (*only).clone(), remedy.focus_label),
        _ => RiskAlert::prefill_chat(rule, severity, title, detail, remedy.prompt, remedy.prompt_label),
    }
}

pub fn compute_risk_alerts(
    account: &AccountState,
    strategies: &[Strategy],
    defi_positions: &[DefiPosition],
    thresholds: &AlertThresholds,
) -> Vec<RiskAlert> {
    let classified = classify_positions(strategies, defi_positions);
    alerts_for(account, &classified, thresholds)
}

pub fn alerts_for(
    account: &AccountState,
    classified: &ClassifiedPositions<'_>,
    thresholds: &AlertThresholds,
) -> Vec<RiskAlert> {
    // no placeholder here: sample data must never read as concentrated
    let exposures = compute_exposure_by_asset(account, classified, &[]);
    let ctx = RuleContext {
        account,
        classified,
        concentration: compute_concentration(&exposures),
        thresholds,
    };

    let alerts: Vec<RiskAlert> = AlertRule::ORDER
        .iter()
        .filter_map(|rule| rule.evaluate(&ctx))
        .collect();

    debug!(
        "risk alerts: {} fired over {} open positions",
        alerts.len(),
        classified.open_count()
    );
    alerts
}

fn concentration_alert(ctx: &RuleContext<'_>) -> Option<RiskAlert> {
    if !ctx.concentration.has_data() {
        return None;
    }
    let band = ctx.thresholds.concentration_pct;
    let pct = ctx.concentration.top_bucket_percent;
    let severity = band.classify(pct)?;
    let name = ctx.concentration.top_bucket_name.as_str();

    let offenders: Vec<&PositionId> = match ExposureBucket::from_label(name) {
        Some(ExposureBucket::Perps) => ctx.classified.perps.iter().map(|s| &s.id).collect(),
        Some(ExposureBucket::Events) => ctx.classified.events.iter().map(|s| &s.id).collect(),
        Some(ExposureBucket::Defi) => ctx.classified.defi.iter().map(|p| &p.id).collect(),
        Some(ExposureBucket::SpotCash) | None => Vec::new(),
    };

    Some(targeted_alert(
        AlertRule::Concentration,
        severity,
        format!("High concentration in {name}"),
        format!(
            "{name} is {}% of your portfolio (alert above {}%).",
            pct.normalize(),
            band.medium.normalize()
        ),
        &offenders,
        Remedy {
            focus_label: "Review position",
            prompt: format!(
                "Rebalance my portfolio to bring {name} below {}% of total value",
                band.medium.normalize()
            ),
            prompt_label: "Rebalance",
        },
    ))
}

fn position_count_alert(ctx: &RuleContext<'_>) -> Option<RiskAlert> {
    let band = ctx.thresholds.open_positions;
    let count = ctx.classified.open_count();
    let severity = band.classify(count)?;

    let offenders: Vec<&PositionId> = ctx
        .classified
        .perps
        .iter()
        .chain(ctx.classified.events.iter())
        .map(|s| &s.id)
        .chain(ctx.classified.defi.iter().map(|p| &p.id))
        .collect();

    Some(targeted_alert(
        AlertRule::PositionCount,
        severity,
        "Too many open positions".to_string(),
        format!(
            "{count} open positions across perps, events and DeFi (alert above {}).",
            band.medium
        ),
        &offenders,
        Remedy {
            focus_label: "Review position",
            prompt: format!("Help me consolidate my {count} open positions"),
            prompt_label: "Consolidate",
        },
    ))
}

fn perp_exposure_alert(ctx: &RuleContext<'_>) -> Option<RiskAlert> {
    let account_value = ctx.account.account_value();
    if !account_value.is_positive() {
        return None;
    }
    let band = ctx.thresholds.perp_exposure_pct;
    let ratio = percent_of(ctx.account.perp_exposure().value(), account_value.value());
    let severity = band.classify(ratio)?;

    let offenders: Vec<&PositionId> = ctx.classified.perps.iter().map(|s| &s.id).collect();

    Some(targeted_alert(
        AlertRule::PerpExposure,
        severity,
        "High perp exposure".to_string(),
        format!(
            "Perp exposure is {}% of account value (alert above {}%).",
            round_percent(ratio),
            band.medium.normalize()
        ),
        &offenders,
        Remedy {
            focus_label: "Reduce position",
            prompt: format!(
                "Reduce my perp exposure below {}% of account value",
                band.medium.normalize()
            ),
            prompt_label: "Reduce exposure",
        },
    ))
}

fn missing_stop_loss_alert(ctx: &RuleContext<'_>) -> Option<RiskAlert> {
    let unprotected: Vec<&Strategy> = ctx
        .classified
        .perps
        .iter()
        .copied()
        .filter(|s| !s.has_stop_loss())
        .collect();

    let (title, detail) = match unprotected.as_slice() {
        [] => return None,
        [only] => (
            "Missing stop-loss".to_string(),
            format!("{} has no stop-loss set.", only.label()),
        ),
        many => (
            format!("{} positions missing stop-loss", many.len()),
            format!("{} open perp positions have no stop-loss set.", many.len()),
        ),
    };

    let offenders: Vec<&PositionId> = unprotected.iter().map(|s| &s.id).collect();
    Some(targeted_alert(
        AlertRule::MissingStopLoss,
        Severity::High,
        title,
        detail,
        &offenders,
        Remedy {
            focus_label: "Set stop-loss",
            prompt: "Add stop-losses to all my open perp positions".to_string(),
            prompt_label: "Add stop-losses",
        },
    ))
}

fn high_leverage_alert(ctx: &RuleContext<'_>) -> Option<RiskAlert> {
    let band = ctx.thresholds.leverage;
    let flagged: Vec<(&Strategy, Severity)> = ctx
        .classified
        .perps
        .iter()
        .filter_map(|s| band.classify(s.leverage_value()).map(|sev| (*s, sev)))
        .collect();

    let severity = flagged.iter().map(|(_, sev)| *sev).max()?;

    let detail = match flagged.as_slice() {
        [(only, _)] => format!(
            "{} is running {}x leverage (alert above {}x).",
            only.label(),
            only.leverage_value().normalize(),
            band.medium.normalize()
        ),
        many => {
            let peak = many
                .iter()
                .map(|(s, _)| s.leverage_value())
                .max()
                .unwrap_or(Decimal::ZERO);
            format!(
                "{} open perps are above {}x leverage, highest {}x.",
                many.len(),
                band.medium.normalize(),
                peak.normalize()
            )
        }
    };

    let offenders: Vec<&PositionId> = flagged.iter().map(|(s, _)| &s.id).collect();
    Some(targeted_alert(
        AlertRule::HighLeverage,
        severity,
        "High leverage".to_string(),
        detail,
        &offenders,
        Remedy {
            focus_label: "Reduce leverage",
            prompt: format!(
                "Reduce leverage on my positions above {}x",
                band.medium.normalize()
            ),
            prompt_label: "Reduce leverage",
        },
    ))
}

/// Result of a pre-trade check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskCheckResult {
    Allowed,
    Blocked(RiskViolation),
}

impl RiskCheckResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RiskCheckResult::Allowed)
    }
}

/// Why a draft was blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskViolation {
    RiskPerTradeTooHigh {
        requested: Decimal,
        maximum: Decimal,
    },
    LeverageAboveLimit {
        leverage: Decimal,
        maximum: Decimal,
    },
    MissingStopLoss,
}

/// Validate a single draft against the profile. First violation wins.
pub fn check_strategy_risk(strategy: &Strategy, profile: &RiskProfile) -> RiskCheckResult {
    let risk = strategy.risk_percent_value();
    if risk > profile.max_per_trade_risk_pct {
        return RiskCheckResult::Blocked(RiskViolation::RiskPerTradeTooHigh {
            requested: risk,
            maximum: profile.max_per_trade_risk_pct,
        });
    }

    if strategy.instrument_type != InstrumentType::Perp {
        return RiskCheckResult::Allowed;
    }

    let max_leverage = profile.alert_thresholds.leverage.high;
    if strategy.leverage_value() > max_leverage {
        return RiskCheckResult::Blocked(RiskViolation::LeverageAboveLimit {
            leverage: strategy.leverage_value(),
            maximum: max_leverage,
        });
    }

    if !strategy.has_stop_loss() {
        return RiskCheckResult::Blocked(RiskViolation::MissingStopLoss);
    }

    RiskCheckResult::Allowed
}
