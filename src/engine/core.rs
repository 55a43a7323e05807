// 10.1 engine/core.rs: the facade. validates config once, then analyses snapshots.

use super::results::PortfolioReport;
use crate::account::PortfolioSnapshot;
use crate::classify::{classify_positions, open_positions_from};
use crate::concentration::compute_concentration;
use crate::config::{ConfigError, EngineConfig, RiskProfile};
use crate::defi::compute_defi_aggregates;
use crate::event_contracts::compute_event_aggregates;
use crate::exposure::{compute_exposure_by_type, exposure_breakdown};
use crate::margin::compute_margin_metrics;
use crate::risk::{alerts_for, check_strategy_risk, RiskCheckResult};
use crate::position::Strategy;
use crate::watch::evaluate_watch_list;
use log::{debug, info};

#[derive(Debug, Clone)]
pub struct PortfolioEngine {
    config: EngineConfig,
}

impl PortfolioEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "portfolio engine ready: concentration > {}%, perp exposure > {}%, leverage > {}x",
            config.profile.alert_thresholds.concentration_pct.medium,
            config.profile.alert_thresholds.perp_exposure_pct.medium,
            config.profile.alert_thresholds.leverage.medium,
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self) -> &RiskProfile {
        &self.config.profile
    }

    pub fn analyze(&self, snapshot: &PortfolioSnapshot) -> PortfolioReport {
        let account = &snapshot.account;
        let classified = classify_positions(&snapshot.strategies, &snapshot.defi_positions);

        let exposure_by_type = compute_exposure_by_type(account, &classified);
        let exposure_by_asset = exposure_breakdown(&exposure_by_type, &self.config.placeholder_distribution);
        let concentration = compute_concentration(&exposure_by_asset);
        let alerts = alerts_for(account, &classified, &self.config.profile.alert_thresholds);

        debug!(
            "analyzed snapshot: {} perps, {} events, {} defi, {} unclassified, {} alerts",
            classified.perps.len(),
            classified.events.len(),
            classified.defi.len(),
            classified.unclassified.len(),
            alerts.len()
        );

        PortfolioReport {
            exposure_by_type,
            exposure_by_asset,
            open_positions: open_positions_from(&classified),
            concentration,
            margin: compute_margin_metrics(account),
            defi: compute_defi_aggregates(&classified),
            events: compute_event_aggregates(account, &classified),
            alerts,
            watch_list: evaluate_watch_list(&snapshot.watch_list, &self.config.profile),
            unclassified: classified.unclassified.clone(),
        }
    }

    pub fn check_strategy(&self, strategy: &Strategy) -> RiskCheckResult {
        check_strategy_risk(strategy, &self.config.profile)
    }
}
