// 10.0.1: the bundle returned by one analysis pass. no timestamps or counters, so equal input gives equal output.

use crate::classify::{OpenPosition, UnclassifiedEntry};
use crate::concentration::Concentration;
use crate::defi::DefiAggregates;
use crate::event_contracts::EventAggregates;
use crate::exposure::{ExposureByAsset, ExposureByType};
use crate::margin::MarginMetrics;
use crate::risk::RiskAlert;
use crate::types::Severity;
use crate::watch::WatchStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub exposure_by_type: ExposureByType,
    pub exposure_by_asset: Vec<ExposureByAsset>,
    pub open_positions: Vec<OpenPosition>,
    pub concentration: Concentration,
    pub margin: MarginMetrics,
    pub defi: DefiAggregates,
    pub events: EventAggregates,
    pub alerts: Vec<RiskAlert>,
    pub watch_list: Vec<WatchStatus>,
    pub unclassified: Vec<UnclassifiedEntry>,
}

impl PortfolioReport {
    pub fn highest_severity(&self) -> Option<Severity> {
        self.alerts.iter().map(|a| a.severity).max()
    }

    pub fn is_placeholder(&self) -> bool {
        !self.exposure_by_asset.is_empty() && self.exposure_by_asset.iter().all(|r| r.placeholder)
    }
}
