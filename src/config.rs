// 8.0 config.rs: every threshold the engine reads, in one place. risk profile, alert bands, placeholder split.
// 8.1 presets mirror the settings screen: balanced (default), conservative, aggressive.

use crate::types::Severity;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Two strict thresholds. Above `high` is high severity, above `medium` is medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBand<T> {
    pub medium: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> SeverityBand<T> {
    pub fn new(medium: T, high: T) -> Self {
        Self { medium, high }
    }

    pub fn classify(&self, value: T) -> Option<Severity> {
        if value > self.high {
            Some(Severity::High)
        } else if value > self.medium {
            Some(Severity::Med)
        } else {
            None
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.medium <= self.high
    }
}

// Alert rule thresholds. percentages are 0-100, leverage is the raw multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertThresholds {
    // Share of portfolio held by the largest bucket
    pub concentration_pct: SeverityBand<Decimal>,
    // Open perps + open events + active defi
    pub open_positions: SeverityBand<usize>,
    // Perp exposure as a share of account value
    pub perp_exposure_pct: SeverityBand<Decimal>,
    // Leverage on any single open perp
    pub leverage: SeverityBand<Decimal>,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            concentration_pct: SeverityBand::new(dec!(35), dec!(50)),
            open_positions: SeverityBand::new(7, 10),
            perp_exposure_pct: SeverityBand::new(dec!(60), dec!(80)),
            leverage: SeverityBand::new(dec!(10), dec!(15)),
        }
    }
}

/// User risk settings. Read-only input to every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    // Largest riskPercent a single trade may carry
    pub max_per_trade_risk_pct: Decimal,
    // Smallest acceptable distance to liquidation, percent of price
    pub min_liquidation_buffer_pct: Decimal,
    // Funding rate (percent per period) the funding monitor flags
    pub funding_alert_threshold_pct: Decimal,
    // Correlation above which the copilot suggests a hedge
    pub correlation_hedge_threshold: Decimal,
    pub alert_thresholds: AlertThresholds,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            max_per_trade_risk_pct: dec!(3),
            min_liquidation_buffer_pct: dec!(15),
            funding_alert_threshold_pct: dec!(0.15),
            correlation_hedge_threshold: dec!(0.75),
            alert_thresholds: AlertThresholds::default(),
        }
    }
}

// One slice of the synthetic split shown to accounts with nothing to aggregate yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderSlice {
    pub label: String,
    pub percentage: Decimal,
}

impl PlaceholderSlice {
    pub fn new(label: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            label: label.into(),
            percentage,
        }
    }
}

pub fn default_placeholder_distribution() -> Vec<PlaceholderSlice> {
    vec![
        PlaceholderSlice::new("BTC", dec!(40)),
        PlaceholderSlice::new("ETH", dec!(30)),
        PlaceholderSlice::new("SOL", dec!(30)),
    ]
}

/** 8.2: complete engine configuration */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub profile: RiskProfile,
    // Empty disables the placeholder and zero-exposure accounts get an empty breakdown
    #[serde(default = "default_placeholder_distribution")]
    pub placeholder_distribution: Vec<PlaceholderSlice>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: RiskProfile::default(),
            placeholder_distribution: default_placeholder_distribution(),
        }
    }
}

impl EngineConfig {
    // Tighter bands for small or new accounts
    pub fn conservative() -> Self {
        let mut config = Self::default();
        config.profile.max_per_trade_risk_pct = dec!(1);
        config.profile.min_liquidation_buffer_pct = dec!(25);
        config.profile.alert_thresholds.concentration_pct = SeverityBand::new(dec!(25), dec!(40));
        config.profile.alert_thresholds.perp_exposure_pct = SeverityBand::new(dec!(40), dec!(60));
        config.profile.alert_thresholds.leverage = SeverityBand::new(dec!(5), dec!(10));
        config
    }

    // Looser bands for active traders running a lot of leverage
    pub fn aggressive() -> Self {
        let mut config = Self::default();
        config.profile.max_per_trade_risk_pct = dec!(5);
        config.profile.min_liquidation_buffer_pct = dec!(8);
        config.profile.alert_thresholds.open_positions = SeverityBand::new(12, 20);
        config.profile.alert_thresholds.perp_exposure_pct = SeverityBand::new(dec!(80), dec!(120));
        config.profile.alert_thresholds.leverage = SeverityBand::new(dec!(20), dec!(40));
        config
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let profile = &self.profile;
        let hundred = dec!(100);

        if profile.max_per_trade_risk_pct <= Decimal::ZERO || profile.max_per_trade_risk_pct > hundred {
            return Err(ConfigError::InvalidProfile {
                reason: "Max per-trade risk must be in (0, 100]".to_string(),
            });
        }

        if profile.min_liquidation_buffer_pct < Decimal::ZERO || profile.min_liquidation_buffer_pct >= hundred {
            return Err(ConfigError::InvalidProfile {
                reason: "Liquidation buffer must be in [0, 100)".to_string(),
            });
        }

        if profile.funding_alert_threshold_pct < Decimal::ZERO {
            return Err(ConfigError::InvalidProfile {
                reason: "Funding alert threshold cannot be negative".to_string(),
            });
        }

        if profile.correlation_hedge_threshold < Decimal::ZERO
            || profile.correlation_hedge_threshold > Decimal::ONE
        {
            return Err(ConfigError::InvalidProfile {
                reason: "Correlation hedge threshold must be in [0, 1]".to_string(),
            });
        }

        let bands = &profile.alert_thresholds;
        let ordered = [
            ("concentration", bands.concentration_pct.is_ordered()),
            ("open positions", bands.open_positions.is_ordered()),
            ("perp exposure", bands.perp_exposure_pct.is_ordered()),
            ("leverage", bands.leverage.is_ordered()),
        ];
        if let Some((name, _)) = ordered.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::InvalidThresholds {
                reason: format!("{name} medium threshold is above its high threshold"),
            });
        }

        if bands.concentration_pct.medium < Decimal::ZERO || bands.concentration_pct.high > hundred {
            return Err(ConfigError::InvalidThresholds {
                reason: "Concentration thresholds must be within 0-100".to_string(),
            });
        }

        if !self.placeholder_distribution.is_empty() {
            let total = self
                .placeholder_distribution
                .iter()
                .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.percentage));
            if total != Some(hundred) {
                let total = total.map_or_else(|| "more than Decimal::MAX".to_string(), |t| t.to_string());
                return Err(ConfigError::InvalidPlaceholder {
                    reason: format!("Slices sum to {total}, expected 100"),
                });
            }
            if self.placeholder_distribution.iter().any(|s| s.percentage <= Decimal::ZERO) {
                return Err(ConfigError::InvalidPlaceholder {
                    reason: "Every slice needs a positive share".to_string(),
                });
            }
        }

        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid risk profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("Invalid alert thresholds: {reason}")]
    InvalidThresholds { reason: String },

    #[error("Invalid placeholder distribution: {reason}")]
    InvalidPlaceholder { reason: String },

    #[error("Could not parse config: {0}")]
    Parse(String),
}

// Settings presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Balanced,
    Conservative,
    Aggressive,
}

impl Preset {
    pub fn config(&self) -> EngineConfig {
        match self {
            Preset::Balanced => EngineConfig::default(),
            Preset::Conservative => EngineConfig::conservative(),
            Preset::Aggressive => EngineConfig::aggressive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.placeholder_distribution.len(), 3);
    }

    #[test]
    fn test_default_thresholds_match_rule_table() {
        let t = AlertThresholds::default();
        assert_eq!(t.concentration_pct, SeverityBand::new(dec!(35), dec!(50)));
        assert_eq!(t.open_positions, SeverityBand::new(7, 10));
        assert_eq!(t.perp_exposure_pct, SeverityBand::new(dec!(60), dec!(80)));
        assert_eq!(t.leverage, SeverityBand::new(dec!(10), dec!(15)));
    }

    #[test]
    fn test_band_is_strict() {
        let band = SeverityBand::new(dec!(35), dec!(50));
        assert_eq!(band.classify(dec!(35)), None);
        assert_eq!(band.classify(dec!(35.01)), Some(Severity::Med));
        assert_eq!(band.classify(dec!(50)), Some(Severity::Med));
        assert_eq!(band.classify(dec!(51)), Some(Severity::High));
    }

    #[test]
    fn test_presets_valid() {
        assert!(Preset::Balanced.config().validate().is_ok());
        assert!(Preset::Conservative.config().validate().is_ok());
        assert!(Preset::Aggressive.config().validate().is_ok());
    }

    #[test]
    fn test_conservative_is_tighter() {
        let balanced = EngineConfig::default();
        let conservative = EngineConfig::conservative();
        assert!(
            conservative.profile.alert_thresholds.leverage.high
                < balanced.profile.alert_thresholds.leverage.high
        );
        assert!(conservative.profile.max_per_trade_risk_pct < balanced.profile.max_per_trade_risk_pct);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut config = EngineConfig::default();
        config.profile.alert_thresholds.leverage = SeverityBand::new(dec!(20), dec!(10));

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::InvalidThresholds { .. })));
    }

    #[test]
    fn test_placeholder_must_sum_to_hundred() {
        let mut config = EngineConfig::default();
        config.placeholder_distribution[0].percentage = dec!(50);

        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::InvalidPlaceholder { .. })));

        config.placeholder_distribution.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_placeholder_overflow_is_an_error() {
        let mut config = EngineConfig::default();
        config.placeholder_distribution[0].percentage = Decimal::MAX;
        config.placeholder_distribution[1].percentage = Decimal::MAX;

        assert!(matches!(config.validate(), Err(ConfigError::InvalidPlaceholder { .. })));
    }

    #[test]
    fn test_invalid_profile() {
        let mut config = EngineConfig::default();
        config.profile.max_per_trade_risk_pct = Decimal::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidProfile { .. })));
    }

    #[test]
    fn test_config_json_roundtrip_and_parse_error() {
        let config = EngineConfig::aggressive();
        let json = serde_json::to_string(&config).unwrap();
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(back, config);

        assert!(matches!(EngineConfig::from_json("{not json"), Err(ConfigError::Parse(_))));
    }
}
