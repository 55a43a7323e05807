//! Snapshot scenarios
//!
//! End-to-end checks over whole snapshots, including the JSON contract the
//! dashboard dispatches alert actions on.

use copilot_risk::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn engine() -> PortfolioEngine {
    PortfolioEngine::new(EngineConfig::default()).unwrap()
}

mod worked_examples {
    use super::*;

    #[test]
    fn dominant_perp_fires_exposure_and_concentration_high() {
        let account = AccountState::new(dec!(100_000)).with_perp_exposure(dec!(90_000));
        let strategies = vec![Strategy::perp("btc", "BTC-PERP", Side::Long, dec!(90_000))
            .with_status(StrategyStatus::Executed)
            .with_stop_loss(dec!(55_000))
            .with_leverage(dec!(5))];

        let alerts = compute_risk_alerts(&account, &strategies, &[], &AlertThresholds::default());

        let exposure = alerts.iter().find(|a| a.id == "perp-exposure").unwrap();
        assert_eq!(exposure.severity, Severity::High);

        let concentration = alerts.iter().find(|a| a.id == "concentration").unwrap();
        assert_eq!(concentration.severity, Severity::High);
        assert_eq!(concentration.title, "High concentration in Perps");
        // one open perp behind the bucket, so the alert points at it
        assert_eq!(concentration.action_type, ActionType::FocusPosition);
        assert_eq!(concentration.position_id().unwrap().as_str(), "btc");

        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn executed_perp_without_stop_focuses_position() {
        let account = AccountState::new(dec!(100_000)).with_perp_exposure(dec!(5_000));
        let strategies = vec![Strategy::perp("strat-42", "SOL-PERP", Side::Short, dec!(5_000))
            .with_status(StrategyStatus::Executed)
            .with_stop_loss(dec!(0))];

        let alerts = compute_risk_alerts(&account, &strategies, &[], &AlertThresholds::default());
        let alert = alerts.iter().find(|a| a.id == "missing-stop-loss").unwrap();

        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.action_type, ActionType::FocusPosition);
        assert_eq!(
            alert.action_payload,
            ActionPayload::Position {
                position_id: PositionId::new("strat-42")
            }
        );
    }

    #[test]
    fn empty_account_margin_and_placeholder() {
        let account = AccountState::new(dec!(0));

        let margin = compute_margin_metrics(&account);
        assert_eq!(margin.margin_used, dec!(0));
        assert_eq!(margin.available_margin, dec!(100));

        let classified = classify_positions(&[], &[]);
        let rows = compute_exposure_by_asset(&account, &classified, &default_placeholder_distribution());
        let split: Vec<_> = rows.iter().map(|r| r.percentage).collect();
        assert_eq!(split, vec![dec!(40), dec!(30), dec!(30)]);
        assert!(rows.iter().all(|r| r.placeholder));

        assert!(compute_open_positions_list(&[], &[]).is_empty());
    }
}

mod dashboard_contract {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "account": {
            "accountValue": 40000,
            "openPerpExposure": 30000,
            "eventExposureUsd": 1000,
            "totalPnlPct": 4.5,
            "balances": [{ "symbol": "USDC", "balanceUsd": 9000 }]
        },
        "strategies": [
            { "id": "p-1", "instrumentType": "perp", "status": "executed", "isClosed": false,
              "side": "long", "notionalUsd": 18000, "leverage": 16, "stopLoss": 58000, "market": "BTC-PERP" },
            { "id": "p-2", "instrumentType": "perp", "status": "executing",
              "side": "short", "notionalUsd": 12000, "leverage": 4, "market": "ETH-PERP" },
            { "id": "p-3", "instrumentType": "perp", "status": "executed", "isClosed": true,
              "notionalUsd": 99000, "leverage": 50, "market": "DOGE-PERP" },
            { "id": "e-1", "instrumentType": "event", "status": "executed",
              "eventSide": "YES", "stakeUsd": 1000, "eventLabel": "Fed cuts in March" },
            { "id": "x-1", "instrumentType": "option", "status": "executed", "notionalUsd": 7000 }
        ],
        "defiPositions": [
            { "id": "d-1", "status": "proposed", "protocol": "Kamino", "asset": "SOL", "depositUsd": 5000 }
        ]
    }"#;

    fn report() -> PortfolioReport {
        let snapshot: PortfolioSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        engine().analyze(&snapshot)
    }

    #[test]
    fn classification_from_dashboard_json() {
        let report = report();

        let ids: Vec<_> = report.open_positions.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2", "e-1"]);
        assert_eq!(report.unclassified.len(), 1);
        assert_eq!(report.unclassified[0].id.as_str(), "x-1");
        assert_eq!(report.unclassified[0].reason, UnclassifiedReason::UnsupportedInstrument);
        assert_eq!(report.defi.active_count, 0);
    }

    #[test]
    fn alerts_from_dashboard_json() {
        let report = report();

        // perps 75 / spot 22.5 / events 2.5
        let ids: Vec<_> = report.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["concentration", "perp-exposure", "missing-stop-loss", "high-leverage"]);

        let by_id = |id: &str| report.alerts.iter().find(|a| a.id == id).unwrap();
        assert_eq!(by_id("concentration").severity, Severity::High);
        assert_eq!(by_id("perp-exposure").severity, Severity::Med);
        assert_eq!(by_id("perp-exposure").action_type, ActionType::PrefillChat);
        assert_eq!(by_id("missing-stop-loss").position_id().unwrap().as_str(), "p-2");
        assert_eq!(by_id("high-leverage").severity, Severity::High);
        assert_eq!(by_id("high-leverage").position_id().unwrap().as_str(), "p-1");
    }

    #[test]
    fn alert_wire_format() {
        let report = report();
        let json = serde_json::to_value(&report.alerts).unwrap();

        let stop = &json[2];
        assert_eq!(stop["id"], "missing-stop-loss");
        assert_eq!(stop["severity"], "high");
        assert_eq!(stop["actionType"], "focusPosition");
        assert_eq!(stop["actionPayload"]["positionId"], "p-2");
        assert_eq!(stop["actionLabel"], "Set stop-loss");

        let exposure = &json[1];
        assert_eq!(exposure["severity"], "med");
        assert_eq!(exposure["actionType"], "prefillChat");
        assert!(exposure["actionPayload"]["prompt"].is_string());
    }

    #[test]
    fn report_figures_are_json_numbers() {
        let json = serde_json::to_value(report()).unwrap();

        // spot 22.5 -> 23, perps 75, events 2.5 -> 3
        let rows = json["exposureByAsset"].as_array().unwrap();
        let shares: Vec<_> = rows.iter().map(|r| r["percentage"].as_f64()).collect();
        assert_eq!(shares, vec![Some(23.0), Some(75.0), Some(3.0)]);
        assert_eq!(rows[1]["amountUsd"].as_f64(), Some(30000.0));

        assert_eq!(json["margin"]["marginUsed"].as_f64(), Some(75.0));
        assert_eq!(json["margin"]["availableMargin"].as_f64(), Some(25.0));
        assert_eq!(json["concentration"]["topBucketPercent"].as_f64(), Some(75.0));
        assert_eq!(json["exposureByType"]["perps"].as_f64(), Some(30000.0));
        assert_eq!(json["openPositions"][0]["leverage"].as_f64(), Some(16.0));
    }

    #[test]
    fn alerts_roundtrip_for_the_ui_layer() {
        let report = report();
        let json = serde_json::to_string(&report.alerts).unwrap();
        let back: Vec<RiskAlert> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report.alerts);
    }
}

mod degenerate_input {
    use super::*;

    #[test]
    fn negative_and_missing_numbers_never_panic() {
        let snapshot: PortfolioSnapshot = serde_json::from_str(
            r#"{
                "account": { "accountValue": -500, "openPerpExposure": -20 },
                "strategies": [
                    { "id": "p", "instrumentType": "perp", "status": "executed", "notionalUsd": -100, "leverage": -3 }
                ],
                "defiPositions": [
                    { "id": "d", "status": "active", "protocol": "Aave", "asset": "USDC" }
                ]
            }"#,
        )
        .unwrap();

        let report = engine().analyze(&snapshot);
        assert_eq!(report.margin.margin_used, dec!(0));
        assert!(report.is_placeholder());
        assert!(report.defi.total_deposits.is_zero());
        assert_eq!(report.events.concentration_percent, dec!(0));

        // the only alert is the missing stop on the open perp
        let ids: Vec<_> = report.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["missing-stop-loss"]);
    }

    #[test]
    fn decimal_max_everywhere_saturates() {
        let snapshot = PortfolioSnapshot::new(
            AccountState::new(Decimal::MAX)
                .with_perp_exposure(Decimal::MAX)
                .with_event_exposure(Decimal::MAX),
        );
        let report = engine().analyze(&snapshot);

        assert_eq!(report.exposure_by_type.total().value(), Decimal::MAX);
        assert!(report.exposure_by_type.spot_and_cash.is_zero());
        assert_eq!(report.concentration.top_bucket_name, "Perps");
        assert_eq!(report.concentration.top_bucket_percent, dec!(100));
        assert_eq!(report.margin.margin_used, dec!(100));

        let ids: Vec<_> = report.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["concentration", "perp-exposure"]);
        assert!(report.alerts.iter().all(|a| a.severity == Severity::High));
    }

    #[test]
    fn dust_account_with_large_exposure_saturates() {
        let account = AccountState::new(dec!(0.0000000000000000000000000001))
            .with_perp_exposure(dec!(10_000_000_000_000));

        let margin = compute_margin_metrics(&account);
        assert_eq!(margin.margin_used, Decimal::MAX);
        assert!(margin.is_overextended());

        let report = engine().analyze(&PortfolioSnapshot::new(account));
        assert_eq!(report.margin, margin);
        let perp = report.alerts.iter().find(|a| a.id == "perp-exposure").unwrap();
        assert_eq!(perp.severity, Severity::High);
    }

    #[test]
    fn upstream_exposure_above_account_value() {
        let snapshot = PortfolioSnapshot::new(
            AccountState::new(dec!(10_000))
                .with_perp_exposure(dec!(15_000))
                .with_event_exposure(dec!(5_000)),
        );
        let report = engine().analyze(&snapshot);

        assert!(report.exposure_by_type.spot_and_cash.is_zero());
        assert_eq!(report.margin.margin_used, dec!(150));
        assert_eq!(report.margin.available_margin, dec!(-50));
        let perp = report.alerts.iter().find(|a| a.id == "perp-exposure").unwrap();
        assert_eq!(perp.severity, Severity::High);
        // no open perps listed, so the remedy falls back to chat
        assert_eq!(perp.action_type, ActionType::PrefillChat);
    }
}
