//! Trading copilot risk simulation.
//!
//! Walks a handful of account snapshots through the portfolio engine and prints
//! the exposure breakdown, margin usage and risk alerts the dashboard would show.
//! Set `RUST_LOG=debug` to see the engine's own logging.

use copilot_risk::*;
use rust_decimal_macros::dec;

fn main() {
    env_logger::init();

    println!("Trading Copilot Risk Engine Simulation");
    println!("Exposure, Margin and Alerts over Canned Snapshots\n");

    let engine = match PortfolioEngine::new(Preset::Balanced.config()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("invalid engine config: {e}");
            std::process::exit(1);
        }
    };

    scenario_1_new_account(&engine);
    scenario_2_concentrated_perp(&engine);
    scenario_3_mixed_book(&engine);
    scenario_4_crowded_book(&engine);
    scenario_5_dashboard_json(&engine);
    scenario_6_pre_trade_checks(&engine);

    println!("\nAll simulations completed successfully.");
}

fn print_report(report: &PortfolioReport) {
    for row in &report.exposure_by_asset {
        let tag = if row.placeholder { " (sample)" } else { "" };
        println!("    {:<12} {:>4}%  ${}{}", row.label, row.percentage, row.amount_usd, tag);
    }
    println!(
        "  Top bucket: {} at {}%",
        report.concentration.top_bucket_name, report.concentration.top_bucket_percent
    );
    println!(
        "  Margin used {}%, available {}%",
        report.margin.margin_used, report.margin.available_margin
    );

    if report.alerts.is_empty() {
        println!("  No alerts");
    }
    for alert in &report.alerts {
        println!("  [{}] {}: {}", alert.severity, alert.title, alert.detail);
        match &alert.action_payload {
            ActionPayload::Position { position_id } => {
                println!("      -> {} (focus {})", alert.action_label, position_id)
            }
            ActionPayload::Prompt { prompt } => {
                println!("      -> {} (chat: \"{}\")", alert.action_label, prompt)
            }
        }
    }
    println!();
}

/// Brand new account: nothing to aggregate, so the sample split is shown.
fn scenario_1_new_account(engine: &PortfolioEngine) {
    println!("Scenario 1: New Account\n");

    let report = engine.analyze(&PortfolioSnapshot::default());
    print_report(&report);
}

/// One large perp dominating a $100k account.
fn scenario_2_concentrated_perp(engine: &PortfolioEngine) {
    println!("Scenario 2: Concentrated Perp\n");

    let snapshot = PortfolioSnapshot::new(AccountState::new(dec!(100_000)).with_perp_exposure(dec!(90_000)))
        .with_strategy(
            Strategy::perp("btc-long", "BTC-PERP", Side::Long, dec!(90_000))
                .with_status(StrategyStatus::Executed)
                .with_leverage(dec!(8))
                .with_stop_loss(dec!(58_000)),
        );

    println!("  $100k account, $90k BTC-PERP long at 8x");
    print_report(&engine.analyze(&snapshot));
}

/// Perps, event contracts and a yield deposit side by side.
fn scenario_3_mixed_book(engine: &PortfolioEngine) {
    println!("Scenario 3: Mixed Book\n");

    let snapshot = PortfolioSnapshot::new(
        AccountState::new(dec!(60_000))
            .with_perp_exposure(dec!(18_000))
            .with_event_exposure(dec!(4_000))
            .with_balance("USDC", dec!(26_000))
            .with_balance("SOL", dec!(6_000)),
    )
    .with_strategy(
        Strategy::perp("eth-short", "ETH-PERP", Side::Short, dec!(12_000))
            .with_status(StrategyStatus::Executed)
            .with_leverage(dec!(12)),
    )
    .with_strategy(
        Strategy::perp("sol-long", "SOL-PERP", Side::Long, dec!(6_000))
            .with_status(StrategyStatus::Executing)
            .with_leverage(dec!(4))
            .with_stop_loss(dec!(120)),
    )
    .with_strategy(Strategy::event("fed-march", "Fed cuts in March", EventSide::Yes, dec!(4_000)).with_status(StrategyStatus::Executed))
    .with_defi(
        DefiPosition::new("aave-usdc", "Aave", "USDC", dec!(12_000))
            .with_status(DefiStatus::Active)
            .with_apy(dec!(6.5)),
    )
    .with_watch(ManualWatchAsset::new("watch-eth", "ETH", Side::Short).with_prices(dec!(3100), dec!(3400), dec!(3150)));

    let report = engine.analyze(&snapshot);
    print_report(&report);

    println!(
        "  DeFi: ${} across {} deposits, weighted APY {}%",
        report.defi.total_deposits,
        report.defi.active_count,
        report.defi.weighted_apy_pct.round_dp(2)
    );
    println!(
        "  Events: ${} staked over {} contracts, largest {}% of account",
        report.events.total_stake,
        report.events.position_count,
        report.events.concentration_percent.round_dp(2)
    );
    for watch in &report.watch_list {
        let buffer = watch
            .buffer_pct
            .map(|b| format!("{}%", b.round_dp(2)))
            .unwrap_or_else(|| "n/a".to_string());
        println!("  Watch {}: buffer {}, thin: {}", watch.symbol, buffer, watch.below_minimum);
    }
    println!();
}

/// A dozen small perps without stops, most of them levered up.
fn scenario_4_crowded_book(engine: &PortfolioEngine) {
    println!("Scenario 4: Crowded Book\n");

    let mut snapshot = PortfolioSnapshot::new(AccountState::new(dec!(40_000)).with_perp_exposure(dec!(36_000)));
    for i in 0..12 {
        let leverage = if i % 3 == 0 { dec!(20) } else { dec!(11) };
        snapshot = snapshot.with_strategy(
            Strategy::perp(format!("perp-{i}"), "BTC-PERP", Side::Long, dec!(3_000))
                .with_status(StrategyStatus::Executed)
                .with_leverage(leverage),
        );
    }

    println!("  12 open perps, no stops, 11x to 20x");
    print_report(&engine.analyze(&snapshot));
}

/// Snapshot as the dashboard store serializes it, alerts printed as the UI receives them.
fn scenario_5_dashboard_json(engine: &PortfolioEngine) {
    println!("Scenario 5: Dashboard JSON\n");

    let raw = r#"{
        "account": { "accountValue": 25000, "openPerpExposure": 21000, "eventExposureUsd": 0, "totalPnlPct": -3.2 },
        "strategies": [
            { "id": "s-1", "instrumentType": "perp", "status": "executed", "isClosed": false,
              "side": "long", "notionalUsd": 21000, "leverage": 7, "stopLoss": 0, "market": "BTC-PERP" },
            { "id": "s-2", "instrumentType": "option", "status": "executed", "notionalUsd": 500 }
        ]
    }"#;

    let snapshot: PortfolioSnapshot = match serde_json::from_str(raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            println!("  could not parse snapshot: {e}\n");
            return;
        }
    };

    let report = engine.analyze(&snapshot);
    match serde_json::to_string_pretty(&report.alerts) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("  could not serialize alerts: {e}"),
    }
    println!("  Unclassified entries: {}\n", report.unclassified.len());
}

/// Drafts checked against the balanced profile before they are queued.
fn scenario_6_pre_trade_checks(engine: &PortfolioEngine) {
    println!("Scenario 6: Pre-trade Checks\n");

    let drafts = [
        Strategy::perp("ok", "BTC-PERP", Side::Long, dec!(5_000))
            .with_risk_percent(dec!(1.5))
            .with_leverage(dec!(5))
            .with_stop_loss(dec!(60_000)),
        Strategy::perp("too-risky", "ETH-PERP", Side::Short, dec!(5_000)).with_risk_percent(dec!(8)),
        Strategy::perp("too-levered", "SOL-PERP", Side::Long, dec!(5_000))
            .with_risk_percent(dec!(2))
            .with_leverage(dec!(25)),
        Strategy::event("bet", "ETH above 4k", EventSide::No, dec!(300)).with_risk_percent(dec!(1)),
    ];

    for draft in &drafts {
        match engine.check_strategy(draft) {
            RiskCheckResult::Allowed => println!("  {}: allowed", draft.id),
            RiskCheckResult::Blocked(violation) => println!("  {}: blocked, {:?}", draft.id, violation),
        }
    }
}
