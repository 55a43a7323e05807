// copilot-risk: portfolio aggregation and risk alerts for the trading copilot dashboard.
// pure derivations over a caller-owned snapshot: no I/O, no hidden state, no panics on bad input.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Usd, PositionId, Side, Severity, percent rounding
//   2.x  position.rs: strategies, defi deposits, lifecycle state machine
//        account.rs: account state + full portfolio snapshot
//   3.x  classify.rs: open/active classification, open positions list
//   4.x  exposure.rs: bucket totals, percentages, placeholder split
//   5.x  concentration.rs: largest bucket
//        margin.rs: margin used / available
//   6.x  defi.rs: defi totals, protocol rollup
//   6.2  event_contracts.rs: prediction market totals
//   7.x  risk.rs: alert rule table, pre-trade check
//   8.x  config.rs: risk profile, alert bands, presets
//   9.x  watch.rs: manual liquidation watch list
//   10.x engine/: facade bundling every derivation into one report

pub mod account;
pub mod classify;
pub mod concentration;
pub mod config;
pub mod defi;
pub mod engine;
pub mod event_contracts;
pub mod exposure;
pub mod margin;
pub mod position;
pub mod risk;
pub mod types;
pub mod watch;

// re exports for convenience
pub use account::*;
pub use classify::*;
pub use concentration::*;
pub use config::*;
pub use defi::*;
pub use engine::*;
pub use event_contracts::*;
pub use exposure::*;
pub use margin::*;
pub use position::*;
pub use risk::*;
pub use types::*;
pub use watch::*;
