// 10.0: portfolio engine. runs every derivation over one snapshot and bundles the results.
// stateless apart from its config, so one engine can serve any number of snapshots.

mod core;
mod results;

pub use self::core::PortfolioEngine;
pub use results::PortfolioReport;
