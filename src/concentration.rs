// 5.0: concentration. the single largest live bucket and its share of the portfolio.

use crate::exposure::ExposureByAsset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const NO_DATA_LABEL: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentration {
    pub top_bucket_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub top_bucket_percent: Decimal,
}

impl Concentration {
    pub fn no_data() -> Self {
        Self {
            top_bucket_name: NO_DATA_LABEL.to_string(),
            top_bucket_percent: Decimal::ZERO,
        }
    }

    pub fn has_data(&self) -> bool {
        self.top_bucket_name != NO_DATA_LABEL
    }
}

/// Placeholder rows are sample data, so they never count as a concentrated bucket.
pub fn compute_concentration(exposures: &[ExposureByAsset]) -> Concentration {
    let mut top: Option<&ExposureByAsset> = None;
    for row in exposures.iter().filter(|r| !r.placeholder) {
        // strict > keeps the first bucket on ties
        if top.map_or(true, |t| row.percentage > t.percentage) {
            top = Some(row);
        }
    }

    match top {
        Some(row) => Concentration {
            top_bucket_name: row.label.clone(),
            top_bucket_percent: row.percentage,
        },
        None => Concentration::no_data(),
    }
}
