// 1.0: primitives shared by every aggregator. USD amounts, percent math, ids, severities.
// upstream snapshots are loose (missing or negative numbers), so everything here reads them as >= 0.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub String);

impl PositionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Long = profit when price goes up. Short = profit when price goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => f.write_str("long"),
            Side::Short => f.write_str("short"),
        }
    }
}

// 1.1: outcome side of a prediction market contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventSide {
    Yes,
    No,
}

// 1.2: USD amount. deposits, stakes, notionals, bucket totals all use this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Usd {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Reads a raw upstream number, treating missing and negative values as zero.
    pub fn from_raw(value: Option<Decimal>) -> Self {
        Self(non_negative(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    // saturates at the Decimal bounds
    pub fn add(&self, other: Usd) -> Self {
        Self(saturate(self.0.checked_add(other.0), other.0))
    }

    pub fn sub(&self, other: Usd) -> Self {
        Self(saturate(self.0.checked_sub(other.0), -other.0))
    }

    pub fn clamp_non_negative(&self) -> Self {
        Self(self.0.max(Decimal::ZERO))
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Usd {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Usd {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc.add(q))
    }
}

impl<'a> Sum<&'a Usd> for Usd {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc.add(*q))
    }
}

pub fn non_negative(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
}

// Overflowed results pin to the bound in the direction of `toward`.
fn saturate(result: Option<Decimal>, toward: Decimal) -> Decimal {
    result.unwrap_or(if toward.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

// 1.3: percent math. part / whole * 100, zero when whole is not positive.
// a share too large to represent saturates at Decimal::MAX (or MIN for negative parts).
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let share = part.checked_div(whole).and_then(|ratio| ratio.checked_mul(dec!(100)));
    saturate(share, part)
}

// half rounds up, -2.5 -> -2 and 2.5 -> 3. dashboard percentages have always rounded this way.
pub fn round_percent(value: Decimal) -> Decimal {
    // values this close to MAX are already whole numbers
    value.checked_add(dec!(0.5)).map_or(value, |v| v.floor())
}

// 1.4: alert severity. ordered so max() picks the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Med,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => f.write_str("low"),
            Severity::Med => f.write_str("med"),
            Severity::High => f.write_str("high"),
        }
    }
}

// 1.5: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn usd_from_raw_reads_missing_and_negative_as_zero() {
        assert_eq!(Usd::from_raw(None).value(), dec!(0));
        assert_eq!(Usd::from_raw(Some(dec!(-250))).value(), dec!(0));
        assert_eq!(Usd::from_raw(Some(dec!(1250.5))).value(), dec!(1250.5));
    }

    #[test]
    fn usd_sum_and_clamp() {
        let total: Usd = [Usd::new(dec!(10)), Usd::new(dec!(15))].iter().sum();
        assert_eq!(total.value(), dec!(25));

        let residual = Usd::new(dec!(10)).sub(Usd::new(dec!(40)));
        assert_eq!(residual.clamp_non_negative().value(), dec!(0));
    }

    #[test]
    fn percent_of_guards_zero_whole() {
        assert_eq!(percent_of(dec!(50), dec!(0)), dec!(0));
        assert_eq!(percent_of(dec!(50), dec!(-10)), dec!(0));
        assert_eq!(percent_of(dec!(25), dec!(200)), dec!(12.5));
    }

    #[test]
    fn arithmetic_saturates_instead_of_panicking() {
        let max = Usd::new(Decimal::MAX);
        assert_eq!(max.add(max).value(), Decimal::MAX);
        assert_eq!(Usd::new(Decimal::MIN).sub(max).value(), Decimal::MIN);

        // 1e13 against 1e-28 is far past what a Decimal can hold
        assert_eq!(percent_of(dec!(10_000_000_000_000), dec!(0.0000000000000000000000000001)), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MAX, Decimal::MAX), dec!(100));
        assert_eq!(round_percent(Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn round_percent_rounds_half_up() {
        assert_eq!(round_percent(dec!(12.5)), dec!(13));
        assert_eq!(round_percent(dec!(12.49)), dec!(12));
        assert_eq!(round_percent(dec!(-2.5)), dec!(-2));
        assert_eq!(round_percent(dec!(33.3333)), dec!(33));
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::High > Severity::Med);
        assert!(Severity::Med > Severity::Low);
        assert_eq!(
            [Severity::Med, Severity::High, Severity::Low].iter().max(),
            Some(&Severity::High)
        );
    }

    #[test]
    fn severity_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Med).unwrap(), "\"med\"");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }
}
