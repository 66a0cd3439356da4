//! Billing plan codes and the expiry-date calculator.
//!
//! Plans are month-based billing cycles. Expiry arithmetic uses true
//! calendar months (end-of-month dates clamp, so Jan 31 + 1M = Feb 28),
//! never fixed day counts. This is the single arithmetic used across the
//! whole crate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A billing-duration tag driving expiry computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PlanCode {
    /// One calendar month of access.
    #[serde(rename = "1M")]
    OneMonth,
    /// Two calendar months of access.
    #[serde(rename = "2M")]
    TwoMonths,
    /// Three calendar months of access.
    #[serde(rename = "3M")]
    ThreeMonths,
    /// Six calendar months of access.
    #[serde(rename = "6M")]
    SixMonths,
    /// Effectively permanent access (one hundred years).
    Lifetime,
}

/// Error returned when a plan code string is not one of the known tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown plan code: {0}")]
pub struct UnknownPlanCode(pub String);

impl PlanCode {
    /// Number of calendar months granted by the plan.
    ///
    /// Lifetime is modelled as 1200 months (one hundred years).
    pub const fn months(self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::TwoMonths => 2,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::Lifetime => 1200,
        }
    }

    /// The wire representation of the plan code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::TwoMonths => "2M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::Lifetime => "Lifetime",
        }
    }

    /// Lenient parser for plan codes read from legacy data.
    ///
    /// Unrecognised codes silently degrade to [`PlanCode::OneMonth`]; this
    /// is intentional and never an error. Request bodies go through the
    /// strict [`FromStr`] parser instead.
    pub fn parse_or_default(code: &str) -> Self {
        Self::from_str(code).unwrap_or(Self::OneMonth)
    }
}

impl FromStr for PlanCode {
    type Err = UnknownPlanCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1M" => Ok(Self::OneMonth),
            "2M" => Ok(Self::TwoMonths),
            "3M" => Ok(Self::ThreeMonths),
            "6M" => Ok(Self::SixMonths),
            "Lifetime" => Ok(Self::Lifetime),
            other => Err(UnknownPlanCode(other.to_owned())),
        }
    }
}

impl fmt::Display for PlanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the expiry timestamp for `plan`, counting from `base`.
///
/// Pure and infallible. Timestamps beyond the representable range
/// saturate at [`DateTime::<Utc>::MAX_UTC`].
///
/// # Examples
/// ```
/// use backend::domain::{expiry_from, PlanCode};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// assert!(expiry_from(PlanCode::OneMonth, now) > now);
/// ```
pub fn expiry_from(plan: PlanCode, base: DateTime<Utc>) -> DateTime<Utc> {
    base.checked_add_months(Months::new(plan.months()))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
