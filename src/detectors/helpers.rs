//! Shared geometry, thresholds and configuration of the shadow-candle detectors

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::indicators::DEFAULT_TREND_BAR_COUNT;
use crate::params::{FromParams, ParamSet, ParamSpec};
use crate::{Bar, Coefficient, Num, Period, Result};

// ============================================================
// THRESHOLDS
// ============================================================

/// Long wick must be strictly greater than this multiple of the body height
pub const LONG_WICK_RATIO: f64 = 2.0;
/// Short wick must be at most this multiple of the body height
pub const SHORT_WICK_RATIO: f64 = 1.0;

/// Inverted hammer: upper wick > 2.0 * body height
pub const BODY_TO_UPPER_WICK_RATIO: f64 = LONG_WICK_RATIO;
/// Inverted hammer: lower wick <= 1.0 * body height
pub const BODY_TO_LOWER_WICK_RATIO: f64 = SHORT_WICK_RATIO;

/// Wick-to-body thresholds in the numeric backend of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WickThresholds<N> {
    /// Exclusive lower bound for the long wick ratio
    pub long: N,
    /// Inclusive upper bound for the short wick ratio
    pub short: N,
}

impl<N: Num> Default for WickThresholds<N> {
    fn default() -> Self {
        Self {
            long: N::from_usize(2),
            short: N::one(),
        }
    }
}

impl<N: Num> WickThresholds<N> {
    pub fn from_config(config: &ShadowCandleConfig) -> Result<Self> {
        Ok(Self {
            long: config.long_wick_ratio.to_num("long_wick_ratio")?,
            short: config.short_wick_ratio.to_num("short_wick_ratio")?,
        })
    }
}

// ============================================================
// GEOMETRY
// ============================================================

/// Which wick a pattern expects to be long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WickSide {
    Upper,
    Lower,
}

/// Wick heights divided by the real body height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WickRatios<N> {
    pub upper: N,
    pub lower: N,
}

impl<N: Num> WickRatios<N> {
    /// `None` for a zero-height body: a doji body has no wick-to-body ratio.
    /// Also `None` if the division overflows.
    ///
    /// Wicks are not validated; a malformed bar gives negative ratios.
    pub fn of(bar: &Bar<N>, body_height: N) -> Option<Self> {
        if body_height.is_zero() {
            return None;
        }
        Some(Self {
            upper: bar.upper_wick().checked_div(body_height)?,
            lower: bar.lower_wick().checked_div(body_height)?,
        })
    }

    /// Whether the `long` side passes the long threshold and the other side
    /// stays within the short one
    pub fn matches(&self, long: WickSide, thresholds: &WickThresholds<N>) -> bool {
        let (long_ratio, short_ratio) = match long {
            WickSide::Upper => (self.upper, self.lower),
            WickSide::Lower => (self.lower, self.upper),
        };
        long_ratio > thresholds.long && short_ratio <= thresholds.short
    }
}

// ============================================================
// CONFIGURATION
// ============================================================

/// Tunable parameters of the shadow-candle detectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowCandleConfig {
    pub long_wick_ratio: Coefficient,
    pub short_wick_ratio: Coefficient,
    pub trend_bar_count: Period,
}

impl Default for ShadowCandleConfig {
    fn default() -> Self {
        Self {
            long_wick_ratio: Coefficient::new_const(LONG_WICK_RATIO),
            short_wick_ratio: Coefficient::new_const(SHORT_WICK_RATIO),
            trend_bar_count: DEFAULT_TREND_BAR_COUNT,
        }
    }
}

const LONG_WICK_PARAM: ParamSpec = ParamSpec::coefficient(
    "long_wick_ratio",
    LONG_WICK_RATIO,
    1.0,
    4.0,
    "Long wick must exceed this multiple of the body height",
);
const SHORT_WICK_PARAM: ParamSpec = ParamSpec::coefficient(
    "short_wick_ratio",
    SHORT_WICK_RATIO,
    0.0,
    2.0,
    "Short wick may be at most this multiple of the body height",
);
const TREND_BAR_COUNT_PARAM: ParamSpec = ParamSpec::period(
    "trend_bar_count",
    5.0,
    3.0,
    14.0,
    "Bar count of the DI/ADX averages gating the pattern",
);

impl FromParams for ShadowCandleConfig {
    fn param_specs() -> &'static [ParamSpec] {
        &[LONG_WICK_PARAM, SHORT_WICK_PARAM, TREND_BAR_COUNT_PARAM]
    }

    fn from_params(values: &HashMap<&str, f64>) -> Result<Self> {
        let params = ParamSet::new(values, Self::param_specs())?;
        Ok(Self {
            long_wick_ratio: params.coefficient(&LONG_WICK_PARAM)?,
            short_wick_ratio: params.coefficient(&SHORT_WICK_PARAM)?,
            trend_bar_count: params.period(&TREND_BAR_COUNT_PARAM)?,
        })
    }
}
