//! # candlewick - lazily evaluated candlestick indicators
//!
//! Indicators are pure `index -> value` formulas over a shared [`BarSeries`].
//! Each indicator owns a memoizing cache, so a value is computed at most once
//! per index no matter how often or in which order it is queried.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use candlewick::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let series: Arc<BarSeries<Decimal>> = Arc::new(BarSeries::new("EURUSD"));
//! series.push(Bar::new(
//!     Decimal::new(100, 1),
//!     Decimal::new(120, 1),
//!     Decimal::new(99, 1),
//!     Decimal::new(102, 1),
//! ));
//!
//! let hammer = InvertedHammerIndicator::new(Arc::clone(&series));
//! assert_eq!(hammer.unstable_bars(), 0);
//! // A single bar has no preceding down-trend.
//! assert!(!hammer.value(0).unwrap());
//! ```

pub mod detectors;
pub mod indicators;
pub mod num;
pub mod params;
pub mod scan;
pub mod series;

pub use num::Num;
pub use series::{Bar, BarDefect, BarSeries};

pub mod prelude {
    pub use crate::{
        // Detectors
        detectors::*,
        // Indicators
        indicators::*,
        // Parameters
        params::{FromParams, ParamKind, ParamSet, ParamSpec},
        // Scanning
        scan,
        // Types
        Bar,
        BarDefect,
        BarSeries,
        Coefficient,
        // Errors
        IndicatorError,
        Num,
        Period,
        Result,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Errors that can occur while evaluating indicators
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("Index {index} out of bounds for series of {len} bars")]
    OutOfBounds { index: usize, len: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Malformed bar at index {index}: {defect}")]
    MalformedBar { index: usize, defect: BarDefect },

    #[error("Arithmetic fault at index {index}: {reason}")]
    Arithmetic { index: usize, reason: &'static str },
}

/// Fails with [`IndicatorError::OutOfBounds`] unless `index < len`.
#[inline]
pub(crate) fn check_bounds(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(IndicatorError::OutOfBounds { index, len })
    }
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Non-negative, finite multiplier (wick-to-body ratios and the like)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Coefficient(f64);

impl Coefficient {
    /// Create a new Coefficient, validating the value is finite and >= 0.0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(IndicatorError::InvalidValue(
                "Coefficient cannot be NaN or infinite",
            ));
        }
        if value < 0.0 {
            return Err(IndicatorError::OutOfRange {
                field: "Coefficient",
                value,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Create a Coefficient from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Converts into the numeric backend of a series.
    pub fn to_num<N: Num>(self, field: &'static str) -> Result<N> {
        N::from_f64(self.0).ok_or_else(|| {
            IndicatorError::InvalidConfig(format!("{field} = {} is not representable", self.0))
        })
    }
}

impl serde::Serialize for Coefficient {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Coefficient {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Coefficient::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(IndicatorError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// TESTS
// ============================================================
