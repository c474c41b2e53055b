//! Building configurations from flat `name -> f64` settings
//!
//! A configuration lists its tunable fields as [`ParamSpec`]s. [`ParamSet`]
//! checks a settings map against those specs once, then hands out validated
//! [`Coefficient`]s and [`Period`]s, using the spec default for missing names.
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use candlewick::prelude::*;
//!
//! let settings = HashMap::from([("long_wick_ratio", 3.0)]);
//! let config = ShadowCandleConfig::from_params(&settings).unwrap();
//! assert_eq!(config.long_wick_ratio.get(), 3.0);
//!
//! let typo = HashMap::from([("long_wik_ratio", 3.0)]);
//! assert!(ShadowCandleConfig::from_params(&typo).is_err());
//! ```

use std::collections::HashMap;

use tracing::warn;

use crate::{Coefficient, IndicatorError, Period, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Non-negative multiplier
    Coefficient,
    /// Positive whole number of bars
    Period,
}

/// One tunable field: its name, kind, default and accepted bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: f64,
    /// Inclusive
    pub min: f64,
    /// Inclusive
    pub max: f64,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn coefficient(
        name: &'static str,
        default: f64,
        min: f64,
        max: f64,
        description: &'static str,
    ) -> Self {
        Self { name, kind: ParamKind::Coefficient, default, min, max, description }
    }

    pub const fn period(
        name: &'static str,
        default: f64,
        min: f64,
        max: f64,
        description: &'static str,
    ) -> Self {
        Self { name, kind: ParamKind::Period, default, min, max, description }
    }

    /// Accepts `value` if it lies within the bounds and fits the kind.
    pub fn check(&self, value: f64) -> Result<f64> {
        if !(self.min..=self.max).contains(&value) {
            return Err(IndicatorError::OutOfRange {
                field: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        match self.kind {
            ParamKind::Coefficient => Coefficient::new(value).map(Coefficient::get),
            ParamKind::Period if value.fract() != 0.0 => {
                Err(IndicatorError::InvalidValue("Period must be a whole number of bars"))
            }
            ParamKind::Period => Period::new(value as usize).map(|_| value),
        }
    }
}

/// A settings map checked against a fixed list of specs.
#[derive(Debug, Clone, Copy)]
pub struct ParamSet<'a> {
    values: &'a HashMap<&'a str, f64>,
}

impl<'a> ParamSet<'a> {
    /// Fails on the first name that none of `specs` declares.
    pub fn new(values: &'a HashMap<&'a str, f64>, specs: &[ParamSpec]) -> Result<Self> {
        if let Some(unknown) = values.keys().find(|name| !specs.iter().any(|s| s.name == **name)) {
            warn!(param = *unknown, "unknown parameter");
            return Err(IndicatorError::InvalidConfig(format!("unknown parameter `{unknown}`")));
        }
        Ok(Self { values })
    }

    fn value(&self, spec: &ParamSpec) -> Result<f64> {
        let Some(&value) = self.values.get(spec.name) else {
            return Ok(spec.default);
        };
        spec.check(value).inspect_err(|e| {
            warn!(param = spec.name, value, error = %e, "rejected parameter");
        })
    }

    pub fn coefficient(&self, spec: &ParamSpec) -> Result<Coefficient> {
        Coefficient::new(self.value(spec)?)
    }

    pub fn period(&self, spec: &ParamSpec) -> Result<Period> {
        Period::new(self.value(spec)? as usize)
    }
}

/// Configurations that can be built from a flat settings map
pub trait FromParams: Sized {
    fn param_specs() -> &'static [ParamSpec];

    /// Missing names take their spec default; unknown names are rejected.
    fn from_params(values: &HashMap<&str, f64>) -> Result<Self>;
}
