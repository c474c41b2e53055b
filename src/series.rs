//! Bars and the append-only bar series indicators are bound to

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{check_bounds, IndicatorError, Num, Result};

// ============================================================
// BAR
// ============================================================

/// OHLC inconsistency found by [`Bar::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BarDefect {
    #[error("high < low")]
    HighBelowLow,
    #[error("high below real body")]
    HighBelowBody,
    #[error("low above real body")]
    LowAboveBody,
}

/// Open/high/low/close prices (and volume) of one time step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar<N> {
    pub open: N,
    pub high: N,
    pub low: N,
    pub close: N,
    pub volume: N,
}

impl<N: Num> Bar<N> {
    pub fn new(open: N, high: N, low: N, close: N) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: N::zero(),
        }
    }

    pub fn with_volume(mut self, volume: N) -> Self {
        self.volume = volume;
        self
    }

    /// Signed real body, `close - open`
    #[inline]
    pub fn real_body(&self) -> N {
        self.close - self.open
    }

    /// Upper boundary of the real body
    #[inline]
    pub fn body_top(&self) -> N {
        self.open.max(self.close)
    }

    /// Lower boundary of the real body
    #[inline]
    pub fn body_bottom(&self) -> N {
        self.open.min(self.close)
    }

    #[inline]
    pub fn upper_wick(&self) -> N {
        self.high - self.body_top()
    }

    #[inline]
    pub fn lower_wick(&self) -> N {
        self.body_bottom() - self.low
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Checks OHLC consistency.
    ///
    /// Indicators never call this: a malformed bar yields a meaningless but
    /// well-defined value. Validate at ingestion if that matters.
    pub fn validate(&self) -> std::result::Result<(), BarDefect> {
        if self.high < self.low {
            return Err(BarDefect::HighBelowLow);
        }
        if self.high < self.body_top() {
            return Err(BarDefect::HighBelowBody);
        }
        if self.low > self.body_bottom() {
            return Err(BarDefect::LowAboveBody);
        }
        Ok(())
    }
}

// ============================================================
// BAR SERIES
// ============================================================

/// Ordered, append-only sequence of bars. Index 0 is the oldest bar.
///
/// Shared between indicators through an `Arc`; bars pushed after an indicator
/// was created become addressable by it immediately.
#[derive(Debug)]
pub struct BarSeries<N> {
    name: String,
    bars: RwLock<Vec<Bar<N>>>,
}

impl<N: Num> BarSeries<N> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_bars(name, Vec::new())
    }

    pub fn from_bars(name: impl Into<String>, bars: Vec<Bar<N>>) -> Self {
        Self {
            name: name.into(),
            bars: RwLock::new(bars),
        }
    }

    /// Like [`BarSeries::from_bars`], rejecting the first malformed bar.
    pub fn validated(name: impl Into<String>, bars: Vec<Bar<N>>) -> Result<Self> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate()
                .map_err(|defect| IndicatorError::MalformedBar { index, defect })?;
        }
        Ok(Self::from_bars(name, bars))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bars.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bar at `index`, or [`IndicatorError::OutOfBounds`].
    pub fn bar(&self, index: usize) -> Result<Bar<N>> {
        let bars = self.bars.read().unwrap_or_else(PoisonError::into_inner);
        check_bounds(index, bars.len())?;
        Ok(bars[index])
    }

    /// Appends a bar. Already produced bars are never modified.
    pub fn push(&self, bar: Bar<N>) {
        let mut bars = self.bars.write().unwrap_or_else(PoisonError::into_inner);
        bars.push(bar);
        debug!(series = %self.name, len = bars.len(), "bar appended");
    }

    /// Copy of all bars currently in the series.
    pub fn snapshot(&self) -> Vec<Bar<N>> {
        self.bars.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
