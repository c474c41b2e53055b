//! Trend signals from the directional movement system
//!
//! A down-trend holds at an index when the ADX shows a trending market
//! (`ADX > 20`) and -DI dominates +DI. An up-trend mirrors it.

use std::sync::Arc;

use super::{AdxIndicator, CachedIndicator, DirectionalPair, DxIndicator, Formula, Indicator};
use crate::{BarSeries, Num, Period, Result};

/// Bar count of the DI/ADX averages behind the trend signals
pub const DEFAULT_TREND_BAR_COUNT: Period = Period::new_const(5);

/// ADX level above which the market counts as trending
pub const ADX_TREND_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrendDirection {
    Down,
    Up,
}

#[derive(Debug)]
pub struct Trend<N: Num> {
    direction: TrendDirection,
    adx: AdxIndicator<N>,
    directional: DirectionalPair<N>,
    bar_count: Period,
    threshold: N,
}

impl<N: Num> Trend<N> {
    pub fn new(series: &Arc<BarSeries<N>>, direction: TrendDirection, bar_count: Period) -> Self {
        let directional = DirectionalPair::new(series, bar_count);
        let dx = DxIndicator::from_pair(Arc::clone(series), directional.clone());
        Self {
            direction,
            adx: AdxIndicator::over(Arc::clone(series), dx, bar_count),
            directional,
            bar_count,
            threshold: N::from_usize(ADX_TREND_THRESHOLD),
        }
    }

    pub fn direction(&self) -> TrendDirection {
        self.direction
    }

    /// The +DI/-DI pair, shared with the ADX
    pub fn directional(&self) -> &DirectionalPair<N> {
        &self.directional
    }
}

impl<N: Num> Formula<N> for Trend<N> {
    type Output = bool;

    fn calculate(&self, _series: &BarSeries<N>, index: usize) -> Result<bool> {
        if self.adx.value(index)? <= self.threshold {
            return Ok(false);
        }
        let plus = self.directional.plus.value(index)?;
        let minus = self.directional.minus.value(index)?;
        Ok(match self.direction {
            TrendDirection::Down => minus > plus,
            TrendDirection::Up => plus > minus,
        })
    }

    fn unstable_bars(&self) -> usize {
        self.bar_count.get()
    }
}

pub type TrendIndicator<N> = CachedIndicator<N, Trend<N>>;

impl<N: Num> TrendIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>, direction: TrendDirection, bar_count: Period) -> Self {
        let formula = Trend::new(&series, direction, bar_count);
        Self::with_formula(series, formula)
    }

    /// Down-trend signal with the default bar count
    pub fn down(series: Arc<BarSeries<N>>) -> Self {
        Self::new(series, TrendDirection::Down, DEFAULT_TREND_BAR_COUNT)
    }

    /// Up-trend signal with the default bar count
    pub fn up(series: Arc<BarSeries<N>>) -> Self {
        Self::new(series, TrendDirection::Up, DEFAULT_TREND_BAR_COUNT)
    }
}
