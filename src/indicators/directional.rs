//! Directional movement system (Wilder)
//!
//! True range, +DM/-DM, Wilder's moving average, +DI/-DI, DX and ADX. The
//! trend indicators are built on these.

use std::sync::Arc;

use super::{CachedIndicator, Formula, Indicator, RecursiveCachedIndicator, RecursiveFormula};
use crate::{BarSeries, IndicatorError, Num, Period, Result};

/// Which side of the directional movement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Plus,
    Minus,
}

// ============================================================
// TRUE RANGE
// ============================================================

/// Largest of `high - low`, `|high - previous close|` and `|previous close - low|`.
/// At index 0 only `high - low` applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueRange;

impl<N: Num> Formula<N> for TrueRange {
    type Output = N;

    fn calculate(&self, series: &BarSeries<N>, index: usize) -> Result<N> {
        let bar = series.bar(index)?;
        let range = (bar.high - bar.low).abs();
        if index == 0 {
            return Ok(range);
        }
        let previous_close = series.bar(index - 1)?.close;
        let to_high = (bar.high - previous_close).abs();
        let to_low = (previous_close - bar.low).abs();
        Ok(range.max(to_high).max(to_low))
    }
}

pub type TrueRangeIndicator<N> = CachedIndicator<N, TrueRange>;

impl<N: Num> TrueRangeIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>) -> Self {
        Self::with_formula(series, TrueRange)
    }
}

// ============================================================
// DIRECTIONAL MOVEMENT (+DM / -DM)
// ============================================================

/// +DM or -DM. Only the dominant, positive move of a bar counts; 0 at index 0.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalMove {
    pub side: Side,
}

impl<N: Num> Formula<N> for DirectionalMove {
    type Output = N;

    fn calculate(&self, series: &BarSeries<N>, index: usize) -> Result<N> {
        if index == 0 {
            return Ok(N::zero());
        }
        let bar = series.bar(index)?;
        let previous = series.bar(index - 1)?;
        let up_move = bar.high - previous.high;
        let down_move = previous.low - bar.low;

        let (dominant, other) = match self.side {
            Side::Plus => (up_move, down_move),
            Side::Minus => (down_move, up_move),
        };
        if dominant > other && dominant > N::zero() {
            Ok(dominant)
        } else {
            Ok(N::zero())
        }
    }
}

pub type DirectionalMoveIndicator<N> = CachedIndicator<N, DirectionalMove>;

impl<N: Num> DirectionalMoveIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>, side: Side) -> Self {
        Self::with_formula(series, DirectionalMove { side })
    }
}

// ============================================================
// WILDER'S MOVING AVERAGE
// ============================================================

/// Modified moving average, `previous + (current - previous) / bar_count`,
/// seeded with the first input value.
#[derive(Debug, Clone)]
pub struct Mma<I> {
    inner: I,
    bar_count: Period,
}

impl<I> Mma<I> {
    pub fn new(inner: I, bar_count: Period) -> Self {
        Self { inner, bar_count }
    }
}

impl<N, I> RecursiveFormula<N> for Mma<I>
where
    N: Num,
    I: Indicator<Output = N>,
{
    type Output = N;

    fn calculate(&self, _series: &BarSeries<N>, index: usize, previous: Option<&N>) -> Result<N> {
        let current = self.inner.value(index)?;
        let Some(&previous) = previous else {
            return Ok(current);
        };
        let step = (current - previous)
            .checked_div(N::from_usize(self.bar_count.get()))
            .ok_or(IndicatorError::Arithmetic {
                index,
                reason: "moving average step overflow",
            })?;
        previous.checked_add(step).ok_or(IndicatorError::Arithmetic {
            index,
            reason: "moving average overflow",
        })
    }

    fn unstable_bars(&self) -> usize {
        self.bar_count.get() + self.inner.unstable_bars()
    }
}

pub type MmaIndicator<N, I> = RecursiveCachedIndicator<N, Mma<I>>;

impl<N, I> MmaIndicator<N, I>
where
    N: Num,
    I: Indicator<Output = N>,
{
    /// Wilder average of any indicator over `series`
    pub fn over(series: Arc<BarSeries<N>>, inner: I, bar_count: Period) -> Self {
        Self::with_formula(series, Mma::new(inner, bar_count))
    }
}

/// Average true range
pub type AtrIndicator<N> = MmaIndicator<N, TrueRangeIndicator<N>>;

impl<N: Num> AtrIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>, bar_count: Period) -> Self {
        let true_range = TrueRangeIndicator::new(Arc::clone(&series));
        Self::over(series, true_range, bar_count)
    }
}

// ============================================================
// DIRECTIONAL INDEX (+DI / -DI)
// ============================================================

/// `ratio * 100`, with overflow reported at `index`
fn percent<N: Num>(ratio: N, index: usize, reason: &'static str) -> Result<N> {
    ratio
        .checked_mul(N::from_usize(100))
        .ok_or(IndicatorError::Arithmetic { index, reason })
}

/// `100 * MMA(DM) / ATR`; 0 while the ATR is 0 (no price movement yet)
#[derive(Debug)]
pub struct DirectionalIndex<N: Num> {
    side: Side,
    average_move: MmaIndicator<N, DirectionalMoveIndicator<N>>,
    atr: Arc<AtrIndicator<N>>,
    bar_count: Period,
}

impl<N: Num> DirectionalIndex<N> {
    pub fn new(series: &Arc<BarSeries<N>>, side: Side, bar_count: Period) -> Self {
        let atr = Arc::new(AtrIndicator::new(Arc::clone(series), bar_count));
        Self::with_atr(series, side, bar_count, atr)
    }

    /// Reuses an ATR of the same bar count, e.g. the one of the opposite side.
    pub fn with_atr(
        series: &Arc<BarSeries<N>>,
        side: Side,
        bar_count: Period,
        atr: Arc<AtrIndicator<N>>,
    ) -> Self {
        let moves = DirectionalMoveIndicator::new(Arc::clone(series), side);
        Self {
            side,
            average_move: MmaIndicator::over(Arc::clone(series), moves, bar_count),
            atr,
            bar_count,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn atr(&self) -> &Arc<AtrIndicator<N>> {
        &self.atr
    }
}

impl<N: Num> Formula<N> for DirectionalIndex<N> {
    type Output = N;

    fn calculate(&self, _series: &BarSeries<N>, index: usize) -> Result<N> {
        let atr = self.atr.value(index)?;
        if atr.is_zero() {
            return Ok(N::zero());
        }
        let ratio = self
            .average_move
            .value(index)?
            .checked_div(atr)
            .ok_or(IndicatorError::Arithmetic {
                index,
                reason: "directional index overflow",
            })?;
        percent(ratio, index, "directional index overflow")
    }

    fn unstable_bars(&self) -> usize {
        self.bar_count.get()
    }
}

pub type DirectionalIndexIndicator<N> = CachedIndicator<N, DirectionalIndex<N>>;

impl<N: Num> DirectionalIndexIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>, side: Side, bar_count: Period) -> Self {
        let formula = DirectionalIndex::new(&series, side, bar_count);
        Self::with_formula(series, formula)
    }

    /// +DI
    pub fn plus(series: Arc<BarSeries<N>>, bar_count: Period) -> Self {
        Self::new(series, Side::Plus, bar_count)
    }

    /// -DI
    pub fn minus(series: Arc<BarSeries<N>>, bar_count: Period) -> Self {
        Self::new(series, Side::Minus, bar_count)
    }
}

/// +DI and -DI over one shared ATR.
///
/// Both sides are behind an `Arc` so DX and the trend signals read the same
/// caches instead of recomputing DM, ATR and DI.
#[derive(Debug, Clone)]
pub struct DirectionalPair<N: Num> {
    pub plus: Arc<DirectionalIndexIndicator<N>>,
    pub minus: Arc<DirectionalIndexIndicator<N>>,
}

impl<N: Num> DirectionalPair<N> {
    pub fn new(series: &Arc<BarSeries<N>>, bar_count: Period) -> Self {
        let atr = Arc::new(AtrIndicator::new(Arc::clone(series), bar_count));
        let build = |side| {
            let formula = DirectionalIndex::with_atr(series, side, bar_count, Arc::clone(&atr));
            Arc::new(DirectionalIndexIndicator::with_formula(Arc::clone(series), formula))
        };
        Self {
            plus: build(Side::Plus),
            minus: build(Side::Minus),
        }
    }
}

// ============================================================
// DX / ADX
// ============================================================

/// `100 * |+DI - -DI| / (+DI + -DI)`; 0 when both are 0
#[derive(Debug)]
pub struct Dx<N: Num> {
    directional: DirectionalPair<N>,
}

impl<N: Num> Dx<N> {
    pub fn new(directional: DirectionalPair<N>) -> Self {
        Self { directional }
    }

    pub fn directional(&self) -> &DirectionalPair<N> {
        &self.directional
    }
}

impl<N: Num> Formula<N> for Dx<N> {
    type Output = N;

    fn calculate(&self, _series: &BarSeries<N>, index: usize) -> Result<N> {
        let plus = self.directional.plus.value(index)?;
        let minus = self.directional.minus.value(index)?;
        let sum = plus.checked_add(minus).ok_or(IndicatorError::Arithmetic {
            index,
            reason: "directional index sum overflow",
        })?;
        if sum.is_zero() {
            return Ok(N::zero());
        }
        let ratio = (plus - minus)
            .abs()
            .checked_div(sum)
            .ok_or(IndicatorError::Arithmetic {
                index,
                reason: "directional movement index overflow",
            })?;
        percent(ratio, index, "directional movement index overflow")
    }

    fn unstable_bars(&self) -> usize {
        self.directional.plus.unstable_bars()
    }
}

pub type DxIndicator<N> = CachedIndicator<N, Dx<N>>;

impl<N: Num> DxIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>, bar_count: Period) -> Self {
        let directional = DirectionalPair::new(&series, bar_count);
        Self::from_pair(series, directional)
    }

    pub fn from_pair(series: Arc<BarSeries<N>>, directional: DirectionalPair<N>) -> Self {
        Self::with_formula(series, Dx::new(directional))
    }
}

/// Average directional index: trend strength regardless of direction
pub type AdxIndicator<N> = MmaIndicator<N, DxIndicator<N>>;

impl<N: Num> AdxIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>, di_bar_count: Period, adx_bar_count: Period) -> Self {
        let dx = DxIndicator::new(Arc::clone(&series), di_bar_count);
        Self::over(series, dx, adx_bar_count)
    }
}
