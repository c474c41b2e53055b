//! Memoizing evaluation of indicator formulas
//!
//! [`CachedIndicator`] wraps a [`Formula`] whose value at an index depends only
//! on the series (and other indicators). [`RecursiveCachedIndicator`] wraps a
//! [`RecursiveFormula`] whose value also depends on its own previous value.
//!
//! Caches grow with the set of distinct indices queried and are released with
//! the indicator. Cached values stay valid because a series only ever grows.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::trace;

use super::Indicator;
use crate::{check_bounds, BarSeries, Num, Result};

// ============================================================
// FORMULAS
// ============================================================

/// Pure per-index computation of an indicator
pub trait Formula<N: Num>: Send + Sync {
    type Output: Clone + Send + Sync;

    fn calculate(&self, series: &BarSeries<N>, index: usize) -> Result<Self::Output>;

    fn unstable_bars(&self) -> usize {
        0
    }
}

/// Per-index computation that continues from the value at `index - 1`.
///
/// `previous` is `None` exactly at index 0.
pub trait RecursiveFormula<N: Num>: Send + Sync {
    type Output: Clone + Send + Sync;

    fn calculate(
        &self,
        series: &BarSeries<N>,
        index: usize,
        previous: Option<&Self::Output>,
    ) -> Result<Self::Output>;

    fn unstable_bars(&self) -> usize {
        0
    }
}

/// Adapts a closure `(series, index) -> Result<T>` into a [`Formula`]
pub struct FnFormula<F> {
    f: F,
    unstable_bars: usize,
}

impl<F> FnFormula<F> {
    pub fn new(f: F) -> Self {
        Self { f, unstable_bars: 0 }
    }

    pub fn with_unstable_bars(mut self, unstable_bars: usize) -> Self {
        self.unstable_bars = unstable_bars;
        self
    }
}

impl<F> fmt::Debug for FnFormula<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormula")
            .field("unstable_bars", &self.unstable_bars)
            .finish_non_exhaustive()
    }
}

impl<N, T, F> Formula<N> for FnFormula<F>
where
    N: Num,
    T: Clone + Send + Sync,
    F: Fn(&BarSeries<N>, usize) -> Result<T> + Send + Sync,
{
    type Output = T;

    fn calculate(&self, series: &BarSeries<N>, index: usize) -> Result<T> {
        (self.f)(series, index)
    }

    fn unstable_bars(&self) -> usize {
        self.unstable_bars
    }
}

// ============================================================
// CACHED INDICATOR
// ============================================================

/// Indicator computing each index at most once over its lifetime.
///
/// Concurrent first queries of the same index may both run the formula; the
/// first stored value wins and every caller gets it. The formula is
/// deterministic, so the loser only wastes work.
pub struct CachedIndicator<N: Num, F: Formula<N>> {
    series: Arc<BarSeries<N>>,
    formula: F,
    cache: RwLock<HashMap<usize, F::Output>>,
}

impl<N: Num, F: Formula<N>> CachedIndicator<N, F> {
    pub fn with_formula(series: Arc<BarSeries<N>>, formula: F) -> Self {
        Self {
            series,
            formula,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn series(&self) -> &Arc<BarSeries<N>> {
        &self.series
    }

    pub fn formula(&self) -> &F {
        &self.formula
    }

    /// Number of indices computed so far
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_cached(&self, index: usize) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&index)
    }
}

impl<N, T, F> CachedIndicator<N, FnFormula<F>>
where
    N: Num,
    T: Clone + Send + Sync,
    F: Fn(&BarSeries<N>, usize) -> Result<T> + Send + Sync,
{
    /// Cached indicator over an ad-hoc closure
    pub fn from_fn(series: Arc<BarSeries<N>>, f: F) -> Self {
        Self::with_formula(series, FnFormula::new(f))
    }
}

impl<N: Num, F: Formula<N>> Indicator for CachedIndicator<N, F> {
    type Output = F::Output;

    fn value(&self, index: usize) -> Result<F::Output> {
        check_bounds(index, self.series.len())?;

        if let Some(value) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&index)
        {
            return Ok(value.clone());
        }

        trace!(index, "cache miss");
        let value = self.formula.calculate(&self.series, index)?;

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(index).or_insert(value).clone())
    }

    fn unstable_bars(&self) -> usize {
        self.formula.unstable_bars()
    }

    fn len(&self) -> usize {
        self.series.len()
    }
}

impl<N: Num, F: Formula<N> + fmt::Debug> fmt::Debug for CachedIndicator<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedIndicator")
            .field("series", &self.series.name())
            .field("formula", &self.formula)
            .field("cached", &self.cached_len())
            .finish()
    }
}

// ============================================================
// RECURSIVE CACHED INDICATOR
// ============================================================

/// Indicator for self-referencing formulas.
///
/// A miss at `index` fills every uncached index between the nearest cached
/// index below it and `index`, in ascending order and without recursion. The
/// cache stays locked during the fill, so each index is computed exactly once.
pub struct RecursiveCachedIndicator<N: Num, F: RecursiveFormula<N>> {
    series: Arc<BarSeries<N>>,
    formula: F,
    cache: Mutex<BTreeMap<usize, F::Output>>,
}

impl<N: Num, F: RecursiveFormula<N>> RecursiveCachedIndicator<N, F> {
    pub fn with_formula(series: Arc<BarSeries<N>>, formula: F) -> Self {
        Self {
            series,
            formula,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn series(&self) -> &Arc<BarSeries<N>> {
        &self.series
    }

    pub fn formula(&self) -> &F {
        &self.formula
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<N: Num, F: RecursiveFormula<N>> Indicator for RecursiveCachedIndicator<N, F> {
    type Output = F::Output;

    fn value(&self, index: usize) -> Result<F::Output> {
        check_bounds(index, self.series.len())?;

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = cache.get(&index) {
            return Ok(value.clone());
        }

        let (start, mut previous) = match cache.range(..index).next_back() {
            Some((&i, value)) => (i + 1, Some(value.clone())),
            None => (0, None),
        };
        trace!(start, index, "filling recursive cache");

        for i in start..index {
            let value = self.formula.calculate(&self.series, i, previous.as_ref())?;
            cache.insert(i, value.clone());
            previous = Some(value);
        }

        let value = self
            .formula
            .calculate(&self.series, index, previous.as_ref())?;
        cache.insert(index, value.clone());
        Ok(value)
    }

    fn unstable_bars(&self) -> usize {
        self.formula.unstable_bars()
    }

    fn len(&self) -> usize {
        self.series.len()
    }
}

impl<N: Num, F: RecursiveFormula<N> + fmt::Debug> fmt::Debug for RecursiveCachedIndicator<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveCachedIndicator")
            .field("series", &self.series.name())
            .field("formula", &self.formula)
            .field("cached", &self.cached_len())
            .finish()
    }
}

// ============================================================
// TESTS
// ============================================================
