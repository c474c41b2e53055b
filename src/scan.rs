//! Evaluating an indicator over a whole series
//!
//! The parallel variants query one shared indicator from the rayon pool. Each
//! index is independent, so the result equals the sequential one.

use std::ops::Range;

use rayon::prelude::*;

use crate::indicators::Indicator;
use crate::Result;

/// Indices whose values can be trusted: `unstable_bars..len`
pub fn stable_range<I: Indicator + ?Sized>(indicator: &I) -> Range<usize> {
    let len = indicator.len();
    indicator.unstable_bars().min(len)..len
}

/// Values for every index of `range`, in ascending order
pub fn values<I: Indicator + ?Sized>(indicator: &I, range: Range<usize>) -> Result<Vec<I::Output>> {
    range.map(|i| indicator.value(i)).collect()
}

/// Like [`values`], evaluated concurrently
pub fn par_values<I: Indicator + ?Sized>(
    indicator: &I,
    range: Range<usize>,
) -> Result<Vec<I::Output>> {
    range.into_par_iter().map(|i| indicator.value(i)).collect()
}

/// Indices of `range` where a boolean indicator is `true`
pub fn matches<I>(indicator: &I, range: Range<usize>) -> Result<Vec<usize>>
where
    I: Indicator<Output = bool> + ?Sized,
{
    let mut found = Vec::new();
    for i in range {
        if indicator.value(i)? {
            found.push(i);
        }
    }
    Ok(found)
}

/// Like [`matches`], evaluated concurrently
pub fn par_matches<I>(indicator: &I, range: Range<usize>) -> Result<Vec<usize>>
where
    I: Indicator<Output = bool> + ?Sized,
{
    let flags: Vec<bool> = par_values(indicator, range.clone())?;
    Ok(range.zip(flags).filter_map(|(i, hit)| hit.then_some(i)).collect())
}
