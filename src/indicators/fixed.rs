//! Indicators over precomputed values
//!
//! Useful to feed externally computed signals into detectors.

use super::Indicator;
use crate::{check_bounds, Result};

/// Same value at every index of a series of `len` bars
#[derive(Debug, Clone)]
pub struct ConstantIndicator<T> {
    value: T,
    len: usize,
}

impl<T> ConstantIndicator<T> {
    pub fn new(value: T, len: usize) -> Self {
        Self { value, len }
    }
}

impl<T: Clone + Send + Sync> Indicator for ConstantIndicator<T> {
    type Output = T;

    fn value(&self, index: usize) -> Result<T> {
        check_bounds(index, self.len)?;
        Ok(self.value.clone())
    }

    fn unstable_bars(&self) -> usize {
        0
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// One stored value per index
#[derive(Debug, Clone, Default)]
pub struct FixedIndicator<T> {
    values: Vec<T>,
}

impl<T> FixedIndicator<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T> FromIterator<T> for FixedIndicator<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Clone + Send + Sync> Indicator for FixedIndicator<T> {
    type Output = T;

    fn value(&self, index: usize) -> Result<T> {
        check_bounds(index, self.values.len())?;
        Ok(self.values[index].clone())
    }

    fn unstable_bars(&self) -> usize {
        0
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
