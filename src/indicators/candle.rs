//! Single-candle geometry indicators

use std::sync::Arc;

use super::{CachedIndicator, Formula};
use crate::{BarSeries, Num, Result};

/// Signed real body, `close - open`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealBody;

impl<N: Num> Formula<N> for RealBody {
    type Output = N;

    fn calculate(&self, series: &BarSeries<N>, index: usize) -> Result<N> {
        Ok(series.bar(index)?.real_body())
    }
}

pub type RealBodyIndicator<N> = CachedIndicator<N, RealBody>;

impl<N: Num> RealBodyIndicator<N> {
    pub fn new(series: Arc<BarSeries<N>>) -> Self {
        Self::with_formula(series, RealBody)
    }
}
