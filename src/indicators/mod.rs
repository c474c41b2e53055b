//! Index-addressed indicators
//!
//! An indicator maps a bar index to a value. Concrete indicators are plain
//! formulas wrapped in [`CachedIndicator`] or [`RecursiveCachedIndicator`],
//! which own the memoization; formulas never see each other's caches, only
//! each other's [`Indicator::value`].
//!
//! # Families
//!
//! - **Candle**: [`RealBody`]
//! - **Directional movement**: [`TrueRange`], [`DirectionalMove`], [`Mma`],
//!   [`DirectionalIndex`], [`DirectionalPair`], [`Dx`] and the ATR/ADX aliases
//! - **Trend**: [`Trend`] (down-trend / up-trend signals)
//! - **Fixed**: [`ConstantIndicator`], [`FixedIndicator`] for external signals

use std::sync::Arc;

use crate::Result;

pub mod cached;
pub mod candle;
pub mod directional;
pub mod fixed;
pub mod trend;

pub use cached::*;
pub use candle::*;
pub use directional::*;
pub use fixed::*;
pub use trend::*;

/// A value per bar index
pub trait Indicator: Send + Sync {
    type Output: Clone + Send + Sync;

    /// Value at `index`. Fails with `OutOfBounds` for `index >= len()`.
    fn value(&self, index: usize) -> Result<Self::Output>;

    /// Number of leading indices whose value lacks enough history to be trusted.
    /// Values there are still returned unchanged.
    fn unstable_bars(&self) -> usize;

    /// Number of addressable indices (current length of the bound series).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<I: Indicator + ?Sized> Indicator for &I {
    type Output = I::Output;

    fn value(&self, index: usize) -> Result<Self::Output> {
        (**self).value(index)
    }

    fn unstable_bars(&self) -> usize {
        (**self).unstable_bars()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<I: Indicator + ?Sized> Indicator for Arc<I> {
    type Output = I::Output;

    fn value(&self, index: usize) -> Result<Self::Output> {
        (**self).value(index)
    }

    fn unstable_bars(&self) -> usize {
        (**self).unstable_bars()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
