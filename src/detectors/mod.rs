//! Candlestick pattern detectors
//!
//! Each detector is a boolean [`Formula`](crate::indicators::Formula) wrapped in a
//! [`CachedIndicator`](crate::indicators::CachedIndicator), so pattern results are
//! memoized per index like any other indicator.
//!
//! # Shadow candles
//!
//! Small real body with one long and one short wick, gated by a trend:
//!
//! | Pattern        | Long wick | Trend |
//! |----------------|-----------|-------|
//! | Inverted Hammer| upper     | down  |
//! | Hammer         | lower     | down  |
//! | Shooting Star  | upper     | up    |
//! | Hanging Man    | lower     | up    |

pub mod helpers;
pub mod single_bar;

pub use helpers::*;
pub use single_bar::*;
