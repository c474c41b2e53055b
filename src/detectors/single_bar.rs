//! Single-bar shadow-candle detectors
//!
//! For a bar with body height `h = |close - open|`, a pattern holds when
//! `long_wick / h > long` and `short_wick / h <= short` (defaults 2.0 and 1.0)
//! and the gating trend indicator is `true` at the same index.
//!
//! A zero-height body never matches: the wick ratios are undefined, and the
//! comparison is skipped instead of dividing by zero. Bars are not checked for
//! OHLC consistency; a malformed bar gives a meaningless but stable result.

use std::sync::Arc;

use tracing::debug;

use super::helpers::{ShadowCandleConfig, WickRatios, WickSide, WickThresholds};
use crate::indicators::{
    CachedIndicator, Formula, Indicator, RealBodyIndicator, TrendDirection, TrendIndicator,
    DEFAULT_TREND_BAR_COUNT,
};
use crate::{BarSeries, Num, Result};

fn detect_shadow_candle<N, T>(
    series: &BarSeries<N>,
    index: usize,
    real_body: &RealBodyIndicator<N>,
    trend: &T,
    thresholds: &WickThresholds<N>,
    long_wick: WickSide,
) -> Result<bool>
where
    N: Num,
    T: Indicator<Output = bool>,
{
    let bar = series.bar(index)?;
    let body_height = real_body.value(index)?.abs();

    let Some(ratios) = WickRatios::of(&bar, body_height) else {
        debug!(index, %body_height, "degenerate real body, pattern rejected");
        return Ok(false);
    };

    Ok(ratios.matches(long_wick, thresholds) && trend.value(index)?)
}

/// Generates a detector formula, its cached indicator alias and constructors.
macro_rules! shadow_candle {
    (
        $(#[$meta:meta])*
        $formula:ident, $indicator:ident,
        long_wick = $long:ident,
        trend = $trend:ident $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $formula<N: Num, T = TrendIndicator<N>> {
            real_body: RealBodyIndicator<N>,
            trend: T,
            thresholds: WickThresholds<N>,
        }

        impl<N: Num> $formula<N> {
            pub fn new(series: &Arc<BarSeries<N>>) -> Self {
                let trend =
                    TrendIndicator::new(Arc::clone(series), TrendDirection::$trend, DEFAULT_TREND_BAR_COUNT);
                Self::with_trend(series, trend, WickThresholds::default())
            }

            pub fn with_config(series: &Arc<BarSeries<N>>, config: &ShadowCandleConfig) -> Result<Self> {
                let thresholds = WickThresholds::from_config(config)?;
                let trend =
                    TrendIndicator::new(Arc::clone(series), TrendDirection::$trend, config.trend_bar_count);
                Ok(Self::with_trend(series, trend, thresholds))
            }
        }

        impl<N: Num, T: Indicator<Output = bool>> $formula<N, T> {
            /// Gates the pattern on any boolean indicator instead of the built-in trend
            pub fn with_trend(series: &Arc<BarSeries<N>>, trend: T, thresholds: WickThresholds<N>) -> Self {
                Self {
                    real_body: RealBodyIndicator::new(Arc::clone(series)),
                    trend,
                    thresholds,
                }
            }

            pub fn thresholds(&self) -> &WickThresholds<N> {
                &self.thresholds
            }
        }

        impl<N: Num, T: Indicator<Output = bool>> Formula<N> for $formula<N, T> {
            type Output = bool;

            fn calculate(&self, series: &BarSeries<N>, index: usize) -> Result<bool> {
                detect_shadow_candle(
                    series,
                    index,
                    &self.real_body,
                    &self.trend,
                    &self.thresholds,
                    WickSide::$long,
                )
            }

            /// Self-contained per bar; the trend keeps its own warm-up.
            fn unstable_bars(&self) -> usize {
                0
            }
        }

        pub type $indicator<N, T = TrendIndicator<N>> = CachedIndicator<N, $formula<N, T>>;

        impl<N: Num> $indicator<N> {
            pub fn new(series: Arc<BarSeries<N>>) -> Self {
                let formula = $formula::new(&series);
                Self::with_formula(series, formula)
            }

            pub fn with_config(series: Arc<BarSeries<N>>, config: &ShadowCandleConfig) -> Result<Self> {
                let formula = $formula::with_config(&series, config)?;
                Ok(Self::with_formula(series, formula))
            }
        }
    };
}

shadow_candle! {
    /// Inverted hammer: long upper wick, short lower wick, during a down-trend
    InvertedHammer, InvertedHammerIndicator,
    long_wick = Upper,
    trend = Down,
}

shadow_candle! {
    /// Hammer: long lower wick, short upper wick, during a down-trend
    Hammer, HammerIndicator,
    long_wick = Lower,
    trend = Down,
}

shadow_candle! {
    /// Shooting star: inverted hammer shape during an up-trend
    ShootingStar, ShootingStarIndicator,
    long_wick = Upper,
    trend = Up,
}

shadow_candle! {
    /// Hanging man: hammer shape during an up-trend
    HangingMan, HangingManIndicator,
    long_wick = Lower,
    trend = Up,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{ConstantIndicator, FixedIndicator};
    use crate::{Bar, Coefficient, IndicatorError, Period};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn single(bar: Bar<Decimal>) -> Arc<BarSeries<Decimal>> {
        Arc::new(BarSeries::from_bars("single", vec![bar]))
    }

    fn inverted_hammer(bar: Bar<Decimal>, trend: bool) -> bool {
        let series = single(bar);
        let formula = InvertedHammer::with_trend(
            &series,
            ConstantIndicator::new(trend, 1),
            WickThresholds::default(),
        );
        CachedIndicator::with_formula(Arc::clone(&series), formula)
            .value(0)
            .unwrap()
    }

    fn hammer(bar: Bar<Decimal>, trend: bool) -> bool {
        let series = single(bar);
        let formula = Hammer::with_trend(&series, ConstantIndicator::new(trend, 1), WickThresholds::default());
        CachedIndicator::with_formula(Arc::clone(&series), formula)
            .value(0)
            .unwrap()
    }

    #[test]
    fn test_inverted_hammer_scenario() {
        let bar = Bar::new(dec!(10), dec!(12), dec!(9.9), dec!(10.2));
        assert!(inverted_hammer(bar, true));
        assert!(!inverted_hammer(bar, false));
    }

    #[test]
    fn test_bearish_body_is_measured_by_height() {
        // open 10.2, close 10: same geometry, negative real body
        let bar = Bar::new(dec!(10.2), dec!(12), dec!(9.9), dec!(10));
        assert!(inverted_hammer(bar, true));
    }

    #[test]
    fn test_upper_wick_threshold_is_strict() {
        // body 1, upper wick exactly 2
        let at_threshold = Bar::new(dec!(10), dec!(13), dec!(10), dec!(11));
        assert!(!inverted_hammer(at_threshold, true));
        let above = Bar::new(dec!(10), dec!(13.0001), dec!(10), dec!(11));
        assert!(inverted_hammer(above, true));
    }

    #[test]
    fn test_lower_wick_threshold_is_inclusive() {
        // body 1, upper wick 3, lower wick exactly 1
        let at_threshold = Bar::new(dec!(10), dec!(14), dec!(9), dec!(11));
        assert!(inverted_hammer(at_threshold, true));
        let above = Bar::new(dec!(10), dec!(14), dec!(8.9999), dec!(11));
        assert!(!inverted_hammer(above, true));
    }

    #[test]
    fn test_doji_body_never_matches() {
        let doji = Bar::new(dec!(10), dec!(15), dec!(10), dec!(10));
        assert!(!inverted_hammer(doji, true));
        assert!(!hammer(Bar::new(dec!(10), dec!(10), dec!(5), dec!(10)), true));
    }

    #[test]
    fn test_hammer_mirrors_inverted_hammer() {
        let bar = Bar::new(dec!(10), dec!(10.3), dec!(8), dec!(10.2));
        assert!(hammer(bar, true));
        assert!(!inverted_hammer(bar, true));
        assert!(!hammer(bar, false));
    }

    #[test]
    fn test_trend_not_queried_when_shape_fails() {
        let series = single(Bar::new(dec!(10), dec!(11), dec!(9), dec!(10.5)));
        // Empty trend would fail with OutOfBounds if queried.
        let formula = InvertedHammer::with_trend(
            &series,
            FixedIndicator::<bool>::new(Vec::new()),
            WickThresholds::default(),
        );
        let indicator = CachedIndicator::with_formula(Arc::clone(&series), formula);
        assert_eq!(indicator.value(0), Ok(false));
    }

    #[test]
    fn test_trend_errors_propagate() {
        let series = single(Bar::new(dec!(10), dec!(12), dec!(9.9), dec!(10.2)));
        let formula = InvertedHammer::with_trend(
            &series,
            FixedIndicator::<bool>::new(Vec::new()),
            WickThresholds::default(),
        );
        let indicator = CachedIndicator::with_formula(Arc::clone(&series), formula);
        assert_eq!(
            indicator.value(0),
            Err(IndicatorError::OutOfBounds { index: 0, len: 0 })
        );
        assert_eq!(indicator.cached_len(), 0);
    }

    #[test]
    fn test_with_config_thresholds() {
        let series = single(Bar::new(dec!(10), dec!(12), dec!(9.9), dec!(10.2)));
        let config = ShadowCandleConfig {
            long_wick_ratio: Coefficient::new(10.0).unwrap(),
            short_wick_ratio: Coefficient::new(0.25).unwrap(),
            trend_bar_count: Period::new(3).unwrap(),
        };
        let detector = InvertedHammerIndicator::with_config(series, &config).unwrap();
        assert_eq!(detector.formula().thresholds().long, dec!(10));
        assert_eq!(detector.unstable_bars(), 0);
    }

    #[test]
    fn test_works_on_f64() {
        let series = Arc::new(BarSeries::from_bars(
            "f64",
            vec![Bar::new(10.0_f64, 12.0, 9.9, 10.2)],
        ));
        let formula = InvertedHammer::with_trend(
            &series,
            ConstantIndicator::new(true, 1),
            WickThresholds::default(),
        );
        let indicator = CachedIndicator::with_formula(Arc::clone(&series), formula);
        assert!(indicator.value(0).unwrap());
    }
}
