//! Integration tests for the shadow-candle detectors on real trend signals.

use std::sync::Arc;

use candlewick::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Six bars with lower highs and lower lows, opening at 20, 19, ... 15
fn make_downtrend() -> Vec<Bar<Decimal>> {
    (0..6)
        .map(|i| {
            let open = dec!(20) - Decimal::from(i);
            Bar::new(open, open + dec!(0.2), open - dec!(0.7), open - dec!(0.5))
        })
        .collect()
}

/// Eight bars with higher highs and higher lows, opening at 50, 51, ... 57
fn make_uptrend() -> Vec<Bar<Decimal>> {
    (0..8)
        .map(|i| {
            let open = dec!(50) + Decimal::from(i);
            Bar::new(open, open + dec!(0.5), open - dec!(0.5), open + dec!(0.5))
        })
        .collect()
}

fn inverted_hammer_bar() -> Bar<Decimal> {
    Bar::new(dec!(10), dec!(12), dec!(9.9), dec!(10.2))
}

fn series(bars: Vec<Bar<Decimal>>) -> Arc<BarSeries<Decimal>> {
    Arc::new(BarSeries::from_bars("test", bars))
}

// ============================================================
// INVERTED HAMMER
// ============================================================

#[test]
fn test_inverted_hammer_after_downtrend() {
    let mut bars = make_downtrend();
    bars.push(inverted_hammer_bar());
    let series = series(bars);

    let detector = InvertedHammerIndicator::new(Arc::clone(&series));
    assert!(detector.value(6).unwrap(), "Inverted Hammer should be detected");
    assert_eq!(scan::matches(&detector, 0..series.len()).unwrap(), vec![6]);

    let down = TrendIndicator::down(series);
    assert!(down.value(6).unwrap());
}

#[test]
fn test_inverted_hammer_without_history() {
    let detector = InvertedHammerIndicator::new(series(vec![inverted_hammer_bar()]));
    // Shape matches but there is no down-trend at index 0.
    assert!(!detector.value(0).unwrap());
}

#[test]
fn test_inverted_hammer_needs_downtrend() {
    let mut bars = make_uptrend();
    bars.push(Bar::new(dec!(58), dec!(60), dec!(57.9), dec!(58.2)));
    let series = series(bars);

    let inverted = InvertedHammerIndicator::new(Arc::clone(&series));
    let shooting_star = ShootingStarIndicator::new(Arc::clone(&series));
    assert!(!inverted.value(8).unwrap());
    assert!(shooting_star.value(8).unwrap(), "Shooting Star should be detected");
}

#[test]
fn test_inverted_hammer_out_of_bounds() {
    let detector = InvertedHammerIndicator::new(series(make_downtrend()));
    assert_eq!(
        detector.value(6),
        Err(IndicatorError::OutOfBounds { index: 6, len: 6 })
    );
}

#[test]
fn test_inverted_hammer_unstable_bars() {
    let detector = InvertedHammerIndicator::new(series(make_downtrend()));
    assert_eq!(detector.unstable_bars(), 0);
    assert_eq!(scan::stable_range(&detector), 0..6);
}

#[test]
fn test_inverted_hammer_doji_body() {
    let mut bars = make_downtrend();
    bars.push(Bar::new(dec!(10), dec!(12), dec!(9.9), dec!(10)));
    let detector = InvertedHammerIndicator::new(series(bars));
    assert!(!detector.value(6).unwrap());
}

#[test]
fn test_inverted_hammer_after_malformed_history_does_not_panic() {
    // High and low below the body, then a true range of 1e-17: +DI exceeds
    // the decimal range.
    let huge = dec!(10000000000);
    let nudged = dec!(10000000000.00000000000000001);
    let bars = vec![
        Bar::new(huge, dec!(0), dec!(0), huge),
        Bar::new(nudged, nudged, nudged, nudged),
        inverted_hammer_bar(),
    ];
    let detector = InvertedHammerIndicator::new(series(bars));
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| detector.value(2)));
    assert!(matches!(result, Ok(Err(IndicatorError::Arithmetic { .. }))));
}

#[test]
fn test_streaming_bars() {
    let series = series(make_downtrend());
    let detector = InvertedHammerIndicator::new(Arc::clone(&series));
    assert!(scan::matches(&detector, 0..6).unwrap().is_empty());

    series.push(inverted_hammer_bar());
    assert_eq!(detector.len(), 7);
    assert!(detector.value(6).unwrap());
}

#[test]
fn test_bars_from_json() {
    let json = r#"[
        {"open": "20", "high": "20.2", "low": "19.3", "close": "19.5", "volume": "0"},
        {"open": "19", "high": "19.2", "low": "18.3", "close": "18.5", "volume": "0"},
        {"open": "18", "high": "18.2", "low": "17.3", "close": "17.5", "volume": "0"},
        {"open": "10", "high": "12", "low": "9.9", "close": "10.2", "volume": "0"}
    ]"#;
    let bars: Vec<Bar<Decimal>> = serde_json::from_str(json).unwrap();
    let detector = InvertedHammerIndicator::new(series(bars));
    assert!(detector.value(3).unwrap());
}

#[test]
fn test_configured_detector() {
    let mut bars = make_downtrend();
    bars.push(inverted_hammer_bar());
    let series = series(bars);

    // Upper wick ratio is 9; demanding more than 10 rejects the bar.
    let config: ShadowCandleConfig = serde_json::from_str(r#"{"long_wick_ratio": 10.0}"#).unwrap();
    let strict = InvertedHammerIndicator::with_config(Arc::clone(&series), &config).unwrap();
    assert!(!strict.value(6).unwrap());

    let default = InvertedHammerIndicator::with_config(series, &ShadowCandleConfig::default()).unwrap();
    assert!(default.value(6).unwrap());
}

// ============================================================
// HAMMER FAMILY
// ============================================================

#[test]
fn test_hammer_after_downtrend() {
    let mut bars = make_downtrend();
    // Small body at the top, long lower shadow
    bars.push(Bar::new(dec!(10), dec!(10.3), dec!(8), dec!(10.2)));
    let series = series(bars);

    let hammer = HammerIndicator::new(Arc::clone(&series));
    let hanging_man = HangingManIndicator::new(series);
    assert!(hammer.value(6).unwrap(), "Hammer should be detected");
    assert!(!hanging_man.value(6).unwrap());
}

#[test]
fn test_hanging_man_after_uptrend() {
    let mut bars = make_uptrend();
    bars.push(Bar::new(dec!(58), dec!(58.3), dec!(57.9), dec!(58.2)));
    // Needs a long lower wick while the highs keep rising
    bars.push(Bar::new(dec!(59), dec!(59.3), dec!(58.2), dec!(59.2)));
    let series = series(bars);

    let hanging_man = HangingManIndicator::new(Arc::clone(&series));
    assert!(hanging_man.value(9).unwrap(), "Hanging Man should be detected");
    assert!(!HammerIndicator::new(series).value(9).unwrap());
}

#[test]
fn test_parallel_scan_matches_sequential() {
    let mut bars = make_downtrend();
    bars.push(inverted_hammer_bar());
    bars.extend(make_uptrend());
    let series = series(bars);

    let sequential = InvertedHammerIndicator::new(Arc::clone(&series));
    let parallel = InvertedHammerIndicator::new(Arc::clone(&series));
    assert_eq!(
        scan::par_matches(&parallel, 0..series.len()).unwrap(),
        scan::matches(&sequential, 0..series.len()).unwrap()
    );
    assert_eq!(
        scan::par_values(&parallel, 0..series.len()).unwrap(),
        scan::values(&sequential, 0..series.len()).unwrap()
    );
}
