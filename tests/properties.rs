//! Property tests for the trend detector.

use proptest::prelude::*;
use vpscan::prelude::*;

/// Aligned, strictly positive volume/price series
fn series(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((1.0f64..1_000_000.0, 1.0f64..10_000.0), 0..max_len)
        .prop_map(|pairs| {
            let (volumes, prices): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            (volumes, prices)
        })
}

fn config() -> impl Strategy<Value = ScanConfig> {
    (1usize..6, 0usize..4, 0.0f64..20.0, 0.0f64..5.0, 0u8..3).prop_map(
        |(min, extra, vol, price, dir)| {
            let direction = match dir {
                0 => DirectionFilter::Bullish,
                1 => DirectionFilter::Bearish,
                _ => DirectionFilter::Both,
            };
            ScanConfig::builder()
                .windows(min, min + extra)
                .min_volume_change_pct(vol)
                .min_price_change_pct(price)
                .direction(direction)
                .build()
                .unwrap()
        },
    )
}

fn is_up(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] >= w[0])
}

fn is_down(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] <= w[0])
}

proptest! {
    #[test]
    fn short_series_yield_nothing(
        (volumes, prices) in series(30),
        config in config(),
        cut in any::<prop::sample::Index>(),
    ) {
        let n = cut.index(config.min_window.get()).min(volumes.len());
        prop_assert!(detect(&volumes[..n], &prices[..n], &config).unwrap().is_empty());
    }

    #[test]
    fn matches_are_monotonic_in_claimed_direction(
        (volumes, prices) in series(30),
        config in config(),
    ) {
        for p in detect(&volumes, &prices, &config).unwrap() {
            prop_assert_eq!(&p.volumes[..], &volumes[p.window.range()]);
            prop_assert_eq!(&p.prices[..], &prices[p.window.range()]);
            match p.direction {
                Direction::Bullish => {
                    prop_assert!(is_up(&p.volumes) && is_up(&p.prices));
                    prop_assert!(p.price_change_pct >= config.min_price_change_pct.get());
                }
                Direction::Bearish => {
                    prop_assert!(is_down(&p.volumes) && is_down(&p.prices));
                    prop_assert!(p.price_change_pct <= -config.min_price_change_pct.get());
                }
            }
            prop_assert!(p.volume_change_pct.abs() >= config.min_volume_change_pct.get());
            prop_assert!(config.direction.accepts(p.direction));
        }
    }

    #[test]
    fn windows_respect_bounds((volumes, prices) in series(30), config in config()) {
        for p in detect(&volumes, &prices, &config).unwrap() {
            prop_assert!(p.candles() >= config.min_window.get());
            prop_assert!(p.candles() <= config.max_window.get());
            prop_assert!(p.window.end < volumes.len());
        }
    }

    #[test]
    fn confidence_is_bounded((volumes, prices) in series(30), config in config()) {
        for p in detect(&volumes, &prices, &config).unwrap() {
            prop_assert!((50..=95).contains(&p.confidence));
            prop_assert!(p.volume_change_pct.is_finite());
            prop_assert!(p.price_change_pct.is_finite());
        }
    }

    #[test]
    fn detection_is_deterministic((volumes, prices) in series(30), config in config()) {
        let first = detect(&volumes, &prices, &config).unwrap();
        let second = detect(&volumes, &prices, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn zero_values_never_leak_non_finite(
        (mut volumes, mut prices) in series(20),
        zero_at in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!volumes.is_empty());
        let i = zero_at.index(volumes.len());
        volumes[i] = 0.0;
        prices[i] = 0.0;
        for p in detect(&volumes, &prices, &ScanConfig::default()).unwrap() {
            prop_assert!(p.window.start != i);
            prop_assert!(p.volume_change_pct.is_finite());
        }
    }

    #[test]
    fn mismatched_lengths_fail(
        (volumes, prices) in series(20),
        extra in 1usize..4,
    ) {
        let mut longer = prices.clone();
        longer.extend(std::iter::repeat(1.0).take(extra));
        let err = detect(&volumes, &longer, &ScanConfig::default()).unwrap_err();
        prop_assert!(err.is_invalid_input());
    }

    #[test]
    fn ranking_is_descending((volumes, prices) in series(30)) {
        let mut patterns = detect(&volumes, &prices, &ScanConfig::default()).unwrap();
        rank(&mut patterns);
        prop_assert!(patterns.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }
}
