//! Property tests for the numeric building blocks

use proptest::prelude::*;

use enviro_core::{
    buffer::CircularBuffer, correct_humidity, trend::Trend, CorrectionModel, HumidityLabel,
    LightLabel, PressureLabel, TemperatureRange, TrendAnalyzer,
};

proptest! {
    #[test]
    fn corrected_humidity_is_a_percentage(
        raw_humidity in -500.0f32..500.0,
        raw_temperature in -60.0f32..100.0,
        corrected_temperature in -60.0f32..100.0,
    ) {
        let humidity = correct_humidity(raw_humidity, raw_temperature, corrected_temperature);
        prop_assert!((0.0..=100.0).contains(&humidity));
    }

    #[test]
    fn correction_stays_finite(
        raws in prop::collection::vec(-40.0f32..85.0, 1..30),
        cpus in prop::collection::vec(prop::option::of(-20.0f32..110.0), 1..30),
    ) {
        let mut model = CorrectionModel::default();
        for (raw, cpu) in raws.iter().zip(cpus.iter().cycle()) {
            let reading = model.correct(*raw, 50.0, *cpu);
            prop_assert!(reading.temperature.is_finite());
            prop_assert!(model.cpu_history_len() <= 5);
        }
    }

    #[test]
    fn buffer_never_exceeds_capacity(values in prop::collection::vec(any::<u32>(), 0..100)) {
        let mut buffer = CircularBuffer::<u32, 16>::new();
        for v in &values {
            buffer.push(*v);
        }

        prop_assert_eq!(buffer.len(), values.len().min(16));
        let kept: Vec<u32> = buffer.iter().copied().collect();
        let expected: Vec<u32> = values.iter().rev().take(16).rev().copied().collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn trend_window_is_bounded(
        pressures in prop::collection::vec(950.0f32..1050.0, 1..120),
    ) {
        let mut analyzer = TrendAnalyzer::<32>::new();
        for (i, p) in pressures.iter().enumerate() {
            let result = analyzer.analyze(i as u64 * 1000, *p);
            prop_assert!(analyzer.len() <= 32);
            prop_assert!(result.mean_pressure.is_finite());
            prop_assert!(result.change_per_hour.is_finite());
        }
    }

    #[test]
    fn symbol_only_changes_with_confidence(
        pressures in prop::collection::vec(990.0f32..1030.0, 40..120),
    ) {
        let mut analyzer = TrendAnalyzer::<16>::new();
        let mut previous = analyzer.current();
        for (i, p) in pressures.iter().enumerate() {
            let result = analyzer.analyze(i as u64 * 1000, *p);
            match result.r_squared {
                Some(r2) if r2 > 0.5 => {
                    prop_assert_eq!(result.trend, Trend::from_change_per_hour(result.change_per_hour));
                }
                Some(_) => prop_assert_eq!(result.trend, previous),
                None => prop_assert_eq!(result.trend, Trend::Steady),
            }
            previous = result.trend;
        }
    }

    #[test]
    fn small_changes_are_never_directional(change in -0.5f64..=0.5) {
        prop_assert_eq!(Trend::from_change_per_hour(change), Trend::Steady);
    }

    #[test]
    fn large_changes_are_doubled(change in 3.0001f64..100.0, negative in any::<bool>()) {
        let change = if negative { -change } else { change };
        prop_assert!(Trend::from_change_per_hour(change).is_rapid());
        prop_assert_eq!(Trend::from_change_per_hour(change).symbol().len(), 2);
    }

    #[test]
    fn classifiers_are_pure(value in -100.0f32..200_000.0) {
        prop_assert_eq!(PressureLabel::from_hpa(value), PressureLabel::from_hpa(value));
        prop_assert_eq!(HumidityLabel::from_percent(value), HumidityLabel::from_percent(value));
        prop_assert_eq!(LightLabel::from_lux(value), LightLabel::from_lux(value));
    }

    #[test]
    fn range_only_widens(
        temperatures in prop::collection::vec(-30.0f32..50.0, 1..200),
    ) {
        let mut range = TemperatureRange::new(0, 30_000);
        let mut previous: Option<(f32, f32)> = None;

        for (i, t) in temperatures.iter().enumerate() {
            let now = i as u64 * 1000;
            range.update(now, *t);

            if now <= 30_000 {
                prop_assert_eq!(range.bounds(), None);
            }
            if let (Some((pmin, pmax)), Some((min, max))) = (previous, range.bounds()) {
                prop_assert!(min <= pmin);
                prop_assert!(max >= pmax);
            }
            previous = range.bounds().or(previous);
        }
    }
}
