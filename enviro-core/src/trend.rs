//! Barometric Trend Detection with a Sliding-Window Regression
//!
//! ## Why Not Single-Tick Deltas?
//!
//! A BME280 resolves ~0.01 hPa but its tick-to-tick noise is several times
//! that, while a weather front moves pressure by 1-3 hPa per *hour*. Comparing
//! consecutive samples would flap between rising and falling on noise alone.
//!
//! Instead the analyzer keeps the last `N` (default 1000) `(timestamp, pressure)`
//! samples and fits an ordinary least-squares line through them:
//!
//! ```text
//! pressure = slope × t + intercept          (t in seconds)
//! change_per_hour = slope × 3600
//! ```
//!
//! ## Confidence Gate
//!
//! The fit is only trusted when it explains most of the variance in the window:
//!
//! ```text
//! variance          = population variance of pressures
//! residual_variance = population variance of (fitted - actual)
//! r²                = 1 - residual_variance / variance
//! ```
//!
//! A flat window has zero variance. Rather than divide by zero, r² is defined
//! as 0 there, which reads as "no confidence".
//!
//! ## Sticky Classification
//!
//! ```text
//! r² > 0.5 ?
//!   ├─ no  → keep the previous symbol
//!   └─ yes → change >  0.5 hPa/h → rising   (>  3 hPa/h → rapid rise)
//!            change < -0.5 hPa/h → falling  (< -3 hPa/h → rapid fall)
//!            otherwise           → steady
//! ```
//!
//! Keeping the last confident symbol through noisy stretches means the display
//! does not lose a real trend just because one window happened to be messy.
//!
//! ## Warm-Up
//!
//! Until the window is full no regression is attempted: the result carries the
//! running mean, a zero rate and the steady symbol.

use core::fmt;

use crate::{
    buffer::CircularBuffer,
    constants::{
        thresholds::{
            TREND_CONFIDENCE_MIN_R2, TREND_RAPID_HPA_PER_HOUR, TREND_STEADY_HPA_PER_HOUR,
            TREND_WINDOW_CAPACITY,
        },
        time::SECONDS_PER_HOUR,
    },
    time::{as_seconds, Timestamp},
};

/// One entry of the trend window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressurePoint {
    /// Capture time in milliseconds
    pub timestamp: Timestamp,
    /// Pressure (hPa)
    pub pressure: f32,
}

/// Direction of the barometric trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Trend {
    /// Falling faster than 3 hPa/h
    RapidFall,
    /// Falling faster than 0.5 hPa/h
    Falling,
    /// Within ±0.5 hPa/h, or not enough history yet
    #[default]
    Steady,
    /// Rising faster than 0.5 hPa/h
    Rising,
    /// Rising faster than 3 hPa/h
    RapidRise,
}

impl Trend {
    /// Classify an hourly pressure change
    pub fn from_change_per_hour(change_per_hour: f64) -> Self {
        let rapid = libm::fabs(change_per_hour) > TREND_RAPID_HPA_PER_HOUR;

        if change_per_hour > TREND_STEADY_HPA_PER_HOUR {
            if rapid {
                Self::RapidRise
            } else {
                Self::Rising
            }
        } else if change_per_hour < -TREND_STEADY_HPA_PER_HOUR {
            if rapid {
                Self::RapidFall
            } else {
                Self::Falling
            }
        } else {
            Self::Steady
        }
    }

    /// Display symbol; rapid variants double the directional symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Self::RapidFall => "<<",
            Self::Falling => "<",
            Self::Steady => "-",
            Self::Rising => ">",
            Self::RapidRise => ">>",
        }
    }

    /// True for rising and falling variants
    pub fn is_directional(self) -> bool {
        !matches!(self, Self::Steady)
    }

    /// True for the doubled variants
    pub fn is_rapid(self) -> bool {
        matches!(self, Self::RapidFall | Self::RapidRise)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Output of one analysis step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendResult {
    /// Mean pressure over the window (hPa)
    pub mean_pressure: f32,
    /// Fitted rate of change (hPa per hour), 0 until the window is full
    pub change_per_hour: f64,
    /// Current (possibly retained) trend
    pub trend: Trend,
    /// Coefficient of determination of this tick's fit, `None` during warm-up
    pub r_squared: Option<f64>,
}

/// Least-squares line through a pressure window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// hPa per second
    pub slope: f64,
    /// hPa at t = 0 (Unix epoch)
    pub intercept: f64,
    /// Mean pressure (hPa)
    pub mean: f64,
    /// Population variance of the pressures
    pub variance: f64,
    /// Population variance of the residuals
    pub residual_variance: f64,
    /// Coefficient of determination, 0 for a zero-variance window
    pub r_squared: f64,
}

/// Fit `pressure = slope·t + intercept` over the window
///
/// Values are shifted by the oldest sample before summing, which keeps
/// epoch-sized timestamps from swamping the f64 mantissa and makes an exactly
/// flat window produce an exactly zero variance. Returns `None` when empty.
pub fn fit_window<const N: usize>(window: &CircularBuffer<PressurePoint, N>) -> Option<LinearFit> {
    let origin = *window.first()?;
    Some(fit_from(origin, window))
}

/// Least-squares fit with values shifted by `origin`, a sample of the
/// non-empty `window`
fn fit_from<const N: usize>(origin: PressurePoint, window: &CircularBuffer<PressurePoint, N>) -> LinearFit {
    let t0 = as_seconds(origin.timestamp);
    let p0 = origin.pressure as f64;
    let n = window.len() as f64;

    let shifted = || {
        window
            .iter()
            .map(move |pt| (as_seconds(pt.timestamp) - t0, pt.pressure as f64 - p0))
    };

    let (sum_t, sum_p) = shifted().fold((0.0, 0.0), |(st, sp), (t, p)| (st + t, sp + p));
    let mean_t = sum_t / n;
    let mean_p = sum_p / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (t, p) in shifted() {
        let dt = t - mean_t;
        let dp = p - mean_p;
        sxx += dt * dt;
        sxy += dt * dp;
        syy += dp * dp;
    }

    // All samples at the same instant: no time axis to fit against
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let shifted_intercept = mean_p - slope * mean_t;
    let variance = syy / n;

    let residual = |(t, p): (f64, f64)| slope * t + shifted_intercept - p;
    let mean_residual = shifted().map(residual).sum::<f64>() / n;
    let residual_variance = shifted()
        .map(|pt| {
            let d = residual(pt) - mean_residual;
            d * d
        })
        .sum::<f64>()
        / n;

    let r_squared = if variance <= f64::EPSILON {
        0.0
    } else {
        1.0 - residual_variance / variance
    };

    LinearFit {
        slope,
        intercept: p0 + shifted_intercept - slope * t0,
        mean: p0 + mean_p,
        variance,
        residual_variance,
        r_squared,
    }
}

/// Stateful trend analyzer owning the pressure window
#[derive(Debug, Clone)]
pub struct TrendAnalyzer<const N: usize = TREND_WINDOW_CAPACITY> {
    window: CircularBuffer<PressurePoint, N>,
    trend: Trend,
}

impl<const N: usize> TrendAnalyzer<N> {
    /// Create an analyzer with an empty window
    pub fn new() -> Self {
        Self {
            window: CircularBuffer::new(),
            trend: Trend::Steady,
        }
    }

    /// Window capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Samples currently in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True before the first sample
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Window contents, oldest first
    pub fn window(&self) -> impl Iterator<Item = &PressurePoint> + '_ {
        self.window.iter()
    }

    /// Trend as of the last analysis
    pub fn current(&self) -> Trend {
        self.trend
    }

    /// Add a sample and recompute the trend
    pub fn analyze(&mut self, timestamp: Timestamp, pressure: f32) -> TrendResult {
        let point = PressurePoint {
            timestamp,
            pressure,
        };

        if !self.window.is_full() {
            self.window.push(point);
            self.trend = Trend::Steady;

            let sum: f64 = self.window.iter().map(|pt| pt.pressure as f64).sum();
            return TrendResult {
                mean_pressure: (sum / self.window.len() as f64) as f32,
                change_per_hour: 0.0,
                trend: self.trend,
                r_squared: None,
            };
        }

        // Full: slide the window, the oldest sample is evicted
        self.window.push(point);

        let fit = fit_from(point, &self.window);
        let change_per_hour = fit.slope * SECONDS_PER_HOUR;

        if fit.r_squared > TREND_CONFIDENCE_MIN_R2 {
            let trend = Trend::from_change_per_hour(change_per_hour);
            if trend != self.trend {
                log_debug!(
                    "Pressure trend {} -> {} ({:.2} hPa/h, r²={:.2})",
                    self.trend,
                    trend,
                    change_per_hour,
                    fit.r_squared
                );
            }
            self.trend = trend;
        }

        TrendResult {
            mean_pressure: fit.mean as f32,
            change_per_hour,
            trend: self.trend,
            r_squared: Some(fit.r_squared),
        }
    }
}

impl<const N: usize> Default for TrendAnalyzer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Timestamp = 1_700_000_000_000;

    /// Feed `count` samples, one per second, following `pressure(i)`
    fn feed<const N: usize>(
        analyzer: &mut TrendAnalyzer<N>,
        start: usize,
        count: usize,
        pressure: impl Fn(usize) -> f32,
    ) -> TrendResult {
        let mut last = None;
        for i in start..start + count {
            last = Some(analyzer.analyze(T0 + i as u64 * 1000, pressure(i)));
        }
        last.unwrap()
    }

    #[test]
    fn warm_up_returns_running_mean() {
        let mut analyzer = TrendAnalyzer::<10>::new();

        let result = analyzer.analyze(T0, 1000.0);
        assert_eq!(result.mean_pressure, 1000.0);
        assert_eq!(result.trend, Trend::Steady);
        assert_eq!(result.r_squared, None);

        let result = analyzer.analyze(T0 + 1000, 1002.0);
        assert_eq!(result.mean_pressure, 1001.0);
        assert_eq!(result.change_per_hour, 0.0);
    }

    #[test]
    fn regression_starts_once_full() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        let result = feed(&mut analyzer, 0, 10, |i| 1000.0 + i as f32 * 0.01);
        assert_eq!(result.r_squared, None);
        assert_eq!(analyzer.len(), 10);

        let result = feed(&mut analyzer, 10, 1, |i| 1000.0 + i as f32 * 0.01);
        assert!(result.r_squared.is_some());
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        feed(&mut analyzer, 0, 11, |i| 1000.0 + i as f32);

        assert_eq!(analyzer.len(), 10);
        let first = analyzer.window().next().unwrap();
        // The very first sample (t = T0) was evicted
        assert_eq!(first.timestamp, T0 + 1000);
        assert!(analyzer.window().all(|pt| pt.timestamp != T0));
    }

    #[test]
    fn slow_rise_is_rising() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        // 0.0005 hPa/s = 1.8 hPa/h
        let result = feed(&mut analyzer, 0, 11, |i| 1000.0 + i as f32 * 0.0005);

        assert!((result.change_per_hour - 1.8).abs() < 0.1);
        assert!(result.r_squared.unwrap() > 0.99);
        assert_eq!(result.trend, Trend::Rising);
        assert_eq!(result.trend.symbol(), ">");
    }

    #[test]
    fn fast_fall_doubles_symbol() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        // -0.002 hPa/s = -7.2 hPa/h
        let result = feed(&mut analyzer, 0, 11, |i| 1000.0 - i as f32 * 0.002);

        assert!(result.change_per_hour < -3.0);
        assert_eq!(result.trend, Trend::RapidFall);
        assert_eq!(result.trend.symbol(), "<<");
    }

    #[test]
    fn flat_window_is_defined_and_steady() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        let result = feed(&mut analyzer, 0, 25, |_| 1013.1);

        assert_eq!(result.trend, Trend::Steady);
        assert_eq!(result.r_squared, Some(0.0));
        assert!(result.change_per_hour.is_finite());
        assert_eq!(result.change_per_hour, 0.0);
        assert!((result.mean_pressure - 1013.1).abs() < 1e-4);
    }

    #[test]
    fn symbol_is_sticky_through_flat_window() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        // 0.01 hPa/s = 36 hPa/h, far beyond the rapid threshold
        let result = feed(&mut analyzer, 0, 11, |i| 1000.0 + i as f32 * 0.01);
        assert_eq!(result.trend, Trend::RapidRise);

        let plateau = 1000.0 + 10.0 * 0.01;
        let mut confident = result.trend;
        for i in 11..40 {
            let before = analyzer.current();
            let result = analyzer.analyze(T0 + i * 1000, plateau);
            match result.r_squared {
                Some(r2) if r2 > TREND_CONFIDENCE_MIN_R2 => confident = result.trend,
                _ => assert_eq!(result.trend, before),
            }
        }

        // Window is now entirely flat: zero confidence, symbol retained
        let result = analyzer.analyze(T0 + 40_000, plateau);
        assert_eq!(result.r_squared, Some(0.0));
        assert_eq!(result.trend, confident);
        assert!(result.trend.is_directional());
    }

    #[test]
    fn noise_without_slope_keeps_steady() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        let result = feed(&mut analyzer, 0, 30, |i| {
            if i % 2 == 0 {
                1005.0
            } else {
                1005.1
            }
        });

        assert!(result.r_squared.unwrap() < TREND_CONFIDENCE_MIN_R2);
        assert_eq!(result.trend, Trend::Steady);
    }

    #[test]
    fn classification_thresholds() {
        assert_eq!(Trend::from_change_per_hour(0.5), Trend::Steady);
        assert_eq!(Trend::from_change_per_hour(-0.5), Trend::Steady);
        assert_eq!(Trend::from_change_per_hour(0.51), Trend::Rising);
        assert_eq!(Trend::from_change_per_hour(3.0), Trend::Rising);
        assert_eq!(Trend::from_change_per_hour(3.01), Trend::RapidRise);
        assert_eq!(Trend::from_change_per_hour(-0.51), Trend::Falling);
        assert_eq!(Trend::from_change_per_hour(-3.01), Trend::RapidFall);
    }

    #[test]
    fn fit_recovers_exact_line() {
        let mut window = CircularBuffer::<PressurePoint, 5>::new();
        for i in 0..5u64 {
            window.push(PressurePoint {
                timestamp: i * 1000,
                pressure: 1000.0 + 2.0 * i as f32,
            });
        }

        let fit = fit_window(&window).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1000.0).abs() < 1e-6);
        assert!((fit.mean - 1004.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert!(fit.residual_variance < 1e-12);
    }

    #[test]
    fn full_window_result_matches_window_fit() {
        let mut analyzer = TrendAnalyzer::<10>::new();
        let result = feed(&mut analyzer, 0, 15, |i| {
            1000.0 + i as f32 * 0.003 + (i % 3) as f32 * 0.01
        });

        let fit = fit_window(&analyzer.window).unwrap();
        let r2 = result.r_squared.unwrap();
        assert!((result.change_per_hour - fit.slope * SECONDS_PER_HOUR).abs() < 1e-6);
        assert!((r2 - fit.r_squared).abs() < 1e-6);
        assert!((result.mean_pressure as f64 - fit.mean).abs() < 1e-3);
    }

    #[test]
    fn fit_of_empty_window_is_none() {
        let window = CircularBuffer::<PressurePoint, 5>::new();
        assert!(fit_window(&window).is_none());
    }
}
