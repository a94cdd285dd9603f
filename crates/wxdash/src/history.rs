//! Trend preparation for the dashboard charts.
//!
//! Storage hands back the newest readings first; charts want them oldest
//! first, with one x step per reading and axis bounds that leave a little
//! headroom.

use chrono::Local;

use crate::reading::{Metric, WeatherReading};

/// Fraction of the value range added above and below a series.
const Y_PADDING: f64 = 0.05;

/// Readings for one city in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    readings: Vec<WeatherReading>,
}

/// One plottable series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    /// Which quantity this series shows.
    pub metric: Metric,
    /// `(index, value)` pairs, oldest first.
    pub points: Vec<(f64, f64)>,
    /// Lower and upper y-axis bounds.
    pub y_bounds: [f64; 2],
}

impl History {
    /// Build a history from readings in any order (storage returns newest first).
    #[must_use]
    pub fn from_recent(mut readings: Vec<WeatherReading>) -> Self {
        readings.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Self { readings }
    }

    /// Readings, oldest first.
    #[must_use]
    pub fn readings(&self) -> &[WeatherReading] {
        &self.readings
    }

    /// Number of readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether there is nothing to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// The newest reading.
    #[must_use]
    pub fn latest(&self) -> Option<&WeatherReading> {
        self.readings.last()
    }

    /// X-axis bounds covering every point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.readings.len().saturating_sub(1) as f64;
        [0.0, last.max(1.0)]
    }

    /// The series for one metric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn trend(&self, metric: Metric) -> Trend {
        let points: Vec<(f64, f64)> = self
            .readings
            .iter()
            .enumerate()
            .map(|(i, reading)| (i as f64, metric.value(reading)))
            .collect();
        let y_bounds = padded_bounds(points.iter().map(|&(_, y)| y));
        Trend {
            metric,
            points,
            y_bounds,
        }
    }

    /// Up to `count` evenly spaced `HH:MM` labels (local time), oldest first.
    ///
    /// The first and last readings are always labelled when `count >= 2`.
    #[must_use]
    pub fn time_labels(&self, count: usize) -> Vec<String> {
        let n = self.readings.len();
        if n == 0 || count == 0 {
            return Vec::new();
        }
        let count = count.min(n);
        if count == 1 {
            return vec![format_time(&self.readings[n - 1])];
        }

        (0..count)
            .map(|i| {
                let index = i * (n - 1) / (count - 1);
                format_time(&self.readings[index])
            })
            .collect()
    }
}

fn format_time(reading: &WeatherReading) -> String {
    reading
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

/// Min/max of `values` widened by [`Y_PADDING`]; a flat series gets ±1.
fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let range = max - min;
    if range.abs() < f64::EPSILON {
        [min - 1.0, max + 1.0]
    } else {
        let pad = range * Y_PADDING;
        [min - pad, max + pad]
    }
}
