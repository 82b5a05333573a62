use serde::{Deserialize, Serialize};

const MICROS_PER_MILLI: f64 = 1000.0;
const MILLIS_PER_SECOND: f64 = 1000.0;

/// Display unit of the time axis and of marker offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Milliseconds up to a span of one second, seconds beyond.
    pub fn for_span(span_us: i64) -> Self {
        if span_us as f64 / MICROS_PER_MILLI > MILLIS_PER_SECOND {
            TimeUnit::Seconds
        } else {
            TimeUnit::Milliseconds
        }
    }

    /// Converts a duration in microseconds into display units.
    pub fn scale(self, duration_us: i64) -> f64 {
        let millis = duration_us as f64 / MICROS_PER_MILLI;
        match self {
            TimeUnit::Milliseconds => millis,
            TimeUnit::Seconds => millis / MILLIS_PER_SECOND,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }
}

/// `count` evenly spaced values from 0 to `stop`, both ends included.
pub fn linspace(stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = count - 1;
            let step = stop / last as f64;
            (0..count)
                .map(|i| if i == last { stop } else { i as f64 * step })
                .collect()
        }
    }
}
