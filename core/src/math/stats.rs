use statrs::statistics::Statistics;

/// Summary of one bucket of raw samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSummary {
    pub mean: f32,
    pub std: f32,
    pub min: f32,
    pub max: f32,
}

pub struct StatsHelper;

impl StatsHelper {
    /// Mean, population standard deviation and extrema of `samples`.
    /// An empty bucket yields NaN everywhere.
    pub fn summarize(samples: &[f32]) -> BucketSummary {
        if samples.is_empty() {
            return BucketSummary {
                mean: f32::NAN,
                std: f32::NAN,
                min: f32::NAN,
                max: f32::NAN,
            };
        }
        let values: Vec<f64> = samples.iter().map(|&v| v as f64).collect();
        BucketSummary {
            mean: values.as_slice().mean() as f32,
            std: values.as_slice().population_std_dev() as f32,
            min: values.as_slice().min() as f32,
            max: values.as_slice().max() as f32,
        }
    }

    /// Largest finite value, ignoring NaN entries.
    pub fn finite_max<'a, I>(values: I) -> Option<f32>
    where
        I: IntoIterator<Item = &'a f32>,
    {
        values
            .into_iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.max(v))))
    }
}
