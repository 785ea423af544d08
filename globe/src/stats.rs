//! Sentinel-aware sample statistics.

use std::fmt;

use serde::Serialize;

use crate::layout::NO_DATA;

/// Summary of a run of elevation samples, ignoring [`NO_DATA`] cells.
///
/// When no valid sample was seen, `min` and `max` keep their initial values
/// (`i16::MAX` and `i16::MIN`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
    /// Samples scanned, no-data included.
    pub total: usize,
    /// Samples other than [`NO_DATA`].
    pub count: usize,
    /// Sum of the valid samples.
    pub sum: f64,
    pub min: i16,
    pub max: i16,
}

impl Default for SampleStats {
    fn default() -> Self {
        Self {
            total: 0,
            count: 0,
            sum: 0.0,
            min: i16::MAX,
            max: i16::MIN,
        }
    }
}

impl SampleStats {
    /// Scan `samples` once.
    pub fn compute(samples: &[i16]) -> Self {
        let mut stats = Self::default();
        stats.extend(samples);
        stats
    }

    /// Fold more samples into the summary.
    pub fn extend(&mut self, samples: &[i16]) {
        self.total += samples.len();
        for &value in samples.iter().filter(|&&v| v != NO_DATA) {
            self.count += 1;
            self.sum += f64::from(value);
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    /// Mean of the valid samples, or `None` if there are none.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Sum of valid samples divided by all samples, no-data included.
    ///
    /// This is the figure older GLOBE tooling reported. It is biased toward
    /// zero by the share of no-data cells.
    pub fn legacy_mean(&self) -> Option<f64> {
        (self.total > 0).then(|| self.sum / self.total as f64)
    }

    /// `(min, max)` of the valid samples, or `None` if there are none.
    pub fn range(&self) -> Option<(i16, i16)> {
        (self.count > 0).then_some((self.min, self.max))
    }

    /// Samples equal to [`NO_DATA`].
    pub fn no_data(&self) -> usize {
        self.total - self.count
    }
}

impl fmt::Display for SampleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "count: {}, valid: {}", self.total, self.count)?;
        match self.mean() {
            Some(mean) => write!(f, ", mean: {:.2}", mean)?,
            None => write!(f, ", mean: n/a")?,
        }
        match self.range() {
            Some((min, max)) => write!(f, ", min: {}, max: {}", min, max),
            None => write!(f, ", min: n/a, max: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_samples() {
        let stats = SampleStats::compute(&[-500, 0, 100, 200, -500]);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.no_data(), 2);
        assert_eq!(stats.sum, 300.0);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.max, 200);
        assert_eq!(stats.mean(), Some(100.0));
        assert_eq!(stats.legacy_mean(), Some(60.0));
        assert_eq!(stats.range(), Some((0, 200)));
    }

    #[test]
    fn test_all_no_data() {
        let stats = SampleStats::compute(&[NO_DATA; 8]);
        assert_eq!(stats.total, 8);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.sum, 0.0);
        assert_eq!(stats.min, i16::MAX);
        assert_eq!(stats.max, i16::MIN);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.legacy_mean(), Some(0.0));
        assert_eq!(stats.range(), None);
    }

    #[test]
    fn test_empty() {
        let stats = SampleStats::compute(&[]);
        assert_eq!(stats, SampleStats::default());
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.legacy_mean(), None);
    }

    #[test]
    fn test_extend_matches_single_pass() {
        let samples = [12, -500, 8848, -430, 0, 1, -500, 3];
        let mut stats = SampleStats::default();
        stats.extend(&samples[..3]);
        stats.extend(&samples[3..]);
        assert_eq!(stats, SampleStats::compute(&samples));
        assert_eq!(stats.range(), Some((-430, 8848)));
    }

    #[test]
    fn test_display() {
        let text = SampleStats::compute(&[-500, 0, 100, 200, -500]).to_string();
        assert_eq!(text, "count: 5, valid: 3, mean: 100.00, min: 0, max: 200");

        let text = SampleStats::compute(&[NO_DATA]).to_string();
        assert!(text.contains("mean: n/a"));
    }
}
