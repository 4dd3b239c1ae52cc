/// Running min, max, sum and count for a single key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStatistic {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl RunningStatistic {
    /// The statistic for a key seen exactly once.
    pub fn new(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    #[inline]
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Folds another statistic for the same key into this one.
    /// Commutative and associative up to float rounding of `sum`.
    #[inline]
    pub fn merge(&mut self, other: &RunningStatistic) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// `sum / count`, kept within `[min, max]` against rounding in `sum`.
    pub fn mean(&self) -> f64 {
        (self.sum / self.count as f64).clamp(self.min, self.max)
    }
}
