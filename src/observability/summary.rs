//! Targeted-quantile summary
//!
//! Streaming quantile estimator (Cormode, Korn, Muthukrishnan, Srivastava)
//! that keeps each configured quantile within its allowed rank error while
//! storing far fewer samples than it has observed.

use std::sync::Mutex;

/// Buffered observations are merged into the stream in batches of this size
const BUFFER_CAPACITY: usize = 500;

/// A quantile and the rank error tolerated for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objective {
    pub quantile: f64,
    pub epsilon: f64,
}

impl Objective {
    pub const fn new(quantile: f64, epsilon: f64) -> Self {
        Self { quantile, epsilon }
    }
}

/// Default objectives: p50 ±0.05, p90 ±0.01, p99 ±0.001
pub const DEFAULT_OBJECTIVES: [Objective; 3] = [
    Objective::new(0.5, 0.05),
    Objective::new(0.9, 0.01),
    Objective::new(0.99, 0.001),
];

#[derive(Debug, Clone, Copy)]
struct Sample {
    value: f64,
    width: f64,
    delta: f64,
}

#[derive(Debug)]
struct Stream {
    objectives: Vec<Objective>,
    samples: Vec<Sample>,
    buffer: Vec<f64>,
    n: f64,
    count: u64,
    sum: f64,
}

impl Stream {
    /// Allowed error at rank `r`, the tightest over all objectives
    fn invariant(&self, r: f64) -> f64 {
        let mut min = f64::MAX;
        for t in &self.objectives {
            let f = if t.quantile * self.n <= r {
                (2.0 * t.epsilon * r) / t.quantile
            } else {
                (2.0 * t.epsilon * (self.n - r)) / (1.0 - t.quantile)
            };
            if f < min {
                min = f;
            }
        }
        min
    }

    fn insert(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.buffer.push(value);
        if self.buffer.len() >= BUFFER_CAPACITY {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let mut batch = std::mem::take(&mut self.buffer);
        batch.sort_by(f64::total_cmp);
        self.merge(&batch);
        self.buffer = batch;
        self.buffer.clear();
    }

    fn merge(&mut self, sorted: &[f64]) {
        let mut r = 0.0;
        let mut i = 0;
        for &value in sorted {
            let mut inserted = false;
            while i < self.samples.len() {
                let current = self.samples[i];
                if current.value > value {
                    let delta = (self.invariant(r).floor() - 1.0).max(0.0);
                    self.samples.insert(
                        i,
                        Sample {
                            value,
                            width: 1.0,
                            delta,
                        },
                    );
                    i += 1;
                    inserted = true;
                    break;
                }
                r += current.width;
                i += 1;
            }
            if !inserted {
                self.samples.push(Sample {
                    value,
                    width: 1.0,
                    delta: 0.0,
                });
                i += 1;
            }
            self.n += 1.0;
            r += 1.0;
        }
        self.compress();
    }

    fn compress(&mut self) {
        if self.samples.len() < 2 {
            return;
        }
        let mut xi = self.samples.len() - 1;
        let mut x = self.samples[xi];
        let mut r = self.n - 1.0 - x.width;

        for i in (0..self.samples.len() - 1).rev() {
            let c = self.samples[i];
            if c.width + x.width + x.delta <= self.invariant(r) {
                x.width += c.width;
                self.samples[xi] = x;
                self.samples.remove(i);
                xi -= 1;
            } else {
                x = c;
                xi = i;
            }
            r -= c.width;
        }
    }

    fn query(&self, quantile: f64) -> f64 {
        if self.samples.is_empty() {
            return f64::NAN;
        }
        let mut t = (quantile * self.n).ceil();
        t += (self.invariant(t) / 2.0).ceil();

        let mut prev = self.samples[0];
        let mut r = 0.0;
        for current in &self.samples[1..] {
            r += prev.width;
            if r + current.width + current.delta > t {
                return prev.value;
            }
            prev = *current;
        }
        prev.value
    }
}

/// Point-in-time view of a summary
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySnapshot {
    pub count: u64,
    pub sum: f64,
    /// Estimated value per objective quantile, in objective order
    pub quantiles: Vec<(f64, f64)>,
}

/// Thread-safe targeted-quantile summary
#[derive(Debug)]
pub struct Summary {
    stream: Mutex<Stream>,
}

impl Summary {
    /// Create a summary tracking the given objectives
    pub fn new(objectives: &[Objective]) -> Self {
        Self {
            stream: Mutex::new(Stream {
                objectives: objectives.to_vec(),
                samples: Vec::new(),
                buffer: Vec::with_capacity(BUFFER_CAPACITY),
                n: 0.0,
                count: 0,
                sum: 0.0,
            }),
        }
    }

    /// Record one observation
    pub fn observe(&self, value: f64) {
        if let Ok(mut stream) = self.stream.lock() {
            stream.insert(value);
        }
    }

    /// Count, sum and every objective quantile
    pub fn snapshot(&self) -> SummarySnapshot {
        let mut stream = match self.stream.lock() {
            Ok(stream) => stream,
            Err(poisoned) => poisoned.into_inner(),
        };
        stream.flush();
        let quantiles = stream
            .objectives
            .iter()
            .map(|o| (o.quantile, stream.query(o.quantile)))
            .collect();
        SummarySnapshot {
            count: stream.count,
            sum: stream.sum,
            quantiles,
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::new(&DEFAULT_OBJECTIVES)
    }
}
