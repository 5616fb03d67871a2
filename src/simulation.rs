use std::fmt;
use std::slice;

use tracing::debug;

use crate::error::{Error, Result};
use crate::outcome::OutcomeGenerator;

pub const DEFAULT_BATCHES: usize = 100;
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// How many flips to take: `batches` groups of `batch_size` draws each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingPlan {
    batches: usize,
    batch_size: usize,
}

impl SamplingPlan {
    pub fn new(batches: usize, batch_size: usize) -> Result<Self> {
        if batches == 0 || batch_size == 0 {
            return Err(Error::EmptyPlan { batches, batch_size });
        }
        if batches.checked_mul(batch_size).is_none() {
            return Err(Error::PlanTooLarge { batches, batch_size });
        }
        Ok(SamplingPlan { batches, batch_size })
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn total_draws(&self) -> usize {
        self.batches * self.batch_size
    }
}

impl Default for SamplingPlan {
    fn default() -> Self {
        SamplingPlan { batches: DEFAULT_BATCHES, batch_size: DEFAULT_BATCH_SIZE }
    }
}

/// Snapshot taken at a batch boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchRecord {
    /// Zero-based index of the batch that just completed.
    pub index: usize,
    /// Successes over every draw so far.
    pub successes: u64,
    /// Draws so far, i.e. `batch_size * (index + 1)`.
    pub draws: u64,
    /// `successes / draws`.
    pub probability: f64,
}

/// The console line for a batch: `<batch index> <probability>`.
impl fmt::Display for BatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.index, self.probability)
    }
}

/// Cumulative empirical probabilities, one per completed batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbabilitySeries {
    values: Vec<f64>,
}

impl ProbabilitySeries {
    pub fn with_capacity(n: usize) -> Self {
        ProbabilitySeries { values: Vec::with_capacity(n) }
    }

    pub fn push(&mut self, probability: f64) {
        debug_assert!(probability >= 0.0 && probability <= 1.0);
        self.values.push(probability);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().cloned()
    }

    pub fn iter(&self) -> slice::Iter<'_, f64> {
        self.values.iter()
    }

    /// `(batch index, probability)` pairs, ready to be plotted.
    pub fn points<'a>(&'a self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.values.iter().enumerate().map(|(i, &p)| (i as f64, p))
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl<'a> IntoIterator for &'a ProbabilitySeries {
    type Item = &'a f64;
    type IntoIter = slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Flip `generator` batch by batch and record the running estimate of the
/// success probability after every batch.
///
/// `observer` sees each batch as it completes, in order.  The estimate is
/// cumulative: it covers every draw taken so far, not only the last batch.
pub fn simulate<G, O>(generator: &mut G,
                      plan: &SamplingPlan,
                      mut observer: O) -> ProbabilitySeries where
    G: OutcomeGenerator + ?Sized,
    O: FnMut(&BatchRecord) {
    let mut series = ProbabilitySeries::with_capacity(plan.batches);
    let mut successes: u64 = 0;
    let mut batch_count = 0;
    let mut batch_index = 0;
    for _ in 0 .. plan.batches {
        for _ in 0 .. plan.batch_size {
            successes += generator.flip().value();
            batch_count += 1;
            if batch_count == plan.batch_size {
                let draws = (plan.batch_size * (batch_index + 1)) as u64;
                debug_assert!(successes <= draws);
                let probability = successes as f64 / draws as f64;
                series.push(probability);
                let record = BatchRecord {
                    index: batch_index,
                    successes,
                    draws,
                    probability,
                };
                debug!(batch = batch_index, successes, draws, probability,
                       "batch complete");
                observer(&record);
                batch_count = 0;
                batch_index += 1;
            }
        }
    }
    series
}
