use rand::distributions::{Distribution, Uniform};
use rand::rngs::ThreadRng;
use rand::Rng;

/// Result of a single coin flip.  Heads counts as a success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Tails = 0,
    Heads = 1,
}

impl Outcome {
    /// Numeric value of the outcome, `0` or `1`.
    pub fn value(self) -> u64 {
        self as u64
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Heads
    }
}

impl From<bool> for Outcome {
    fn from(heads: bool) -> Self {
        if heads { Outcome::Heads } else { Outcome::Tails }
    }
}

/// Source of independent binary outcomes.
///
/// Any `FnMut() -> Outcome` closure is a generator, which is how
/// deterministic sequences are fed into a simulation.
pub trait OutcomeGenerator {
    fn flip(&mut self) -> Outcome;
}

impl<F> OutcomeGenerator for F where F: FnMut() -> Outcome {
    fn flip(&mut self) -> Outcome {
        self()
    }
}

/// Fair coin: every flip is drawn uniformly from `{0, 1}`.
#[derive(Debug)]
pub struct CoinFlip<R> {
    rng: R,
    range: Uniform<u8>,
}

impl CoinFlip<ThreadRng> {
    /// Coin backed by the thread-local random source.  It is never seeded,
    /// so successive runs differ.
    pub fn new() -> Self {
        CoinFlip::with_rng(rand::thread_rng())
    }
}

impl Default for CoinFlip<ThreadRng> {
    fn default() -> Self {
        CoinFlip::new()
    }
}

impl<R: Rng> CoinFlip<R> {
    pub fn with_rng(rng: R) -> Self {
        CoinFlip { rng, range: Uniform::new(0, 2) }
    }
}

impl<R: Rng> OutcomeGenerator for CoinFlip<R> {
    fn flip(&mut self) -> Outcome {
        match self.range.sample(&mut self.rng) {
            0 => Outcome::Tails,
            _ => Outcome::Heads,
        }
    }
}
