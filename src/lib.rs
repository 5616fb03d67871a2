//! Monte Carlo estimate of the probability of heads for a fair coin.
//!
//! Coins are flipped in fixed-size batches and, after every batch, the
//! cumulative fraction of heads is recorded.  The recorded series can be
//! rendered as a chart showing the estimate settling around `0.5`.

pub mod error;
pub mod outcome;
pub mod plot;
pub mod simulation;

pub use error::{Error, Result};
pub use outcome::{CoinFlip, Outcome, OutcomeGenerator};
pub use plot::{render_svg, render_svg_string, ChartStyle};
pub use simulation::{simulate, BatchRecord, ProbabilitySeries, SamplingPlan};
