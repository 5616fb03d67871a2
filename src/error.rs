use std::io;

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A sampling plan needs at least one batch of at least one draw.
    #[error("empty sampling plan: {batches} batches of {batch_size} draws")]
    EmptyPlan { batches: usize, batch_size: usize },

    #[error("sampling plan too large: {batches} batches of {batch_size} draws")]
    PlanTooLarge { batches: usize, batch_size: usize },

    #[error("invalid chart style: {0}")]
    InvalidStyle(String),

    #[error("failed to draw chart: {0}")]
    Plot(String),

    #[error("failed to write chart: {0}")]
    Io(#[from] io::Error),
}
