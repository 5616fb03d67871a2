use std::io;
use std::process;

use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use coinflip::{render_svg, simulate, ChartStyle, CoinFlip, SamplingPlan};

const USAGE: &str = "
Usage:
  coinflip [options]

Options:

  -h --help
    Show this screen.

  --batches=<batches>
    Number of batches to flip.
    [default: 100]

  --batch-size=<batch-size>
    Flips per batch.  The estimate is recorded after every batch.
    [default: 100]

  -o --output=<output>
    Where to write the chart (SVG).
    [default: coinflip.svg]

";

#[derive(Debug, Deserialize)]
struct Args {
    flag_batches: usize,
    flag_batch_size: usize,
    flag_output: String,
}

fn run(args: &Args) -> coinflip::Result<()> {
    let plan = SamplingPlan::new(args.flag_batches, args.flag_batch_size)?;
    let mut coin = CoinFlip::new();

    info!(batches = plan.batches(), batch_size = plan.batch_size(),
          "flipping {} coins", plan.total_draws());
    let series = simulate(&mut coin, &plan, |record| {
        println!("{}", record);
    });
    if let Some(p) = series.last() {
        info!(estimate = p, error = (p - 0.5).abs(), "done");
    }

    render_svg(&series, &ChartStyle::default(), &args.flag_output)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Args = docopt::Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    info!("args: {:?}", args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
