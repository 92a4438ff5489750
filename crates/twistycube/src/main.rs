//! Command-line front end for building, scrambling, and twisting puzzles.

mod cli;
mod settings;

fn main() -> eyre::Result<()> {
    use clap::Parser;

    let args = cli::Args::parse();

    // Initialize logging.
    let mut logger = env_logger::builder();
    match args.verbose {
        0 => (),
        1 => {
            logger.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(log::LevelFilter::Trace);
        }
    }
    logger.init();

    cli::exec(args)
}
