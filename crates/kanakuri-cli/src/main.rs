use kanakuri_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Initialize logging as early as possible; fall back to stderr if the
    // state dir is unwritable.
    if let Err(err) = logging::init_logging(cli.verbose) {
        match logging::init_logging_stderr(cli.verbose) {
            Ok(()) => tracing::warn!("file logging unavailable: {:#}", err),
            Err(stderr_err) => eprintln!(
                "kanakuri: logging disabled: {:#}; {:#}",
                err, stderr_err
            ),
        }
    }

    if let Err(err) = cli.run().await {
        eprintln!("kanakuri error: {:#}", err);
        std::process::exit(1);
    }
}
