use clap::Parser;
use mba_pipeline::app::{handle_fatal_error, init_logging, AppConfig};
use mba_pipeline::cli::{execute, Cli};
use tracing::debug;

fn main() {
    let args = Cli::parse();
    let app_config = AppConfig::new(args.verbose);
    init_logging(&app_config);

    match execute(&args) {
        Ok(report) => {
            debug!("Report: {:?}", report);
            for (name, value) in report.counters.named() {
                println!("{name}: {value}");
            }
        }
        Err(e) => handle_fatal_error(e, args.verbose),
    }
}
