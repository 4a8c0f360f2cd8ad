use clap::Parser;

use alerting_config::cli::SwaggerCli;
use alerting_config::logging::init_logging;
use alerting_config::swagger::clean_file;

fn main() {
    init_logging();
    let args = SwaggerCli::parse();

    match clean_file(&args.input, &args.output) {
        Ok(removed) => {
            for reference in &removed {
                tracing::info!("removing circular ref key {}", reference);
            }
            tracing::info!(
                "Wrote {} ({} circular refs removed)",
                args.output.display(),
                removed.len()
            );
        }
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    }
}
