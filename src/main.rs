use plover::cli::{self, commands, output, ux, Parser};
use plover::Reporter;


async fn run_command(args: &cli::Cli) -> output::PloverOutput<serde_json::Value> {
    let command_name = args.command.to_string();

    let mut plover = match args.connect().await {
        Ok(plover) => plover,
        Err(e) => return output::PloverOutput::failure(&command_name, None, &e),
    };

    let result = match &args.command {
        cli::Commands::Peck { } => commands::peck(&plover).await.map(Some),
        cli::Commands::Query { sql } => match commands::query(&plover, sql).await {
            Ok(frame) if args.json => frame.to_json_rows().map(Some).map_err(Into::into),
            Ok(frame) => ux::show_frame(&frame).map(|_| None),
            Err(e) => Err(e),
        },
        cli::Commands::Check { suite, vars, hide_success } => {
            let reporter = Reporter::new(!hide_success);
            let result = commands::check(&mut plover, suite, vars, (!args.json).then_some(&reporter)).await;
            let data = serde_json::to_value(plover.recorder()).ok();

            return match result {
                Ok(()) => output::PloverOutput::success(&command_name, data),
                Err(e) => output::PloverOutput::failure(&command_name, data, &e),
            };
        }
    };

    match result {
        Ok(data) => output::PloverOutput::success(&command_name, data),
        Err(e) => output::PloverOutput::failure(&command_name, None, &e),
    }
}


/// Entry point for the Plover CLI tool.
///
/// - `peck`: Verify connectivity to the configured engine.
/// - `query`: Run one SQL query and print its result.
/// - `check`: Run a suite of checks and report each expectation.
///
/// Exits with status 1 on any error, including a failed expectation.
#[tokio::main]
async fn main() {
    let args: cli::Cli = cli::Cli::parse();

    if let Err(e) = ux::setup_logging(args.verbose, args.quiet, args.json) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    ux::setup_colors(args.json);

    let result = run_command(&args).await;

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Failed to serialize output: {e}"),
        }
    } else if let Some(error) = &result.error {
        tracing::error!("{}", error.message());
    }

    if let output::PloverStatus::Error = result.status {
        std::process::exit(1);
    }
}
