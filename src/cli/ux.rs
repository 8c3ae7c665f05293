use crate::error::PloverError;
use crate::frame::Frame;

use std::io::IsTerminal;


/// Logs go to stderr so stdout only carries results.
pub fn setup_logging(verbose: u8, quiet: bool, json: bool) -> Result<(), PloverError> {
    if json {
        // Mute all logging if JSON output is enabled
        tracing::subscriber::set_global_default(tracing::subscriber::NoSubscriber::default())?;
        return Ok(());
    }

    let level = if quiet {
        tracing::Level::ERROR
    } else { match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }};

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}


/// Colors only reach a terminal, never JSON output or a pipe.
pub fn setup_colors(json: bool) {
    if json || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}


pub fn show_frame(frame: &Frame) -> Result<(), PloverError> {
    if frame.num_columns() == 0 {
        tracing::info!("Query returned no rows");
        return Ok(());
    }

    println!("{}", frame.pretty()?);
    tracing::info!("{} row(s)", frame.num_rows());
    Ok(())
}

