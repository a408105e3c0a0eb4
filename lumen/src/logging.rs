// lumen/src/logging.rs
//
// Diagnostics go to stderr so stdout stays readable progress output.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// `-v` count to the default level when `RUST_LOG` is not set.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lumen={level},lumen_core={level}",
            level = level_for(verbosity)
        ))
    })
}

pub fn init_logging(verbosity: u8) {
    // Ignored when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
