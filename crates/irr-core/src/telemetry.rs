//! Log output for the `irr` binary. Logs go to stderr; stdout carries the
//! report.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides `level`; a second
/// call is a no-op.
pub fn init_tracing(json: bool, level: Level) {
    let default_level = LevelFilter::from_level(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr.json())
            .try_init()
    } else {
        tracing_subscriber::registry().with(filter).with(stderr).try_init()
    };
    if installed.is_err() {
        tracing::debug!(event = "telemetry.already_installed");
    }
}

