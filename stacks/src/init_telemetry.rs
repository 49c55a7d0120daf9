use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber: an `EnvFilter` driven by
/// `STACKS_LOG` (default `info`) feeding a compact fmt layer.
pub fn init_telemetry_and_tracing(debug: bool) -> Result<()> {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("STACKS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(false)
        .with_thread_names(false)
        .with_target(true)
        .event_format(tracing_subscriber::fmt::format().compact())
        .boxed();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
