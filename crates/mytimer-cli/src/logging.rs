use mytimer_core::Config;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `MYTIMER_LOG` wins over `log.level` from the config file; stdout stays
/// reserved for JSON output.
pub fn init() {
    let filter = EnvFilter::try_from_env("MYTIMER_LOG")
        .or_else(|_| EnvFilter::try_new(Config::load_or_default().log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
