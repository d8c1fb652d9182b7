use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a tracing subscriber for kernel hosts.
///
/// The level comes from `RUST_LOG`, defaulting to "info". Fails instead of
/// panicking when a global subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_reports_error() {
        // Another test may have installed a subscriber first
        let _ = init();
        assert!(init().is_err());
        tracing::debug!(stage = "logging", "subscriber installed");
    }
}
