use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use crate::error::{Result, ShopError};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ShopError::InvalidArgument(format!("failed to initialize tracing: {e}")))
}
