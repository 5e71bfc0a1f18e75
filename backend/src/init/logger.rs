use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::GlobalConfig;

/// Initialize tracing-subscriber
///
/// Logs go to stderr so they don't interleave with the menu on stdout.
pub fn init(config: &GlobalConfig) -> super::Result<()> {
    init_panic_hook();

    let level = match config.log_level {
        0 => Level::TRACE,
        1 => Level::DEBUG,
        2 => Level::INFO,
        3 => Level::WARN,
        4 => Level::ERROR,
        _ => Level::INFO,
    };

    let registry = tracing_subscriber::registry().with(LevelFilter::from_level(level));

    match config.log_json {
        true => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        false => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    };

    Ok(())
}

fn init_panic_hook() {
    std::panic::set_hook(Box::new(|panic| {
        if let Some(location) = panic.location() {
            tracing::error!(
                message = %panic,
                panic.file = location.file(),
                panic.line = location.line(),
                panic.column = location.column(),
            );
        } else {
            tracing::error!(message = %panic);
        }
    }));
}
