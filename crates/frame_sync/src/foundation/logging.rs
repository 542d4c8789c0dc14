//! Logging setup

pub use log::{debug, error, info, trace, warn, LevelFilter, ParseLevelError};

/// Initialize the logging system
///
/// `RUST_LOG` wins over `default_level`. Safe to call more than once.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Initialize logging before the configured level is known
///
/// Records are emitted at `level` until [`set_level`] picks the configured
/// one. `RUST_LOG` still wins when set.
pub fn init_deferred(level: LevelFilter) {
    if std::env::var_os("RUST_LOG").is_some() {
        init("info");
        return;
    }
    if env_logger::Builder::new().filter_level(LevelFilter::Trace).try_init().is_ok() {
        log::set_max_level(level);
    }
}

/// Switch to the configured level after [`init_deferred`]
///
/// No-op when `RUST_LOG` is set.
pub fn set_level(level: &str) -> Result<(), ParseLevelError> {
    let level: LevelFilter = level.trim().parse()?;
    if std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(level);
    }
    Ok(())
}
