use env_logger::Env;

use crate::constants::{defaults, envvars};

/// Initialize env_logger
///
/// Level comes from LOG_LEVEL (default INFO); RUST_LOG-style module filters
/// are accepted in the same variable.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();
}
