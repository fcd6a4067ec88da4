/// Application-level constants
pub const APP_NAME: &str = "docsched";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
/// Crate internals at debug, everything else at warn.
pub fn default_log_filter() -> String {
    format!("warn,{}=debug", env!("CARGO_CRATE_NAME"))
}
