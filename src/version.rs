const fn unwrap_or_cargo_version(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Version reported by `--version`; `MONITOR_VERSION` at build time wins over the package version.
pub const VERSION: &str = unwrap_or_cargo_version(option_env!("MONITOR_VERSION"));

/// User-Agent sent to the notification endpoints.
pub fn user_agent() -> String {
    format!("auction-monitor/{VERSION}")
}
