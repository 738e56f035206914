use tracing::Level;

/// Initialize the global tracing subscriber at the configured level.
///
/// Unknown level strings fall back to `info`. Safe to call more than once;
/// only the first call installs a subscriber.
pub fn init(log_level: &str) {
    let level = parse_level(log_level);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init();
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        init("info");
    }
}
