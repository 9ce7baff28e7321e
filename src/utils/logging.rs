// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a `-v` count. Only this crate gets louder; calamine
/// and other dependencies stay at INFO.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "info,spec_extractor=debug",
        _ => "info,spec_extractor=trace",
    }
}

/// Sets up the logging framework using tracing_subscriber.
/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
pub fn setup_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("Logging setup complete (verbosity {}).", verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_only_this_crate() {
        assert_eq!(default_directive(0), "info");
        assert!(default_directive(1).contains("spec_extractor=debug"));
        assert!(default_directive(2).contains("spec_extractor=trace"));
        assert_eq!(default_directive(7), default_directive(2), "Counts above two saturate");
    }

    #[test]
    fn test_directives_parse() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_directive(verbose)).is_ok(), "Bad directive for -v x{}", verbose);
        }
    }
}
