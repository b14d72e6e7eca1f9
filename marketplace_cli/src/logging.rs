//! Process-wide tracing setup.

use std::sync::OnceLock;

static TRACING: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber on first call; later calls do nothing.
///
/// Filter directives come from `RUST_LOG`, with `marketplace=info` added.
/// Logs go to stderr so they never mix with JSON on stdout.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
            "marketplace=info"
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
        );
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        if let Err(e) = installed {
            eprintln!("tracing already initialised elsewhere: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
        assert!(TRACING.get().is_some());
    }
}
