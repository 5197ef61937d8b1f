use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a `-v` count: quiet, `-v` info, `-vv` and up debug
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "pre_commit_hooks=warn",
        1 => "pre_commit_hooks=info,warn",
        _ => "pre_commit_hooks=debug,info",
    }
}

/// Install the stderr logger for a hook binary.
///
/// `RUST_LOG` takes precedence over the verbosity count. Calling this twice
/// is harmless; the second subscriber is ignored.
pub fn init_logger(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
