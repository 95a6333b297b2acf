//! Tracing subscriber setup for the CLI.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `--debug` enables debug events from
/// both crates, `--verbose` enables CLI info events, and the default shows
/// warnings only.
pub fn init_cli_logger(verbose: bool, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, debug)));

    // A second install (tests, embedding) keeps the first subscriber.
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

fn default_directives(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "tld_filter=debug,tld_filter_lib=debug"
    } else if verbose {
        "tld_filter=info,tld_filter_lib=info"
    } else {
        "warn"
    }
}
