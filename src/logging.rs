//! Logging setup for the command line tools

use tracing::Level;

/// Install a stderr subscriber. `verbose` counts `-v` flags: warnings only
/// by default, then info, debug and trace.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
