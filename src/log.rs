use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Leveled logger writing to stdout/stderr with a bracketed level tag.
///
/// Fatal (`Level::Error`) and `Level::Warn` go to stderr; everything
/// else (info/debug/trace) goes to stdout. There is no file sink and
/// no env-var configuration: verbosity is set once, from `-v`, by
/// `init_logging`.
struct StdioLogger {
    level: LevelFilter,
}

impl Log for StdioLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = match record.level() {
            Level::Error => "fatal",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        let line = format!(
            "[{}][{:>5}] {}",
            Utc::now().to_rfc3339(),
            tag,
            record.args()
        );

        match record.level() {
            Level::Error | Level::Warn => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }

    fn flush(&self) {}
}

/// Map a `-v` count (0..=4) onto the five `log` levels.
///
/// 0: fatal only, 1: +warn, 2: +info, 3: +debug, 4: +trace.
fn level_filter_for(verbosity: u8) -> LevelFilter {
    match verbosity.min(4) {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the process-wide logger at the verbosity level selected by
/// `-v`. Must be called exactly once, before the first log macro use.
pub fn init_logging(verbosity: u8) {
    let level = level_filter_for(verbosity);
    log::set_max_level(level);
    // Only the real binary entry point calls this; under `cargo test`
    // multiple test binaries may race to install a logger, so a failed
    // `set_boxed_logger` call is allowed to pass silently.
    let _ = log::set_boxed_logger(Box::new(StdioLogger { level }));
}
