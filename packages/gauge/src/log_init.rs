use std::io::Write as _;
use std::sync::OnceLock;

use env_filter::{Builder as LogEnvBuilder, Filter as LogEnvFilter};

static LOG_FILTER: OnceLock<LogEnvFilter> = OnceLock::new();

/// Shorthand to quickly setup logging to stderr. Can be useful in tests
/// and small drivers.
///
/// `RUST_LOG` takes priority when set and not empty, otherwise `spec` is used
/// with the same syntax (for example `"debug"` or `"gauge=trace"`).
/// Only the first call has effect.
pub fn log_init(spec: &str) {
    // not using the filter from the logger, since we are before log initialization
    let value = match std::env::var("RUST_LOG") {
        Ok(value) if !value.is_empty() => value,
        _ => spec.to_string(),
    };
    let filter = LogEnvBuilder::new().parse(&value).build();
    let max_level = filter.filter();
    if LOG_FILTER.set(filter).is_err() {
        return;
    }
    if log::set_logger(&LogImpl).is_ok() {
        log::set_max_level(max_level);
    }
}

struct LogImpl;
impl log::Log for LogImpl {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match LOG_FILTER.get() {
            Some(filter) => filter.enabled(metadata),
            None => false,
        }
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut message = String::new();
        if record.level() == log::Level::Trace {
            // enable source location logging in trace messages
            message.push('[');
            if let Some(p) = record.module_path() {
                message.push_str(p);
                message.push(' ');
            }
            if let Some(f) = record.file() {
                let name = match f.rfind(['/', '\\']) {
                    None => f,
                    Some(i) => &f[i + 1..],
                };
                message.push_str(name);
            }
            if let Some(l) = record.line() {
                message.push(':');
                message.push_str(&format!("{l}"));
            }
            if message.len() > 1 {
                message += "] ";
            } else {
                message.clear();
            }
        }
        use std::fmt::Write;
        let _: Result<_, _> = write!(&mut message, "{}", record.args());
        let _: Result<_, _> = writeln!(
            std::io::stderr().lock(),
            "{:<5} {message}",
            record.level()
        );
    }

    fn flush(&self) {
        let _: Result<_, _> = std::io::stderr().flush();
    }
}
