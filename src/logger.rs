use eyre::{Result, WrapErr};
use slog::Drain;
use slog_term::{CompactFormat, TermDecorator};
use std::io;
use std::sync::Mutex;
use time::OffsetDateTime;

use slog::*;

use crate::helpers::datetime::Timezone;

pub struct Logger {
    pub log_level: u8,
    logger: slog::Logger,
}

type TermDrain = Fuse<Mutex<Fuse<LevelFilter<CompactFormat<TermDecorator>>>>>;

fn new_drain(level: Level) -> TermDrain {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::CompactFormat::new(decorator)
        .use_custom_timestamp(|w: &mut dyn io::Write| {
            write!(
                w,
                "{}",
                OffsetDateTime::now_utc()
                    .to_localtime()
                    .to_formatted_string()
            )
        })
        .build()
        .filter_level(level)
        .fuse();
    Mutex::new(drain).fuse()
}

/// 0 is critical only, 5 is everything down to trace
pub fn level_from_u8(log_level: u8) -> Level {
    match log_level {
        0 => Level::Critical,
        1 => Level::Error,
        2 => Level::Warning,
        3 => Level::Info,
        4 => Level::Debug,
        5 => Level::Trace,
        // Default to debug
        _ => Level::Debug,
    }
}

impl Logger {
    pub fn new(log_level: u8) -> Self {
        let logger = slog::Logger::root(
            new_drain(level_from_u8(log_level)),
            slog::o!("version" => env!("CARGO_PKG_VERSION")),
        );
        Logger { log_level, logger }
    }

    /// Routes the `log` macros used across the crate to this logger
    pub fn set_global(&self) -> Result<&Self> {
        // slog_stdlog uses the logger from slog_scope, so set a logger there
        let guard = slog_scope::set_global_logger(self.logger.clone());
        // https://github.com/slog-rs/slog/issues/249
        guard.cancel_reset();
        slog_stdlog::init_with_level(log::Level::Trace)
            .wrap_err("failed to install the log bridge")?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_mapping() {
        assert_eq!(level_from_u8(0), Level::Critical);
        assert_eq!(level_from_u8(3), Level::Info);
        assert_eq!(level_from_u8(5), Level::Trace);
        assert_eq!(level_from_u8(42), Level::Debug);
    }

    #[test]
    fn new_keeps_level() {
        assert_eq!(Logger::new(2).log_level, 2);
    }
}
