//! Logging setup for hosts that do not install their own `log` backend.
//!
//! The library only ever talks to the `log` facade. Hosts that want to see the
//! planner and assembler diagnostics can call `enable_verbose_logging` once.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;

use crate::error::TranscodeError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend at debug level, writing `[LEVEL] message`
/// lines to stderr or appending them to `log_file`. Only the first call has any effect.
pub fn enable_verbose_logging(log_file: Option<&str>) -> Result<(), TranscodeError> {
    if INIT_LOGGER.is_completed() {
        return Ok(());
    }

    let target = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| TranscodeError::Logging(format!("could not open {}: {}", path, e)))?;
            Some(env_logger::Target::Pipe(Box::new(file)))
        }
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Debug);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(target) = target {
            builder.target(target);
        }

        let _ = builder.try_init();
    });
    Ok(())
}
