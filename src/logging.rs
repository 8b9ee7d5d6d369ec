use std::fs;
use std::path::Path;

use time::UtcOffset;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive. Logs may be lost once this is dropped.
pub struct LoggingHandle {
    _non_blocking_guard: WorkerGuard,
}

pub fn init_logging(filter_file: &Path) -> Result<LoggingHandle, String> {
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or_else(|err| {
            eprintln!("Failed to get timezone: {}", err);
            UtcOffset::UTC
        }),
        time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second] +[offset_hour]"),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

    let env_filter = read_env_filter(filter_file).unwrap_or_else(|err| {
        eprintln!("Failed to read env filter, using environment variable or default: {}", err);
        EnvFilter::builder()
            .with_default_directive(Level::DEBUG.into())
            .from_env_lossy()
    });

    let subscriber = tracing_subscriber::fmt()
        .with_timer(timer)
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| format!("failed to initialize logger: {}", err))?;
    tracing_log::LogTracer::init().map_err(|err| format!("failed to forward log records: {}", err))?;

    Ok(LoggingHandle {
        _non_blocking_guard: guard,
    })
}

fn read_env_filter(filter_file: &Path) -> Result<EnvFilter, String> {
    let s = fs::read_to_string(filter_file)
        .map_err(|err| format!("Failed to read file {}: {}", filter_file.display(), err))?;
    parse_env_filter(&s)
}

fn parse_env_filter(s: &str) -> Result<EnvFilter, String> {
    let first_line = s
        .lines()
        .next()
        .ok_or_else(|| "Filter file is empty".to_owned())?;
    EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .parse(first_line.trim())
        .map_err(|err| format!("Failed to parse env filter: {}", err))
}
