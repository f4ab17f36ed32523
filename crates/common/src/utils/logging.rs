use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,sea_orm=warn,sqlx=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the tracing subscriber.
/// - Respects `RUST_LOG` if set, otherwise `info` with quieter database crates
/// - Appends to `file` when given, stdout otherwise
/// - `json` switches from the compact human format to structured JSON lines
///
/// A subscriber that is already installed (tests, embedding) is left in place.
pub fn init_logging(file: Option<&str>, json: bool) -> anyhow::Result<()> {
    let writer = match file {
        Some(path) => {
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("cannot open log file {path}: {e}"))?;
            BoxMakeWriter::new(Mutex::new(f))
        }
        None => BoxMakeWriter::new(io::stdout),
    };

    let builder = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(file.is_none())
        .with_writer(writer);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    Ok(())
}
