use anyhow::Result;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Default filter for a verbosity level when `RUST_LOG` is unset
fn default_directive(verbose_level: u8) -> &'static str {
    match verbose_level {
        0 => "info",
        // -v: debug, minus the per-connection noise from hyper and sqlx
        1 => "debug,hyper=warn,h2=warn,sqlx=warn",
        _ => "trace",
    }
}

/// Rotation prefix for a log path: `filmlog` from `/var/log/filmlog.log`
fn log_prefix(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

fn format_layer<W>(writer: W, json: bool, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(ansi)
        .with_writer(writer);

    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Install the global subscriber. Logs go to stderr, or to a daily rotating file when
/// `log_file` is given. JSON is used when stdout is not a terminal or `RUST_LOG_JSON=true`.
pub fn init_logging(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose_level)))
    };

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal());

    let layer = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
            std::fs::create_dir_all(dir)?;
            let prefix = log_prefix(&path).ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

            // filmlog.YYYY-MM-DD, rotated at midnight UTC
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);
            format_layer(appender, json, false)
        }
        None => format_layer(io::stderr, json, io::stderr().is_terminal()),
    };

    tracing_subscriber::registry().with(layer).with(filter).try_init()?;
    Ok(())
}
