// gourmet-cli/src/logging.rs
// 日志初始化: 控制台 + 可选按日滚动文件

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[cfg(debug_assertions)]
const DEFAULT_FILTER: &str = "info,gourmet_client=debug";
#[cfg(not(debug_assertions))]
const DEFAULT_FILTER: &str = "warn,gourmet_client=info";

/// Initialize logging.
///
/// `RUST_LOG` wins over `level`. Console output goes to stderr so command
/// output on stdout stays clean. With `log_dir`, a daily `gourmet.log` file is
/// written as well; keep the returned guard alive until exit so buffered lines
/// are flushed.
pub fn init(level: Option<&str>, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_FILTER)))
    };

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(console).try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, "gourmet.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(Some(guard))
}
