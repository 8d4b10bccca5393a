use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
    sync::Arc,
    time::Instant,
};

use axum::{extract::Request, middleware::Next, response::Response};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    LogFile(#[from] io::Error),
    #[error("failed to install global subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Keeps the file sink alive; syncs it to disk on `shutdown` or drop.
#[derive(Debug)]
pub struct LoggingGuard {
    file: Option<Arc<File>>,
}

impl LoggingGuard {
    pub fn shutdown(self) {
        drop(self);
    }

    fn sync(&self) {
        if let Some(file) = &self.file {
            if let Err(err) = file.sync_data() {
                eprintln!("failed to sync log file: {err}");
            }
        }
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        self.sync();
    }
}

pub fn init_logging(log_file: Option<&Path>) -> Result<LoggingGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file = log_file
        .map(|path| OpenOptions::new().create(true).append(true).open(path))
        .transpose()?
        .map(Arc::new);

    let file_layer = file.clone().map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .compact()
            .with_writer(file)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .try_init()?;

    Ok(LoggingGuard { file })
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = elapsed_ms,
        "request summary"
    );

    if !status.is_success() {
        warn!(method = %method, path = %path, status = status.as_u16(), "request failed");
    }

    response
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn guard_syncs_file_sink_on_shutdown() {
        let path = std::env::temp_dir().join(format!("cpu-monitor-mcp-{}.log", std::process::id()));
        let file = Arc::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .expect("open log file"),
        );
        (&*file).write_all(b"line\n").expect("write log line");

        LoggingGuard { file: Some(file) }.shutdown();

        let contents = std::fs::read_to_string(&path).expect("read log file");
        assert!(contents.ends_with("line\n"));
        let _ = std::fs::remove_file(&path);
    }
}
