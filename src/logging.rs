// src/logging.rs

use crate::models::ApiCallLog;
use flexi_logger::{
    detailed_format, Age, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle,
    Naming,
};
use std::path::Path;

/// Starts file logging. The terminal belongs to the UI, so nothing goes to stderr.
///
/// `RUST_LOG` wins over `level` when set. Keep the returned handle alive for
/// the lifetime of the program.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename("premchat"),
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(7),
        )
        .format(detailed_format)
        .start()
}

/// Logs an API call.
pub fn log_api_call(log: &ApiCallLog) {
    let status = log
        .response_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());

    log::info!(
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        status,
        log.response_time_ms
    );
}
