use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File logging settings read from the environment.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: String,
    pub file_level: String,
    pub error_file_level: String,
}

impl LogSettings {
    /// LOG_DIR (logs), FILE_LOG_LEVEL (debug), ERROR_FILE_LOG_LEVEL (error)
    pub fn from_env() -> Self {
        LogSettings {
            dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            file_level: env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            error_file_level: env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string()),
        }
    }
}

/// Owns the background writer guards; dropping it flushes and stops file logging.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging(&LogSettings::from_env())?;
        Ok(Logger { guards })
    }

    pub fn setup_logging(settings: &LogSettings) -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
        let error_dir = format!("{}/error", settings.dir);
        std::fs::create_dir_all(&error_dir)?;

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,planner_crm_backend=debug"));

        let (general_writer, general_guard) = non_blocking(rolling::daily(&settings.dir, "planner-crm.log"));
        let (error_writer, error_guard) = non_blocking(rolling::daily(&error_dir, "planner-crm-error.log"));
        let (json_writer, json_guard) = non_blocking(rolling::daily(&settings.dir, "planner-crm.json"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(console_filter),
            )
            .with(
                fmt::layer()
                    .with_writer(general_writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&settings.file_level)),
            )
            .with(
                fmt::layer()
                    .with_writer(error_writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&settings.error_file_level)),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(json_writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_filter(EnvFilter::new(&settings.file_level)),
            )
            .try_init()?;

        Ok(vec![general_guard, error_guard, json_guard])
    }
}
