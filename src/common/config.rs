//! Runtime configuration loaded from the process environment.
//!
//! Only the artefact locations and logging knobs are configurable. The
//! feature order, the confidence band and the crore divisor are fixed by
//! the fitted artefacts and are deliberately not exposed here.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "house_price_model_deployment.json";
pub const DEFAULT_SCALER_PATH: &str = "feature_scaler.json";

/// Output format of the log subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    /// `EnvFilter` directive, e.g. `info` or `house_pricer=debug`.
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        fn env_or(key: &str, default: &str) -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        }

        let log_format = match env_or("PRICER_LOG_FORMAT", "json")
            .to_ascii_lowercase()
            .as_str()
        {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Self {
            model_path: PathBuf::from(env_or("PRICER_MODEL_PATH", DEFAULT_MODEL_PATH)),
            scaler_path: PathBuf::from(env_or("PRICER_SCALER_PATH", DEFAULT_SCALER_PATH)),
            log_filter: env_or("PRICER_LOG", "info"),
            log_format,
        }
    }

    /// Snapshot pointing at explicit artefact files, ignoring the environment.
    pub fn with_artefacts(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
            log_filter: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}
