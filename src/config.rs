use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v20.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Construction-time client configuration. Values are immutable once the
/// config is handed to a client; "updating" means building a new config and
/// swapping it in, which leaves in-flight calls on the snapshot they started
/// with.
#[derive(Debug, Clone)]
pub struct WabaConfig {
    pub api_key: String,
    pub sender: String,
    pub base_url: Url,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub developer_options: DeveloperOptions,
}

impl WabaConfig {
    pub fn new(api_key: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sender: sender.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
            developer_options: DeveloperOptions::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_developer_options(mut self, options: DeveloperOptions) -> Self {
        self.developer_options = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTopic {
    Request,
    Response,
    Error,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Opt-in observability knobs. These only affect what the client emits via
/// `tracing`, never what goes on the wire.
#[derive(Debug, Clone, Default)]
pub struct DeveloperOptions {
    pub logs: Vec<LogTopic>,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl DeveloperOptions {
    pub fn with_logs(mut self, logs: impl IntoIterator<Item = LogTopic>) -> Self {
        self.logs = logs.into_iter().collect();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn log_enabled(&self, topic: LogTopic) -> bool {
        self.logs.contains(&topic)
    }

    /// Installs a global `tracing` subscriber matching these options.
    /// Intended for applications without their own subscriber; does nothing
    /// if one is already set. `RUST_LOG` takes precedence over `log_level`.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_directive()));

        let registry = tracing_subscriber::registry().with(filter);
        let _ = match self.log_format {
            LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WabaConfig::new("api-key", "14155550100");
        assert_eq!(config.base_url.as_str(), "https://graph.facebook.com/v20.0");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert!(config.headers.is_empty());
        assert!(config.developer_options.logs.is_empty());
        assert_eq!(config.developer_options.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_produce_a_new_value() {
        let config = WabaConfig::new("api-key", "14155550100")
            .with_timeout(Duration::from_secs(5))
            .with_header("X-Request-Source", "crm")
            .with_developer_options(
                DeveloperOptions::default()
                    .with_logs([LogTopic::Request, LogTopic::Error])
                    .with_log_format(LogFormat::Json),
            );

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.headers.len(), 1);
        assert!(config.developer_options.log_enabled(LogTopic::Request));
        assert!(!config.developer_options.log_enabled(LogTopic::Response));
        assert_eq!(config.developer_options.log_format, LogFormat::Json);
    }
}
