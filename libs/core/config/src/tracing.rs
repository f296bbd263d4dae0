use crate::{env_value, ConfigError, Environment};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter, Layer, Registry};

/// Default filter when `RUST_LOG` is unset.
///
/// Production keeps server lifecycle events, development also shows the
/// per-call events of the builders and interceptors.
pub fn default_filter(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,h2=warn,hyper=warn,tower=warn"
    } else {
        "debug,h2=info,hyper=info,hyper_util=info,tower=info"
    }
}

/// Event output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Flattened JSON events, for log aggregation
    Json,
    /// Multi-line human-readable events with targets
    Pretty,
    /// One line per event
    Compact,
}

impl LogFormat {
    pub fn for_environment(environment: &Environment) -> Self {
        if environment.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    /// `LOG_FORMAT` when set, otherwise the environment's default.
    pub fn from_env(environment: &Environment) -> Result<Self, ConfigError> {
        match env_value("LOG_FORMAT") {
            Some(raw) => raw.parse(),
            None => Ok(Self::for_environment(environment)),
        }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer();
        match self {
            LogFormat::Json => layer.json().with_target(false).flatten_event(true).boxed(),
            LogFormat::Pretty => layer
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .pretty()
                .boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::Invalid {
                key: "LOG_FORMAT".to_string(),
                reason: "expected json, pretty or compact",
            }),
        }
    }
}

/// Install color-eyre for the binaries.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times. Shows the error location and hides the environment
/// section, which may carry secrets.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing for a server binary.
///
/// The format comes from [`LogFormat::from_env`]; an unrecognised
/// `LOG_FORMAT` falls back to the environment default. `RUST_LOG` overrides
/// [`default_filter`]. The `tracing-error` layer is always installed so eyre
/// reports carry span traces.
///
/// Later calls are ignored, which keeps tests that share a process quiet.
///
/// ```ignore
/// let environment = Environment::from_env();
/// core_config::tracing::install_color_eyre();
/// core_config::tracing::init_tracing(&environment);
/// ```
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));
    let (format, format_error) = match LogFormat::from_env(environment) {
        Ok(format) => (format, None),
        Err(err) => (LogFormat::for_environment(environment), Some(err)),
    };

    let result = tracing_subscriber::registry()
        .with(format.layer())
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init();

    match result {
        Ok(_) => info!(%environment, ?format, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
    if let Some(err) = format_error {
        tracing::warn!(error = %err, "Ignoring LOG_FORMAT");
    }
}
