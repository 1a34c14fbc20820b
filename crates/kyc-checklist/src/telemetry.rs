use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "log filter directive '{directive}' does not parse")
            }
            TelemetryError::Init(err) => {
                write!(f, "failed to install the tracing subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

fn config_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        directive: config.log_level.clone(),
        source,
    })
}

/// Install the global subscriber for the process. A `RUST_LOG` directive
/// takes precedence over the configured level so verbosity can be raised
/// per invocation without touching deployment config.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config_filter(config)?,
    };

    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(TelemetryError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_level_directives() {
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
        };
        assert!(config_filter(&config).is_ok());
    }

    #[test]
    fn rejects_malformed_filter_directives() {
        let config = TelemetryConfig {
            log_level: "http=not_a_level".to_string(),
        };
        match config_filter(&config) {
            Err(TelemetryError::Filter { directive, .. }) => {
                assert_eq!(directive, "http=not_a_level");
            }
            other => panic!("expected a filter error, got {other:?}"),
        }
    }
}
