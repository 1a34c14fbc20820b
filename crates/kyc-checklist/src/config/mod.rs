use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::num::{ParseFloatError, ParseIntError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub checklist: ChecklistConfig,
    pub geolocation: GeolocationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let redirect_path =
            env::var("APP_REDIRECT_PATH").unwrap_or_else(|_| "/dashboard".to_string());
        let redirect_delay_ms = env::var("APP_REDIRECT_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .map_err(|source| ConfigError::InvalidRedirectDelay { source })?;

        let latitude = parse_optional_coordinate("APP_GEO_LATITUDE")?;
        let longitude = parse_optional_coordinate("APP_GEO_LONGITUDE")?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            checklist: ChecklistConfig {
                redirect_path,
                redirect_delay_ms,
            },
            geolocation: GeolocationConfig {
                latitude,
                longitude,
            },
        })
    }
}

fn parse_optional_coordinate(name: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|source| ConfigError::InvalidCoordinate { name, source }),
        Err(_) => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Checklist completion behavior: where to send the agent and how long to
/// wait so the completion notification has a chance to surface first.
#[derive(Debug, Clone)]
pub struct ChecklistConfig {
    pub redirect_path: String,
    pub redirect_delay_ms: u64,
}

/// Optional fixed position for deployments where the device capability is
/// bridged through configuration. Both coordinates must be present for the
/// capability to count as supported.
#[derive(Debug, Clone)]
pub struct GeolocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeolocationConfig {
    pub fn fixed_position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRedirectDelay { source: ParseIntError },
    InvalidCoordinate { name: &'static str, source: ParseFloatError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRedirectDelay { .. } => {
                write!(f, "APP_REDIRECT_DELAY_MS must be a millisecond count")
            }
            ConfigError::InvalidCoordinate { name, .. } => {
                write!(f, "{name} must parse to a decimal coordinate")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidRedirectDelay { source } => Some(source),
            ConfigError::InvalidCoordinate { source, .. } => Some(source),
        }
    }
}
