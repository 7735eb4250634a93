/*
 * Responsibility
 * - read settings from the environment (.env via dotenvy, then process env)
 * - validate them (startup fails on invalid values)
 * - key-store location / password / alias are read once; changing them needs a restart
 */
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_KEYSTORE: &str = "secure-keystore.p12";
pub const DEFAULT_KEYSTORE_PASSWORD: &str = "changeit";
pub const DEFAULT_KEY_ALIAS: &str = "jwt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_value(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the trusted JWT signing key comes from.
#[derive(Clone)]
pub struct KeyStoreConfig {
    /// Filesystem path, or the name of a bundled resource when no such file exists.
    pub location: String,
    pub password: String,
    pub alias: String,
}

impl fmt::Debug for KeyStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStoreConfig")
            .field("location", &self.location)
            .field("password", &"[REDACTED]")
            .field("alias", &self.alias)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub keystore: KeyStoreConfig,

    // Claim paths for the role mapper. Both unset means no roles are derived.
    pub roles_claim: Option<String>,
    pub organizations_claim: Option<String>,

    // Set when a TLS terminator sits in front of the service.
    pub tls_terminated_upstream: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build the configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(String::as_str);

        let port: u16 = get("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_value(get("APP_ENV"));

        let keystore = KeyStoreConfig {
            location: non_empty_or(
                get("API_SECURITY_KEYSTORE_FILE"),
                "API_SECURITY_KEYSTORE_FILE",
                DEFAULT_KEYSTORE,
            )?,
            password: non_empty_or(
                get("API_SECURITY_KEYSTORE_PASSWORD"),
                "API_SECURITY_KEYSTORE_PASSWORD",
                DEFAULT_KEYSTORE_PASSWORD,
            )?,
            alias: non_empty_or(
                get("API_SECURITY_KEY_ALIAS"),
                "API_SECURITY_KEY_ALIAS",
                DEFAULT_KEY_ALIAS,
            )?,
        };

        let roles_claim = optional(get("AUTH_ROLES_CLAIM"));
        let organizations_claim = optional(get("AUTH_ORGANIZATIONS_CLAIM"));

        let tls_terminated_upstream = match get("TLS_TERMINATED_UPSTREAM") {
            None => false,
            Some(v) => parse_bool(v).ok_or(ConfigError::Invalid("TLS_TERMINATED_UPSTREAM"))?,
        };

        Ok(Self {
            addr,
            app_env,
            keystore,
            roles_claim,
            organizations_claim,
            tls_terminated_upstream,
        })
    }
}

fn non_empty_or(
    value: Option<&str>,
    key: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    match value {
        None => Ok(default.to_string()),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Invalid(key)),
        Some(v) => Ok(v.to_string()),
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
