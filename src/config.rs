//! Configuration manager for mercato.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_SECRET_KEY: &str = "fallback_secret";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Instance name, reported by `/health`.
    pub name: String,
    /// Browser origin allowed to call the API.
    pub frontend_url: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    #[serde(skip)]
    path: PathBuf,
    /// Secret used to sign and verify session tokens.
    #[serde(skip_serializing)]
    pub secret_key: String,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Postgres,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: "mercato".to_owned(),
            frontend_url: DEFAULT_FRONTEND_URL.to_owned(),
            port: DEFAULT_PORT,
            path: PathBuf::default(),
            secret_key: DEFAULT_SECRET_KEY.to_owned(),
            postgres: Postgres::default(),
        }
    }
}

/// PostgreSQL configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
    /// Full connection string; takes precedence over the fields above.
    pub url: Option<String>,
}

impl Default for Postgres {
    fn default() -> Self {
        Self {
            address: "localhost:5432".to_owned(),
            database: None,
            username: None,
            password: None,
            pool_size: None,
            url: None,
        }
    }
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Normalizes a URL string by ensuring it starts with a valid scheme
    /// (`http` or `https`).
    fn normalize_url(&self, url: &str) -> Result<String, url::ParseError> {
        let url_with_scheme = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{url}")
        };

        let parsed_url = Url::parse(&url_with_scheme)?;
        Ok(parsed_url.to_string())
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location, then applies environment overrides.
    pub fn read(self) -> Result<Arc<Self>, url::ParseError> {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        let mut config: Configuration = match File::open(file_path) {
            Ok(file) => match serde_yaml::from_reader(file) {
                Ok(config) => config,
                Err(err) => self.error(err),
            },
            Err(err) => self.error(err),
        };

        config.apply_env();
        config.frontend_url = self.normalize_url(&config.frontend_url)?;

        Ok(Arc::new(config))
    }

    /// Environment variables win over file values.
    fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(url) = std::env::var("FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.secret_key = secret;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.postgres.url = Some(url);
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not usable, falling back to defaults");
        Self::default()
    }
}
