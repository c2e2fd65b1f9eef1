use std::env;
use std::fmt;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing the query
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_page_size: i64,
    pub max_request_size_bytes: usize,
}

/// Credentials and signing secret for the login flow.
///
/// Any of the three secrets left unset (or empty) makes every login fail
/// with 401 instead of accepting blank credentials.
#[derive(Clone)]
pub struct SecurityConfig {
    pub require_auth: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub app_user: Option<String>,
    pub app_password: Option<String>,
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when RUST_LOG is not set
    pub default_filter: String,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            match value {
                Some(v) if !v.is_empty() => "<set>",
                _ => "<unset>",
            }
        }

        f.debug_struct("SecurityConfig")
            .field("require_auth", &self.require_auth)
            .field("enable_cors", &self.enable_cors)
            .field("cors_origins", &self.cors_origins)
            .field("app_user", &redact(&self.app_user))
            .field("app_password", &redact(&self.app_password))
            .field("jwt_secret", &redact(&self.jwt_secret))
            .finish()
    }
}

impl SecurityConfig {
    /// Signing secret, only when configured with a non-empty value
    pub fn signing_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref().filter(|s| !s.is_empty())
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v
                .parse()
                .ok()
                .filter(|n: &i64| *n >= 1)
                .unwrap_or(self.api.max_page_size);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = lookup("REQUIRE_AUTH") {
            self.security.require_auth = v.parse().unwrap_or(self.security.require_auth);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("APP_USER") {
            self.security.app_user = Some(v);
        }
        if let Some(v) = lookup("APP_PASSWORD") {
            self.security.app_password = Some(v);
        }
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = Some(v);
        }

        // Logging overrides
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = match v.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => self.logging.format,
            };
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_page_size: 1000,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                require_auth: true,
                enable_cors: true,
                cors_origins: vec![],
                app_user: None,
                app_password: None,
                jwt_secret: None,
            },
            logging: LoggingConfig {
                format: LogFormat::Pretty,
                default_filter: "info,contact_api=debug".to_string(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "sqlite://contacts.db".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            api: ApiConfig {
                max_page_size: 500,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                require_auth: true,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                app_user: None,
                app_password: None,
                jwt_secret: None,
            },
            logging: LoggingConfig {
                format: LogFormat::Json,
                default_filter: "info".to_string(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "sqlite://contacts.db".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            api: ApiConfig {
                max_page_size: 100,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig {
                require_auth: true,
                enable_cors: false,
                cors_origins: vec![],
                app_user: None,
                app_password: None,
                jwt_secret: None,
            },
            logging: LoggingConfig {
                format: LogFormat::Json,
                default_filter: "info".to_string(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}
