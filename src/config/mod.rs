use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Deadline in seconds for a single audit-store statement.
    pub store_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub require_https: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub max_admin_len: usize,
    pub max_action_len: usize,
    pub max_details_len: usize,
    /// Opt-in degradation: route privileged audit traffic through the
    /// session pool when the service credential is absent.
    pub allow_session_fallback: bool,
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
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_STORE_TIMEOUT_SECS") {
            self.database.store_timeout_secs = v.parse().unwrap_or(self.database.store_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }

        // Audit overrides
        if let Ok(v) = env::var("AUDIT_DEFAULT_PAGE_SIZE") {
            self.audit.default_page_size = v.parse().unwrap_or(self.audit.default_page_size);
        }
        if let Ok(v) = env::var("AUDIT_MAX_PAGE_SIZE") {
            self.audit.max_page_size = v.parse().unwrap_or(self.audit.max_page_size);
        }
        if let Ok(v) = env::var("AUDIT_ALLOW_SESSION_FALLBACK") {
            self.audit.allow_session_fallback = v.parse().unwrap_or(self.audit.allow_session_fallback);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                store_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                require_https: false,
            },
            audit: AuditConfig::defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                store_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
                cors_origins: vec!["https://staging.inksadelivery.com.br".to_string()],
                require_https: true,
            },
            audit: AuditConfig::defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                store_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
                cors_origins: vec![
                    "https://restaurante.inksadelivery.com.br".to_string(),
                    "https://admin.inksadelivery.com.br".to_string(),
                    "https://clientes.inksadelivery.com.br".to_string(),
                    "https://entregadores.inksadelivery.com.br".to_string(),
                    "https://app.inksadelivery.com.br".to_string(),
                ],
                require_https: true,
            },
            audit: AuditConfig::defaults(),
        }
    }
}

impl AuditConfig {
    fn defaults() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 200,
            max_admin_len: 255,
            max_action_len: 100,
            max_details_len: 16 * 1024, // 16KB
            allow_session_fallback: false,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
