use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth_attempts: AuthAttemptsConfig,
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Apply pending migrations on startup. The hosted environments run
    /// migrations out of band, so this stays off outside development.
    pub auto_migrate: bool,
}

/// Thresholds for login abuse detection. Once the stored attempt count for an
/// ip (or ip + username pair) reaches its maximum, logins from that source are
/// rejected before credentials are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAttemptsConfig {
    pub for_ip: i64,
    pub for_ip_and_user: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    pub version_file: String,
    pub build_file: String,
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
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_AUTO_MIGRATE") {
            self.database.auto_migrate = v.parse().unwrap_or(self.database.auto_migrate);
        }

        // Abuse detection overrides
        if let Ok(v) = env::var("AUTH_ATTEMPTS_FOR_IP") {
            self.auth_attempts.for_ip = v.parse().unwrap_or(self.auth_attempts.for_ip);
        }
        if let Ok(v) = env::var("AUTH_ATTEMPTS_FOR_IP_AND_USER") {
            self.auth_attempts.for_ip_and_user = v.parse().unwrap_or(self.auth_attempts.for_ip_and_user);
        }

        // Health check side files
        if let Ok(v) = env::var("STATUS_VERSION_FILE") {
            self.status.version_file = v;
        }
        if let Ok(v) = env::var("STATUS_BUILD_FILE") {
            self.status.build_file = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 9000 },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                auto_migrate: true,
            },
            auth_attempts: AuthAttemptsConfig {
                for_ip: 50,
                for_ip_and_user: 7,
            },
            status: StatusConfig {
                version_file: "version.json".to_string(),
                build_file: "build_number.json".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 9000 },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                auto_migrate: false,
            },
            auth_attempts: AuthAttemptsConfig {
                for_ip: 50,
                for_ip_and_user: 7,
            },
            status: StatusConfig {
                version_file: "version.json".to_string(),
                build_file: "build_number.json".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 9000 },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                auto_migrate: false,
            },
            auth_attempts: AuthAttemptsConfig {
                for_ip: 50,
                for_ip_and_user: 7,
            },
            status: StatusConfig {
                version_file: "version.json".to_string(),
                build_file: "build_number.json".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.database.auto_migrate);
        assert_eq!(config.auth_attempts.for_ip, 50);
        assert_eq!(config.auth_attempts.for_ip_and_user, 7);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.database.auto_migrate);
        assert_eq!(config.database.max_connections, 50);
    }
}
