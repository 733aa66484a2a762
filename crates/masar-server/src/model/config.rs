//! Configuration management for Masar server
//!
//! This module handles loading and accessing application configuration.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use masar_auth::model::{
    DEFAULT_TOKEN_EXPIRE_SECONDS, MASAR_AUTH_ENABLED, TOKEN_EXPIRE_SECONDS, TOKEN_SECRET_KEY,
};

use super::constants::{
    CONTENT_DIR_PROPERTY, DB_URL_PROPERTY, DEFAULT_CONTENT_DIR, DEFAULT_CONTEXT_PATH,
    DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT, LOG_DIR_PROPERTY, LOG_LEVEL_PROPERTY,
    SERVER_ADDRESS_PROPERTY, SERVER_CONTEXT_PATH_PROPERTY, SERVER_PORT_PROPERTY,
};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command()]
struct Cli {
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> Self {
        let args = Cli::parse();

        Self::from_sources(args.config_file.as_deref(), args.port, args.database_url)
    }

    /// Build a configuration without consulting the process arguments; used
    /// directly by tests.
    pub fn from_sources(
        config_file: Option<&str>,
        port: Option<u16>,
        database_url: Option<String>,
    ) -> Self {
        let mut config_builder = Config::builder()
            .add_source(
                Environment::with_prefix("masar")
                    .separator(".")
                    .try_parsing(true),
            )
            .add_source(
                config::File::with_name(config_file.unwrap_or("conf/application.yml"))
                    .required(false),
            );

        if let Some(v) = port {
            config_builder = config_builder
                .set_override(SERVER_PORT_PROPERTY, i64::from(v))
                .expect("Failed to set server port override");
        }
        if let Some(v) = database_url {
            config_builder = config_builder
                .set_override(DB_URL_PROPERTY, v)
                .expect("Failed to set database URL override");
        }

        let app_config = config_builder
            .build()
            .expect("Failed to build configuration - check conf/application.yml");

        Configuration { config: app_config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_main_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    pub fn server_context_path(&self) -> String {
        self.config
            .get_string(SERVER_CONTEXT_PATH_PROPERTY)
            .unwrap_or(DEFAULT_CONTEXT_PATH.to_string())
    }

    // ========================================================================
    // Content Storage Configuration
    // ========================================================================

    pub fn content_dir(&self) -> String {
        self.config
            .get_string(CONTENT_DIR_PROPERTY)
            .unwrap_or(DEFAULT_CONTENT_DIR.to_string())
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn log_dir(&self) -> Option<String> {
        self.config.get_string(LOG_DIR_PROPERTY).ok()
    }

    pub fn log_level(&self) -> String {
        self.config
            .get_string(LOG_LEVEL_PROPERTY)
            .unwrap_or("info".to_string())
    }

    // ========================================================================
    // Auth Configuration
    // ========================================================================

    pub fn auth_enabled(&self) -> bool {
        self.config.get_bool(MASAR_AUTH_ENABLED).unwrap_or(true)
    }

    pub fn token_secret_key(&self) -> String {
        self.config.get_string(TOKEN_SECRET_KEY).unwrap_or_default()
    }

    pub fn auth_token_expire_seconds(&self) -> i64 {
        self.config
            .get_int(TOKEN_EXPIRE_SECONDS)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_SECONDS)
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub async fn database_connection(
        &self,
    ) -> std::result::Result<DatabaseConnection, Box<dyn std::error::Error>> {
        let max_connections = self
            .config
            .get_int("db.pool.config.maximumPoolSize")
            .unwrap_or(100) as u32;
        let min_connections = self
            .config
            .get_int("db.pool.config.minimumPoolSize")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.config.connectionTimeout")
            .unwrap_or(30) as u64;
        let acquire_timeout = self
            .config
            .get_int("db.pool.config.initializationFailTimeout")
            .unwrap_or(8) as u64;
        let idle_timeout = self
            .config
            .get_int("db.pool.config.idleTimeout")
            .unwrap_or(600) as u64;
        let max_lifetime = self
            .config
            .get_int("db.pool.config.maxLifetime")
            .unwrap_or(1800) as u64;
        let sqlx_logging = self.config.get_bool("db.pool.config.sqlLog").unwrap_or(false);

        let url = self.config.get_string(DB_URL_PROPERTY)?;

        let mut opt = ConnectOptions::new(url);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        let database_connection: DatabaseConnection = Database::connect(opt).await?;

        Ok(database_connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_configuration() -> Configuration {
        Configuration::from_sources(Some("conf/nonexistent.yml"), None, None)
    }

    #[test]
    fn test_defaults() {
        let configuration = bare_configuration();
        assert_eq!(configuration.server_address(), DEFAULT_SERVER_ADDRESS);
        assert_eq!(configuration.server_main_port(), DEFAULT_SERVER_PORT);
        assert_eq!(configuration.server_context_path(), DEFAULT_CONTEXT_PATH);
        assert_eq!(configuration.content_dir(), DEFAULT_CONTENT_DIR);
        assert!(configuration.auth_enabled());
        assert_eq!(
            configuration.auth_token_expire_seconds(),
            DEFAULT_TOKEN_EXPIRE_SECONDS
        );
    }

    #[test]
    fn test_overrides() {
        let configuration =
            Configuration::from_sources(Some("conf/nonexistent.yml"), Some(9000), None);
        assert_eq!(configuration.server_main_port(), 9000);
    }
}
