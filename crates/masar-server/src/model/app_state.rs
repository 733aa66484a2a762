//! Application state shared across handlers

use sea_orm::DatabaseConnection;

use super::config::Configuration;

/// Shared application state handed to every handler via `web::Data`.
pub struct AppState {
    pub configuration: Configuration,
    db: DatabaseConnection,
}

impl AppState {
    pub fn new(configuration: Configuration, db: DatabaseConnection) -> Self {
        Self { configuration, db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
