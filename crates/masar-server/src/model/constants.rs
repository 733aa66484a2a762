//! Server-specific configuration keys and defaults

// Server
pub const SERVER_ADDRESS_PROPERTY: &str = "server.address";
pub const SERVER_PORT_PROPERTY: &str = "server.port";
pub const SERVER_CONTEXT_PATH_PROPERTY: &str = "masar.server.contextPath";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_CONTEXT_PATH: &str = "/masar";

// Content storage
pub const CONTENT_DIR_PROPERTY: &str = "masar.content.dir";
pub const DEFAULT_CONTENT_DIR: &str = "data/content";
pub const MAX_THUMBNAIL_BYTES: usize = 2 * 1024 * 1024;

// Logging
pub const LOG_DIR_PROPERTY: &str = "masar.logs.path";
pub const LOG_LEVEL_PROPERTY: &str = "masar.logs.level";

// Database
pub const DB_URL_PROPERTY: &str = "db.url";
