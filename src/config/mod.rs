/// Database connection, table creation, and uniqueness indexes
pub mod database;

/// Application settings from config.toml and environment variables
pub mod settings;
