use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Shared application state: configuration plus the process-wide
/// database connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
}
