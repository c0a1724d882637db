//! 数据库基础设施

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::time::Duration;
use tracing::info;

use super::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 惰性建池：启动时不连接数据库，首次取连接时才建立。
    /// 数据库不可用时服务照常监听，单个请求失败。
    pub fn new(config: &DatabaseConfig) -> Self {
        info!(
            "Connecting to database {} at {}:{} as {} (encrypt: {})",
            config.database, config.host, config.port, config.user, config.encrypt
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(0)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Duration::from_secs(60))
            .connect_lazy_with(connect_options(config));

        Self { pool }
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let ssl_mode = if config.encrypt {
        PgSslMode::Require
    } else {
        PgSslMode::Prefer
    };

    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .ssl_mode(ssl_mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            user: "app".to_string(),
            password: "secret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 1,
            database: "shop".to_string(),
            encrypt: true,
            max_connections: 2,
            acquire_timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn encryption_is_required_by_default() {
        let options = connect_options(&config());
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 1);
        assert_eq!(options.get_database(), Some("shop"));
    }

    #[tokio::test]
    async fn lazy_pool_fails_per_acquire_when_database_is_down() {
        let manager = DatabaseManager::new(&config());
        assert!(manager.get_pool().acquire().await.is_err());
        manager.close().await;
    }
}
