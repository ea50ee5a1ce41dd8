use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// 環境変数を読み取り、未設定の場合はデフォルト値を使用する
fn var_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// データベース接続設定
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// 環境変数から設定を読み取る
    /// `.env` の読み込みは呼び出し側（main）で行う
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("DATABASE_HOST", "localhost".to_string())?,
            port: var_or("DATABASE_PORT", 3306)?,
            database: var_or("DATABASE_NAME", "bakery_db".to_string())?,
            username: var_or("DATABASE_USER", "bakery_user".to_string())?,
            password: var_or("DATABASE_PASSWORD", "bakery_password".to_string())?,
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }

    /// MySQL接続文字列を生成
    pub fn connection_string(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// HTTPサーバー設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("SERVER_HOST", "0.0.0.0".to_string())?,
            port: var_or("SERVER_PORT", 3000)?,
        })
    }

    /// 待ち受けアドレス
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid SERVER_HOST: {}", e)))
    }
}
