/// 서비스 설정
/// 모든 값은 환경 변수에서 읽는다.
// region:    --- Imports
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

// endregion: --- Imports

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// region:    --- Config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 서비스가 사용할 `MarketStore` 구현체
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub recreate_database: bool,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// 프로세스 환경 변수로부터 설정 생성
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `lookup`으로 각 키를 조회하여 설정 생성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::Postgres)?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        let recreate_database = parse_or(&lookup, "DB_RECREATE", false)?;

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "LISTEN_ADDR",
                value,
            })?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    key: "LISTEN_ADDR",
                    value: DEFAULT_LISTEN_ADDR.to_string(),
                })?,
        };

        Ok(Self {
            store_backend,
            database_url,
            max_connections,
            recreate_database,
            listen_addr,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
// endregion: --- Config

// endregion: --- Tests
