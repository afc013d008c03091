use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 存储后端: postgres (默认) 或 memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/billfold".to_string(),
                max_connections: 20,
            },
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

const ENV_PREFIX: &str = "BILLFOLD";

impl AppConfig {
    /// 默认值 → billfold.{toml,yaml,json} (或 BILLFOLD_CONFIG 指定的文件) → 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("BILLFOLD_CONFIG") {
            Ok(path) => Self::load_from_file(path),
            Err(_) => Self::build(File::with_name("billfold").required(false)),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::build(File::from(path.as_ref()))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = ConfigBuilder::builder()
            .add_source(ConfigBuilder::try_from(&AppConfig::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        // 兼容常用的 DATABASE_URL
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_yaml_file() {
        let yaml_content = r#"
server:
  host: "0.0.0.0"
  port: 8081
storage:
  backend: memory
logging:
  level: debug
"#;
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.logging.level, "debug");
        // 文件中未给出的字段保留默认值
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        temp_file
            .write_all(b"[storage]\nbackend = \"sqlite\"\n")
            .unwrap();
        assert!(AppConfig::load_from_file(temp_file.path()).is_err());
    }
}
