//! 配置结构，字段与 `config.toml` 一一对应

use serde::{Deserialize, Serialize};

use super::r#impl::MAX_IMPORT_ROWS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub argon2: ArgonConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// 租户未设置 `tenant.display_name` 时显示的名称
    pub system_name: String,
    /// development | production
    pub environment: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 非空时绑定 Unix socket（仅 Unix）
    #[serde(default)]
    pub unix_socket_path: String,
    /// 0 表示按 CPU 核数
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,    // ms
    pub client_disconnect: u64, // ms
    pub keep_alive: u64,        // s
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// JSON 请求体上限（字节）
    pub max_payload_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)]
    pub secret: String,
    /// 以下均为秒
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub refresh_token_remember_me_expiry: i64,
}

/// Argon2id 参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgonConfig {
    pub memory_cost: u32, // KiB
    pub time_cost: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// postgres:// | sqlite:// | mysql://，驱动由 scheme 决定
    pub url: String,
    pub pool_size: u32,
    pub timeout: u64, // s
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// moka | redis
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64, // s
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// `*` 表示不限制
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize, // s
}

impl Default for CorsConfig {
    fn default() -> Self {
        let any = || vec!["*".to_string()];
        Self {
            allowed_origins: any(),
            allowed_methods: any(),
            allowed_headers: any(),
            max_age: 3600,
        }
    }
}

/// 学生 CSV 导入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 租户未设置 `import.max_rows` 时使用，不超过 [`MAX_IMPORT_ROWS`]
    pub default_max_rows: i64,
    /// 上传文件上限（字节）
    pub max_file_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_max_rows: 1000.min(MAX_IMPORT_ROWS),
            max_file_size: 5 * 1024 * 1024,
        }
    }
}
