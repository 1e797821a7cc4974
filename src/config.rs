use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub chunk_size_kb: u64,
    pub max_upload_mb: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
            },
            database: DatabaseConfig {
                uri: std::env::var("MONGO_URI")
                    .map_err(|_| anyhow::anyhow!("MONGO_URI is missing in .env"))?,
                name: std::env::var("MONGO_DATABASE")
                    .unwrap_or_else(|_| "event_management_db".to_string()),
            },
            storage: StorageConfig {
                chunk_size_kb: std::env::var("STORAGE_CHUNK_SIZE_KB")
                    .unwrap_or_else(|_| "255".to_string())
                    .parse()?,
                max_upload_mb: std::env::var("STORAGE_MAX_UPLOAD_MB")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()?,
            },
        })
    }

    /// Returns chunk size in bytes
    pub fn chunk_size_bytes(&self) -> usize {
        (self.storage.chunk_size_kb * 1024) as usize
    }
}
