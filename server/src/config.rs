// server/src/config.rs

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{AppError, Result};
use dotenvy::dotenv;

/// Which `Storage` implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Memory,
  Postgres,
}

impl FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "memory" => Ok(StorageBackend::Memory),
      "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
      other => Err(AppError::Config(format!(
        "Invalid STORAGE_BACKEND '{}': expected 'memory' or 'postgres'",
        other
      ))),
    }
  }
}

impl fmt::Display for StorageBackend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StorageBackend::Memory => f.write_str("memory"),
      StorageBackend::Postgres => f.write_str("postgres"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub storage_backend: StorageBackend,
  pub database_url: Option<String>,
  pub database_max_connections: u32,

  // STL uploads
  pub upload_dir: PathBuf,
  pub max_upload_bytes: usize,

  pub seed_db: bool,
  pub log_format: LogFormat,
}

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_vars()
  }

  /// Reads the process environment without touching `.env`.
  pub fn from_vars() -> Result<Self> {
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", get_env("SERVER_PORT"), 5000u16)?;

    let database_url = get_env("DATABASE_URL");
    let storage_backend = match get_env("STORAGE_BACKEND") {
      Some(raw) => raw.parse::<StorageBackend>()?,
      None if database_url.is_some() => StorageBackend::Postgres,
      None => StorageBackend::Memory,
    };
    if storage_backend == StorageBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required for the postgres backend)".to_string(),
      ));
    }
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", get_env("DATABASE_MAX_CONNECTIONS"), 5u32)?;

    let upload_dir = PathBuf::from(get_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()));
    let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", get_env("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)?;

    let seed_db = parse_var("SEED_DB", get_env("SEED_DB"), true)?;

    let log_format = match get_env("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
          other
        )))
      }
    };

    Ok(Self {
      server_host,
      server_port,
      storage_backend,
      database_url,
      database_max_connections,
      upload_dir,
      max_upload_bytes,
      seed_db,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }

  /// Configuration for tests and local tinkering: memory backend, no seeding.
  pub fn for_memory(upload_dir: impl Into<PathBuf>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      storage_backend: StorageBackend::Memory,
      database_url: None,
      database_max_connections: 1,
      upload_dir: upload_dir.into(),
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
      seed_db: false,
      log_format: LogFormat::Pretty,
    }
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, value, e))),
  }
}
