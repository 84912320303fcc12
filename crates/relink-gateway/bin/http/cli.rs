use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use relink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

pub const LISTEN_ADDR_ENV: &str = "RELINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "RELINK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "RELINK_STORAGE_BACKEND";
pub const SQLITE_URL_ENV: &str = "RELINK_SQLITE_URL";
pub const MAX_ALLOCATION_ATTEMPTS_ENV: &str = "RELINK_MAX_ALLOCATION_ATTEMPTS";
pub const STORE_TIMEOUT_MS_ENV: &str = "RELINK_STORE_TIMEOUT_MS";
pub const DEFAULT_LABEL_ENV: &str = "RELINK_DEFAULT_LABEL";
pub const STATIC_DIR_ENV: &str = "RELINK_STATIC_DIR";
pub const LOG_FORMAT_ENV: &str = "RELINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SQLITE_URL: &str = "sqlite://relink.db";
pub const DEFAULT_MAX_ALLOCATION_ATTEMPTS: usize = 32;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "relink-gateway", about = "Dynamic QR code link service")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base of the redirect URLs encoded into QR codes. Derived from each
    /// request's Host header when unset.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<Url>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = SQLITE_URL_ENV, default_value = DEFAULT_SQLITE_URL)]
    pub sqlite_url: String,

    #[arg(
        long,
        env = MAX_ALLOCATION_ATTEMPTS_ENV,
        default_value_t = DEFAULT_MAX_ALLOCATION_ATTEMPTS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_allocation_attempts: usize,

    /// Deadline for every individual store call, in milliseconds.
    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = DEFAULT_STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,

    /// Label embedded in redirect URLs when a request brings no usable title.
    #[arg(long, env = DEFAULT_LABEL_ENV)]
    pub default_label: Option<String>,

    /// Directory served for paths that match no API route.
    #[arg(long, env = STATIC_DIR_ENV)]
    pub static_dir: Option<PathBuf>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}
