use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::{Error, Result};
use crate::services::email_service::MailConfig;

/// Process-wide configuration, loaded once at startup and carried in
/// `AppState`. Components receive it by reference; nothing reads the
/// environment after boot.
#[derive(Clone)]
pub struct AppConfig {
    pub db_url: String,
    pub db_ns: String,
    pub db_name: String,
    pub db_user: Option<String>,
    pub db_password: Option<String>,

    pub bind_addr: SocketAddr,
    pub public_base_url: String,

    /// Shared secret expected in the `x-admin-secret` header.
    pub admin_secret: String,

    /// Root directory of the blob store, served under `/media`.
    pub media_root: PathBuf,

    pub mail: Option<MailConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let db_url = env::var("DB_URL")?;
        let db_ns = env::var("DB_NS").unwrap_or_else(|_| "soundchart".to_string());
        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "soundchart".to_string());
        let db_user = env::var("DB_USER").ok();
        let db_password = env::var("DB_PASSWORD").ok();

        let host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let bind_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| Error::ConfigError(format!("invalid bind address {}:{}", host, port)))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let admin_secret = env::var("ADMIN_SECRET")?;
        if admin_secret.is_empty() {
            return Err(Error::ConfigError("ADMIN_SECRET must not be empty".to_string()));
        }

        let media_root = PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string()));

        Ok(Self {
            db_url,
            db_ns,
            db_name,
            db_user,
            db_password,
            bind_addr,
            public_base_url,
            admin_secret,
            media_root,
            mail: MailConfig::from_env(),
        })
    }
}
