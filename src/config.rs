use std::time::Duration;

use anyhow::Context;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: String,
    pub notify_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://charity_ledger.sqlite".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let notify_timeout_secs: u64 = std::env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .context("NOTIFY_TIMEOUT_SECS must be a number of seconds")?;

        Ok(Self {
            host,
            port,
            database_url,
            upload_dir,
            notify_timeout: Duration::from_secs(notify_timeout_secs),
        })
    }
}
