use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SETUP_HINT: &str = "To fix this, create ~/.config/qiita-digest/.env with:\n  \
    EMAIL_ADDRESS=you@gmail.com\n  \
    APP_PASSWORD=your_app_password\n\n\
    Create a Gmail app password at: https://myaccount.google.com/apppasswords";

/// SMTP settings for the self-addressed digest mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Used as sender, recipient and SMTP username.
    pub email_address: String,
    pub app_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub timeout: Duration,
}

impl MailConfig {
    /// Read the mail credentials. Only needed when a digest is actually sent.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        Config::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok(), timeout)
    }

    pub fn from_lookup<F>(lookup: F, timeout: Duration) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email_address = non_blank(&lookup, "EMAIL_ADDRESS")
            .with_context(|| format!("EMAIL_ADDRESS not found.\n\n{}", SETUP_HINT))?;

        let app_password = non_blank(&lookup, "APP_PASSWORD")
            .with_context(|| format!("APP_PASSWORD not found.\n\n{}", SETUP_HINT))?;

        let smtp_host =
            non_blank(&lookup, "SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());

        let smtp_port = match non_blank(&lookup, "SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SMTP_PORT is not a valid port: {}", raw))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            email_address: email_address.trim().to_string(),
            app_password,
            smtp_host,
            smtp_port,
            timeout,
        })
    }
}

/// Settings shared by every run, with or without mail delivery.
#[derive(Debug, Clone)]
pub struct Config {
    pub qiita_access_token: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let qiita_access_token = non_blank(&lookup, "QIITA_ACCESS_TOKEN");

        let timeout_secs = match non_blank(&lookup, "REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            qiita_access_token,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/qiita-digest/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("qiita-digest").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - the variables might be set system-wide
    }
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}
