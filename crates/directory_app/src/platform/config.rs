use std::env::vars;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use directory_engine::SourceSettings;
use directory_logging::LogDestination;
use serde::Deserialize;

// Validated configuration for one session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub log_destination: LogDestination,
}

// Environment variables as read; everything optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    directory_api_url: Option<String>,
    directory_timeout_secs: Option<u64>,
    directory_log: Option<String>,
}

impl AppConfig {
    /// Loads `.env` if present, then reads `DIRECTORY_*` variables.
    pub fn init() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        let raw: RawConfig =
            serde_env::from_iter(vars()).context("reading DIRECTORY_* environment")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            directory_api_url,
            directory_timeout_secs,
            directory_log,
        } = raw;

        let mut source = SourceSettings::default();
        if let Some(url) = directory_api_url {
            source.base_url = url.trim().to_string();
        }
        source.users_url(1).map_err(|err| {
            anyhow!("DIRECTORY_API_URL '{}' is unusable: {err}", source.base_url)
        })?;

        if let Some(secs) = directory_timeout_secs {
            if secs == 0 {
                bail!("DIRECTORY_TIMEOUT_SECS must be at least 1");
            }
            source.request_timeout = Duration::from_secs(secs);
        }

        let log_destination = match directory_log {
            Some(name) => name.parse().context("DIRECTORY_LOG")?,
            None => LogDestination::default(),
        };

        Ok(Self {
            source,
            log_destination,
        })
    }
}
