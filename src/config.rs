//! Engine configuration

use anyhow::Context;
use std::time::Duration;

/// Environment variable overriding [`EngineConfig::exclusive_wait`], in milliseconds
pub const WAIT_MS_ENV: &str = "ACCOUNTS_ENGINE_WAIT_MS";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long an operation waits for the exclusive hold of an account before failing as busy.
    pub exclusive_wait: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exclusive_wait: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Creates a config with a short wait for testing contention.
    pub fn for_testing() -> Self {
        Self {
            exclusive_wait: Duration::from_millis(50),
        }
    }

    /// Default config with values overridden from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(WAIT_MS_ENV) {
            config.exclusive_wait = parse_wait_ms(&raw)
                .with_context(|| format!("invalid {WAIT_MS_ENV} value {raw:?}"))?;
        }
        Ok(config)
    }
}

fn parse_wait_ms(raw: &str) -> anyhow::Result<Duration> {
    let ms: u64 = raw.trim().parse()?;
    if ms == 0 {
        anyhow::bail!("wait must be at least 1ms");
    }
    Ok(Duration::from_millis(ms))
}
