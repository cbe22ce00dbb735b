use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub common: core_config::Config,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Simulated send latency applied to every delivery job.
    pub delay_ms: u64,
    /// When set, a finished delivery moves the stored record to `sent`.
    /// Off by default: records stay `pending` for their whole lifetime.
    pub mark_sent: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            mark_sent: false,
        }
    }
}

impl DeliveryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl NotificationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let defaults = DeliveryConfig::default();

        Ok(NotificationConfig {
            common: common_config,
            delivery: DeliveryConfig {
                delay_ms: get_env("DELIVERY_DELAY_MS", defaults.delay_ms)?,
                mark_sent: get_env("DELIVERY_MARK_SENT", defaults.mark_sent)?,
            },
        })
    }
}

fn get_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(val) if !val.trim().is_empty() => val.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!(
                "{} has an invalid value '{}': {}",
                key,
                val,
                e
            ))
        }),
        _ => Ok(default),
    }
}
