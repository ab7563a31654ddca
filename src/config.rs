use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::bridge::{ExecutionAffinity, DEFAULT_LOCK_TIMEOUT};
use crate::device::desktop::capture::DEFAULT_JPEG_QUALITY;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    /// How long a mutating call may wait for exclusive access
    pub lock_timeout: Duration,
    pub execution_affinity: ExecutionAffinity,
    pub tree_max_depth: usize,
    /// Attach the local desktop as the automation session
    pub desktop_session: bool,
    /// Attach the local desktop screen-capture session
    pub capture_enabled: bool,
    pub jpeg_quality: u8,
}

/// Parse an env var, falling back to `default` when unset or invalid.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Invalid {}={:?} ({}), using default", name, raw, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!("Invalid {}={:?}, using default {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jpeg_quality = env_or("BRIDGE_JPEG_QUALITY", defaults.jpeg_quality);
        let jpeg_quality = if (1..=100).contains(&jpeg_quality) {
            jpeg_quality
        } else {
            tracing::warn!("BRIDGE_JPEG_QUALITY must be 1-100, using default");
            defaults.jpeg_quality
        };

        let tree_max_depth = match env_or("BRIDGE_TREE_MAX_DEPTH", defaults.tree_max_depth) {
            0 => {
                tracing::warn!("BRIDGE_TREE_MAX_DEPTH must be positive, using default");
                defaults.tree_max_depth
            }
            depth => depth,
        };

        Self {
            port: env_or("PORT", defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            lock_timeout: Duration::from_millis(env_or(
                "BRIDGE_LOCK_TIMEOUT_MS",
                defaults.lock_timeout.as_millis() as u64,
            )),
            execution_affinity: env_or("BRIDGE_EXECUTION_AFFINITY", defaults.execution_affinity),
            tree_max_depth,
            desktop_session: env_flag("BRIDGE_DESKTOP_SESSION", defaults.desktop_session),
            capture_enabled: env_flag("BRIDGE_CAPTURE_ENABLED", defaults.capture_enabled),
            jpeg_quality,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8765,
            host: "127.0.0.1".to_string(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            execution_affinity: ExecutionAffinity::None,
            tree_max_depth: 64,
            desktop_session: true,
            capture_enabled: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8765");
        assert_eq!(config.lock_timeout, Duration::from_millis(5000));
        assert_eq!(config.execution_affinity, ExecutionAffinity::None);
        assert_eq!(config.jpeg_quality, 80);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        assert_eq!(env_or("BRIDGE_TEST_UNSET_VARIABLE", 7u64), 7);

        env::set_var("BRIDGE_TEST_BAD_NUMBER", "soon");
        assert_eq!(env_or("BRIDGE_TEST_BAD_NUMBER", 5000u64), 5000);

        env::set_var("BRIDGE_TEST_AFFINITY", "dedicated-thread");
        assert_eq!(
            env_or("BRIDGE_TEST_AFFINITY", ExecutionAffinity::None),
            ExecutionAffinity::DedicatedThread
        );

        env::set_var("BRIDGE_TEST_FLAG", "maybe");
        assert!(env_flag("BRIDGE_TEST_FLAG", true));
        env::set_var("BRIDGE_TEST_FLAG", "off");
        assert!(!env_flag("BRIDGE_TEST_FLAG", true));
    }
}
