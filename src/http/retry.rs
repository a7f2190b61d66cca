//! Retry policies for HTTP delivery of RPC calls.

use std::time::Duration;

use crate::error::HttpError;

/// When to retry a failed delivery.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Deliver once. Default: most RPC methods are not idempotent (`prepare`,
    /// `withdraw`, `fund`).
    #[default]
    None,
    /// Retry connection failures, 429 and 502/503/504 with backoff.
    Idempotent,
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Resolved config, or `None` for single delivery.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(config) => Some(config.clone()),
        }
    }
}

/// Backoff parameters.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Spread delays by ±25%.
    pub jitter: bool,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn idempotent() -> Self {
        Self {
            retryable_statuses: vec![429, 502, 503, 504],
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    /// Whether `error` is worth another attempt under this config.
    pub fn should_retry(&self, error: &HttpError) -> bool {
        match error {
            HttpError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            HttpError::RateLimited => self.retryable_statuses.contains(&429),
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_delivers_once() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
        assert!(RetryPolicy::default().config().is_none());
    }

    #[test]
    fn idempotent_config_retries_rate_limits() {
        let config = RetryPolicy::Idempotent.config().unwrap();
        assert!(config.should_retry(&HttpError::RateLimited));
        assert!(config.should_retry(&HttpError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::Unauthorized));
        assert!(!RetryConfig::default().should_retry(&HttpError::RateLimited));
    }

    #[test]
    fn delay_grows_exponentially() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn delay_caps_at_max() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2000),
            backoff_factor: 10.0,
            jitter: false,
            retryable_statuses: vec![],
        };
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(1000),
            ..RetryConfig::default()
        };
        for _ in 0..20 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms), "{}", ms);
        }
    }
}
