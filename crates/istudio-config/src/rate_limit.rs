//! Rate limiting configuration.
//!
//! Token-bucket limits built with the Governor crate, keyed by peer IP.
//! Sign-in endpoints get a stricter bucket than the rest of the API to slow
//! down credential stuffing.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_GENERAL_PER_SECOND` (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE` (default: 30)
//! - `RATE_LIMIT_AUTH_PER_SECOND` (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE` (default: 5)

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Token replenishment rate for general endpoints.
    #[allow(dead_code)]
    pub general_per_second: u64,

    /// Maximum token accumulation for general endpoints.
    #[allow(dead_code)]
    pub general_burst_size: u32,

    /// Token replenishment rate for sign-in/refresh endpoints.
    #[allow(dead_code)]
    pub auth_per_second: u64,

    /// Maximum token accumulation for sign-in/refresh endpoints.
    #[allow(dead_code)]
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 2,
            general_burst_size: 30,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Loads limits from the environment, falling back to defaults for
    /// unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_per_second: std::env::var("RATE_LIMIT_GENERAL_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.general_per_second),
            general_burst_size: std::env::var("RATE_LIMIT_GENERAL_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.general_burst_size),
            auth_per_second: std::env::var("RATE_LIMIT_AUTH_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: std::env::var("RATE_LIMIT_AUTH_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_burst_size),
        }
    }

    /// Governor config for general API endpoints, keyed by peer IP.
    ///
    /// # Panics
    ///
    /// Panics if the governor configuration cannot be built (does not
    /// happen with valid values).
    #[allow(dead_code)]
    #[must_use]
    pub fn general_governor_config(
        &self,
    ) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.general_per_second)
            .burst_size(self.general_burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("Failed to build general rate limiter config")
    }

    /// Stricter governor config for authentication endpoints.
    ///
    /// # Panics
    ///
    /// Panics if the governor configuration cannot be built.
    #[allow(dead_code)]
    #[must_use]
    pub fn auth_governor_config(
        &self,
    ) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second)
            .burst_size(self.auth_burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("Failed to build auth rate limiter config")
    }
}
