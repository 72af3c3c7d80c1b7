//! Access-guard timing and redirect configuration.
//!
//! The guard re-validates the session on a fixed interval while a route is
//! authorized, and forces a sign-in redirect if initialization has not
//! resolved within the safety timeout. Both values are configurable for
//! tests; production defaults are 5 minutes and 10 seconds.
//!
//! # Environment Variables
//!
//! - `GUARD_REVALIDATE_SECONDS`: Session re-check interval (default: `300`)
//! - `GUARD_RESOLVE_TIMEOUT_SECONDS`: Safety timeout (default: `10`)
//! - `GUARD_SIGN_IN_PATH`: Sign-in entry point (default: `/auth/sign-in`)
//! - `GUARD_HOME_PATH`: Authenticated landing page (default: `/dashboard`)

use std::env;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    /// Seconds between session re-validation checks while authorized.
    pub revalidate_seconds: u64,

    /// Seconds before an unresolved initialization forces a sign-in
    /// redirect.
    pub resolve_timeout_seconds: u64,

    /// Where unauthenticated principals are sent.
    pub sign_in_path: String,

    /// Where authenticated-but-denied principals are sent.
    pub home_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            revalidate_seconds: 300,
            resolve_timeout_seconds: 10,
            sign_in_path: "/auth/sign-in".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

impl GuardConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            revalidate_seconds: env::var("GUARD_REVALIDATE_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.revalidate_seconds),
            resolve_timeout_seconds: env::var("GUARD_RESOLVE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.resolve_timeout_seconds),
            sign_in_path: env::var("GUARD_SIGN_IN_PATH").unwrap_or(defaults.sign_in_path),
            home_path: env::var("GUARD_HOME_PATH").unwrap_or(defaults.home_path),
        }
    }

    pub fn revalidate_interval(&self) -> Duration {
        Duration::from_secs(self.revalidate_seconds)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_seconds)
    }
}
