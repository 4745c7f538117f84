//! Rate Limiting Middleware using GCRA Algorithm
//!
//! IP-based limiting via tower_governor, applied to the access-request
//! routes where each call triggers policy evaluation and decryption.

use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with rate-limit headers enabled
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Replenishment interval in seconds
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Strict config for the access endpoints
    pub fn strict() -> Self {
        Self {
            per_second: 4,
            burst_size: 2,
        }
    }
}

/// Create a rate limiting governor config.
///
/// Uses PeerIpKeyExtractor, so the service must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`. Adds
/// X-RateLimit-* headers to responses for quota visibility.
pub fn create_governor_config(config: &RateLimitConfig) -> Arc<DefaultGovernorConfig> {
    Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.per_second)
            .burst_size(config.burst_size)
            .use_headers()
            .finish()
            .unwrap(),
    )
}
