//! Test configuration helpers for pointing the archiver at a mock API

use thing_archiver::config::RetryConfig;
use thing_archiver::{Archiver, Config};
use wiremock::MockServer;

/// Token every mock expects
pub const TEST_TOKEN: &str = "integration-token";

/// Configuration aimed at `server`, without retries
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.token = Some(TEST_TOKEN.to_string());
    config.retry = RetryConfig::disabled();
    config
}

/// Archiver aimed at `server`
pub fn mock_archiver(server: &MockServer) -> Archiver {
    Archiver::new(mock_config(server)).unwrap_or_else(|e| panic!("invalid test config: {e}"))
}
