//! Configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Greeting seeded into every new session as the first agent message.
pub const DEFAULT_GREETING: &str = "Hallo! Ich bin dein digitaler Begleiter von Between The Lines. \
    Ich kann dir dabei helfen, Informationen über mentale Gesundheit zu finden oder passende \
    Unterstützung in deiner Nähe zu entdecken. Wie kann ich dir heute helfen?";

/// Chat service configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Bind address for the web channel.
    pub bind_addr: SocketAddr,
    /// Simulated agent processing delay before a canned reply.
    ///
    /// Stands in for a future backend round-trip. The crisis path skips it.
    pub typing_delay: Duration,
    /// Optional path to a routing policy file (JSON). Built-in defaults otherwise.
    pub policy_path: Option<PathBuf>,
    /// Greeting message seeded into every new session.
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            typing_delay: Duration::from_secs(2),
            policy_path: None,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl ChatConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// Recognized variables: `BTL_CHAT_ADDR`, `BTL_CHAT_TYPING_DELAY_MS`,
    /// `BTL_CHAT_POLICY_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BTL_CHAT_ADDR") {
            config.bind_addr = addr.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BTL_CHAT_ADDR".to_string(),
                message: format!("not a socket address: {addr}"),
            })?;
        }

        if let Ok(ms) = std::env::var("BTL_CHAT_TYPING_DELAY_MS") {
            let ms: u64 = ms.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BTL_CHAT_TYPING_DELAY_MS".to_string(),
                message: format!("not a number: {ms}"),
            })?;
            config.typing_delay = Duration::from_millis(ms);
        }

        if let Ok(path) = std::env::var("BTL_CHAT_POLICY_PATH") {
            config.policy_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}
