//! The channel seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::session::ChatService;

/// An interactive surface that drives chat sessions.
///
/// Channels own their sessions: one per surface instance (the CLI REPL)
/// or one per connection (the web channel). All routing and state logic
/// lives in the session layer; channels are presentation and I/O only.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name (e.g. "cli", "web").
    fn name(&self) -> &str;

    /// Run the channel until its surface shuts down.
    async fn run(&self, service: Arc<ChatService>) -> Result<(), ChannelError>;
}
