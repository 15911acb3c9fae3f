//! Channel manager: runs every registered channel concurrently.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use crate::channels::channel::Channel;
use crate::error::Result;
use crate::session::ChatService;

/// Holds the registered channels and drives them to completion.
pub struct ChannelManager {
    channels: Vec<Box<dyn Channel>>,
}

impl ChannelManager {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    pub fn add(&mut self, channel: Box<dyn Channel>) {
        self.channels.push(channel);
    }

    pub fn names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Run all channels concurrently; returns once every channel has
    /// finished (the web channel normally never does).
    pub async fn run(self, service: Arc<ChatService>) -> Result<()> {
        let tasks = self.channels.into_iter().map(|channel| {
            let service = Arc::clone(&service);
            async move {
                let name = channel.name().to_string();
                match channel.run(service).await {
                    Ok(()) => info!(channel = %name, "Channel finished"),
                    Err(e) => error!(channel = %name, error = %e, "Channel exited with error"),
                }
            }
        });

        join_all(tasks).await;
        Ok(())
    }
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::config::ChatConfig;
    use crate::error::ChannelError;
    use crate::policy::RoutingPolicy;
    use crate::resources::CrisisDirectory;

    struct NoopChannel(&'static str);

    #[async_trait]
    impl Channel for NoopChannel {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, _service: Arc<ChatService>) -> std::result::Result<(), ChannelError> {
            Ok(())
        }
    }

    #[test]
    fn names_reports_registration_order() {
        let mut manager = ChannelManager::new();
        manager.add(Box::new(NoopChannel("cli")));
        manager.add(Box::new(NoopChannel("web")));
        assert_eq!(manager.names(), vec!["cli", "web"]);
    }

    #[tokio::test]
    async fn run_returns_when_all_channels_finish() {
        let service = Arc::new(ChatService::new(
            RoutingPolicy::with_defaults(),
            CrisisDirectory::default(),
            ChatConfig::default(),
        ));
        let mut manager = ChannelManager::new();
        manager.add(Box::new(NoopChannel("cli")));
        manager.run(service).await.unwrap();
    }
}
