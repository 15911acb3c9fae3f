use std::sync::Arc;

use anyhow::Context;

use btl_chat::channels::{ChannelManager, CliChannel, WebChannel};
use btl_chat::config::ChatConfig;
use btl_chat::policy::RoutingPolicy;
use btl_chat::resources::CrisisDirectory;
use btl_chat::session::ChatService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ChatConfig::from_env().context("Invalid configuration")?;

    let policy = match &config.policy_path {
        Some(path) => RoutingPolicy::load_from_file(path)
            .with_context(|| format!("Failed to load policy from {}", path.display()))?,
        None => RoutingPolicy::with_defaults(),
    };

    eprintln!("💬 Between The Lines Chat v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Chat WS: ws://{}/ws/chat", config.bind_addr);
    eprintln!("   Health:  http://{}/health", config.bind_addr);
    eprintln!(
        "   Policy:  {}",
        config
            .policy_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string())
    );
    eprintln!("   Type a message and press Enter. /quit to exit.\n");

    let bind_addr = config.bind_addr;
    let service = Arc::new(ChatService::new(
        policy,
        CrisisDirectory::default(),
        config,
    ));

    let mut channels = ChannelManager::new();
    channels.add(Box::new(CliChannel::new()));
    channels.add(Box::new(WebChannel::new(bind_addr)));
    eprintln!("   Channels: {}\n", channels.names().join(", "));

    channels.run(service).await?;

    Ok(())
}
