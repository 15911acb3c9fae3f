//! Channel abstraction for the interactive surfaces.

pub mod channel;
pub mod cli;
pub mod manager;
pub mod web;

pub use channel::Channel;
pub use cli::CliChannel;
pub use manager::ChannelManager;
pub use web::WebChannel;
