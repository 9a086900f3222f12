//! Graph-backed delivery channels.

pub mod chat;
pub mod email;
pub mod file_drop;

use std::sync::Arc;

use daybrief_core::DeliveryChannel;
use daybrief_domain::{ChannelKind, DigestConfig, DigestError, Result};

pub use chat::GraphChatChannel;
pub use email::GraphMailChannel;
pub use file_drop::GraphFileDropChannel;

use crate::graph::GraphClient;

/// Channels named in `delivery.channels`, in configured order.
pub fn build_channels(
    config: &DigestConfig,
    client: &GraphClient,
) -> Result<Vec<Arc<dyn DeliveryChannel>>> {
    let content = Arc::new(config.content.clone());
    let sender = || {
        config.sender_mailbox().map(str::to_string).ok_or_else(|| {
            DigestError::Config("a sender mailbox is required for email and chat".into())
        })
    };

    let mut channels: Vec<Arc<dyn DeliveryChannel>> = Vec::with_capacity(config.delivery.channels.len());
    for kind in &config.delivery.channels {
        let channel: Arc<dyn DeliveryChannel> = match kind {
            ChannelKind::Email => {
                Arc::new(GraphMailChannel::new(client.clone(), sender()?, Arc::clone(&content)))
            }
            ChannelKind::Chat => {
                Arc::new(GraphChatChannel::new(client.clone(), sender()?, Arc::clone(&content)))
            }
            ChannelKind::FileDrop => Arc::new(GraphFileDropChannel::new(
                client.clone(),
                config.delivery.file_drop_folder.clone(),
                Arc::clone(&content),
            )),
        };
        channels.push(channel);
    }
    Ok(channels)
}
