use std::sync::Arc;

use async_trait::async_trait;
use daybrief_core::{AccessToken, DeliveryChannel, Digest};
use daybrief_domain::{ChannelKind, ContentConfig, DeliveryOutcome};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::graph::wire::{ItemBody, MailMessage, Recipient, RecipientAddress, SendMailRequest};
use crate::graph::{ApiResponse, GraphClient};
use crate::render::render_email;

/// Digest mail sent from the configured sender mailbox.
#[derive(Debug, Clone)]
pub struct GraphMailChannel {
    client: GraphClient,
    sender: String,
    content: Arc<ContentConfig>,
}

impl GraphMailChannel {
    pub fn new(client: GraphClient, sender: impl Into<String>, content: Arc<ContentConfig>) -> Self {
        Self { client, sender: sender.into(), content }
    }
}

#[async_trait]
impl DeliveryChannel for GraphMailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Email
    }

    #[instrument(skip_all, fields(channel = "email", member_id = %digest.member.id))]
    async fn deliver(&self, token: &AccessToken, digest: &Digest) -> DeliveryOutcome {
        let email = {
            let mut rng = rand::thread_rng();
            render_email(digest, &self.content, &mut rng)
        };

        let request = SendMailRequest {
            message: MailMessage {
                subject: &email.subject,
                body: ItemBody { content_type: "HTML", content: &email.html },
                to_recipients: vec![Recipient {
                    email_address: RecipientAddress { address: &digest.member.mail },
                }],
            },
            save_to_sent_items: "false",
        };
        let path = format!("/users/{}/sendMail", urlencoding::encode(&self.sender));

        match self.client.post_json::<_, Value>(token, &path, &request).await {
            ApiResponse::Success(_) | ApiResponse::EmptySuccess { .. } => {
                debug!(recipient = %digest.member.mail, "digest mail accepted");
                DeliveryOutcome::delivered(ChannelKind::Email)
            }
            ApiResponse::Failure(err) => DeliveryOutcome::failed(ChannelKind::Email, err.to_string()),
        }
    }
}
