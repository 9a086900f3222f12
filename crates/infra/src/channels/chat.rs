use std::sync::Arc;

use async_trait::async_trait;
use daybrief_core::{AccessToken, DeliveryChannel, Digest};
use daybrief_domain::{ChannelKind, ContentConfig, DeliveryOutcome};
use tracing::{debug, instrument};

use crate::graph::wire::{ChatMember, ChatMessageRequest, CreateChatRequest, Created, ItemBody};
use crate::graph::{GraphClient, GraphError};
use crate::render::render_chat;

const CONVERSATION_MEMBER_TYPE: &str = "#microsoft.graph.aadUserConversationMember";

/// One-on-one chat message from the sender to the member.
///
/// Two calls: provision (or reuse) the chat, then post into it. Both must
/// return an `id`.
#[derive(Debug, Clone)]
pub struct GraphChatChannel {
    client: GraphClient,
    sender: String,
    content: Arc<ContentConfig>,
}

impl GraphChatChannel {
    pub fn new(client: GraphClient, sender: impl Into<String>, content: Arc<ContentConfig>) -> Self {
        Self { client, sender: sender.into(), content }
    }

    fn member_bind(&self, user: &str) -> ChatMember {
        ChatMember {
            odata_type: CONVERSATION_MEMBER_TYPE,
            roles: vec!["owner"],
            user_bind: format!("{}/users/{}", self.client.base_url(), user),
        }
    }

    async fn open_chat(&self, token: &AccessToken, digest: &Digest) -> Result<String, GraphError> {
        let request = CreateChatRequest {
            chat_type: "oneOnOne",
            members: vec![
                self.member_bind(&self.sender),
                self.member_bind(&digest.member.chat_identity),
            ],
        };
        let created: Created =
            self.client.post_json(token, "/chats", &request).await.into_body("/chats")?;
        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GraphError::parse("/chats", "created chat has no id"))
    }

    async fn post_message(
        &self,
        token: &AccessToken,
        chat_id: &str,
        text: &str,
    ) -> Result<String, GraphError> {
        let path = format!("/chats/{}/messages", urlencoding::encode(chat_id));
        let request = ChatMessageRequest { body: ItemBody { content_type: "text", content: text } };
        let created: Created = self.client.post_json(token, &path, &request).await.into_body(&path)?;
        created.id.filter(|id| !id.is_empty()).ok_or_else(|| GraphError::parse(path, "message has no id"))
    }
}

#[async_trait]
impl DeliveryChannel for GraphChatChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Chat
    }

    #[instrument(skip_all, fields(channel = "chat", member_id = %digest.member.id))]
    async fn deliver(&self, token: &AccessToken, digest: &Digest) -> DeliveryOutcome {
        let text = {
            let mut rng = rand::thread_rng();
            render_chat(digest, &self.content, &mut rng)
        };

        let chat_id = match self.open_chat(token, digest).await {
            Ok(id) => id,
            Err(err) => {
                return DeliveryOutcome::failed(ChannelKind::Chat, format!("chat not opened: {err}"))
            }
        };

        match self.post_message(token, &chat_id, &text).await {
            Ok(message_id) => {
                debug!(%chat_id, %message_id, "chat message posted");
                DeliveryOutcome::delivered(ChannelKind::Chat)
            }
            Err(err) => DeliveryOutcome::failed(ChannelKind::Chat, format!("message not posted: {err}")),
        }
    }
}
