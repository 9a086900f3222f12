use std::sync::Arc;

use async_trait::async_trait;
use daybrief_core::{AccessToken, DeliveryChannel, Digest};
use daybrief_domain::{ChannelKind, ContentConfig, DeliveryOutcome};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::graph::{ApiResponse, GraphClient};
use crate::render::{file_name, render_file};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Agenda text file written to the member's drive.
#[derive(Debug, Clone)]
pub struct GraphFileDropChannel {
    client: GraphClient,
    folder: String,
    content: Arc<ContentConfig>,
}

impl GraphFileDropChannel {
    pub fn new(client: GraphClient, folder: impl Into<String>, content: Arc<ContentConfig>) -> Self {
        Self { client, folder: folder.into(), content }
    }

    /// Drive upload path, one encoded segment per folder level.
    pub fn upload_path(&self, member_id: &str, file: &str) -> String {
        let mut segments: Vec<String> = self
            .folder
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        segments.push(urlencoding::encode(file).into_owned());

        format!("/users/{}/drive/root:/{}:/content", urlencoding::encode(member_id), segments.join("/"))
    }
}

#[async_trait]
impl DeliveryChannel for GraphFileDropChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::FileDrop
    }

    #[instrument(skip_all, fields(channel = "file_drop", member_id = %digest.member.id))]
    async fn deliver(&self, token: &AccessToken, digest: &Digest) -> DeliveryOutcome {
        let text = {
            let mut rng = rand::thread_rng();
            render_file(digest, &self.content, &mut rng)
        };
        let path = self.upload_path(&digest.member.id, &file_name(digest.date));

        match self.client.put_bytes::<Value>(token, &path, TEXT_CONTENT_TYPE, text.as_bytes()).await {
            ApiResponse::Success(_) | ApiResponse::EmptySuccess { .. } => {
                debug!(%path, "agenda file written");
                DeliveryOutcome::delivered(ChannelKind::FileDrop)
            }
            ApiResponse::Failure(err) => {
                DeliveryOutcome::failed(ChannelKind::FileDrop, err.to_string())
            }
        }
    }
}
