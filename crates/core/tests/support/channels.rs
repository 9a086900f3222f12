use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use daybrief_core::{AccessToken, DeliveryChannel, Digest};
use daybrief_domain::{ChannelKind, DeliveryOutcome};

/// Channel that records each digest it was handed and fails for selected
/// members.
#[derive(Clone)]
pub struct RecordingChannel {
    kind: ChannelKind,
    failing_members: HashSet<String>,
    delivered: Arc<Mutex<Vec<Digest>>>,
}

impl RecordingChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self { kind, failing_members: HashSet::new(), delivered: Arc::default() }
    }

    pub fn failing_for(mut self, member_id: &str) -> Self {
        self.failing_members.insert(member_id.to_string());
        self
    }

    pub fn digests(&self) -> Vec<Digest> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(&self, _token: &AccessToken, digest: &Digest) -> DeliveryOutcome {
        self.delivered.lock().unwrap().push(digest.clone());
        if self.failing_members.contains(&digest.member.id) {
            DeliveryOutcome::failed(self.kind, "HTTP 500 from upstream")
        } else {
            DeliveryOutcome::delivered(self.kind)
        }
    }
}
