//! Port interfaces for the digest pipeline
//!
//! These traits define the boundaries between the orchestration logic and
//! the remote services it talks to.

use std::fmt;

use async_trait::async_trait;
use daybrief_domain::{ChannelKind, DeliveryOutcome, DirectoryEntry, Event, Member, Result};

use super::escalation::EscalationNotice;
use super::Digest;
use crate::schedule::DayWindow;

/// Opaque bearer token, valid for the duration of one run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw token, for an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Trait for obtaining the bearer token
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Exchange application credentials for a token.
    ///
    /// Transient failures are retried inside the provider; an `Err` here is
    /// final and ends the run.
    async fn acquire_token(&self) -> Result<AccessToken>;
}

/// Trait for roster and calendar retrieval
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Every directory entry, unfiltered.
    async fn list_members(&self, token: &AccessToken) -> Result<Vec<DirectoryEntry>>;

    /// The member's events that intersect `day`.
    async fn events_for_day(
        &self,
        token: &AccessToken,
        member: &Member,
        day: &DayWindow,
    ) -> Result<Vec<Event>>;
}

/// One notification mechanism.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// Render and send the digest once. Failures are reported in the outcome,
    /// never as a panic or an `Err`.
    async fn deliver(&self, token: &AccessToken, digest: &Digest) -> DeliveryOutcome;
}

/// Independent path to the administrator.
#[async_trait]
pub trait Escalator: Send + Sync {
    /// Deliver `notice`. Must not depend on the bearer token.
    async fn escalate(&self, notice: &EscalationNotice) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("eyJ0eXAi.secret");
        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
        assert_eq!(token.secret(), "eyJ0eXAi.secret");
    }
}
