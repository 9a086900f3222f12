//! Directory members
//!
//! A [`DirectoryEntry`] is whatever the roster returned; a [`Member`] is an
//! entry that can actually receive a digest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw roster record. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
}

/// Why a roster entry cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SkipReason {
    #[error("entry has no identifier")]
    MissingId,
    #[error("entry has no mail address or principal name")]
    MissingContact,
}

/// A person eligible for a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    /// Delivery address: `mail`, else the user principal name.
    pub mail: String,
    /// Identity used to open a chat with the member.
    pub chat_identity: String,
}

impl Member {
    /// First word of the display name. A member whose display name is just
    /// their mail address is called by the address's local part.
    pub fn first_name(&self) -> &str {
        if self.display_name == self.mail {
            if let Some(local) = self.mail.split('@').next().filter(|local| !local.is_empty()) {
                return local;
            }
        }
        self.display_name.split_whitespace().next().unwrap_or(&self.mail)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl TryFrom<DirectoryEntry> for Member {
    type Error = SkipReason;

    fn try_from(entry: DirectoryEntry) -> Result<Self, Self::Error> {
        let id = non_blank(entry.id).ok_or(SkipReason::MissingId)?;
        let mail = non_blank(entry.mail)
            .or_else(|| non_blank(entry.user_principal_name))
            .ok_or(SkipReason::MissingContact)?;
        let display_name = non_blank(entry.display_name).unwrap_or_else(|| mail.clone());

        Ok(Self { chat_identity: id.clone(), id, display_name, mail })
    }
}
