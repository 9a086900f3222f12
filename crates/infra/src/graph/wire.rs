//! Graph JSON payloads.

use serde::{Deserialize, Serialize};

/// One page of a Graph collection.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphUser {
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub mail: Option<String>,
    #[serde(rename = "userPrincipalName")]
    pub user_principal_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphEvent {
    pub id: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "bodyPreview")]
    pub body_preview: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    pub location: Option<GraphLocation>,
    pub organizer: Option<GraphRecipient>,
    pub attendees: Option<Vec<GraphAttendee>>,
    #[serde(rename = "isAllDay", default)]
    pub is_all_day: bool,
}

#[derive(Debug, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphLocation {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphRecipient {
    #[serde(rename = "emailAddress")]
    pub email_address: Option<EmailAddress>,
}

#[derive(Debug, Deserialize)]
pub struct GraphAttendee {
    #[serde(rename = "emailAddress")]
    pub email_address: Option<EmailAddress>,
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseStatus {
    pub response: Option<String>,
}

/// Response carrying the created resource's identifier.
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Outgoing payloads */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub struct SendMailRequest<'a> {
    pub message: MailMessage<'a>,
    #[serde(rename = "saveToSentItems")]
    pub save_to_sent_items: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MailMessage<'a> {
    pub subject: &'a str,
    pub body: ItemBody<'a>,
    #[serde(rename = "toRecipients")]
    pub to_recipients: Vec<Recipient<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ItemBody<'a> {
    #[serde(rename = "contentType")]
    pub content_type: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Recipient<'a> {
    #[serde(rename = "emailAddress")]
    pub email_address: RecipientAddress<'a>,
}

#[derive(Debug, Serialize)]
pub struct RecipientAddress<'a> {
    pub address: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateChatRequest {
    #[serde(rename = "chatType")]
    pub chat_type: &'static str,
    pub members: Vec<ChatMember>,
}

#[derive(Debug, Serialize)]
pub struct ChatMember {
    #[serde(rename = "@odata.type")]
    pub odata_type: &'static str,
    pub roles: Vec<&'static str>,
    #[serde(rename = "user@odata.bind")]
    pub user_bind: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageRequest<'a> {
    pub body: ItemBody<'a>,
}
