//! Typed views over the chat collections.
//!
//! Documents keep camelCase field names; the external string id is exposed
//! as `id` after normalization. The `New*` types are the id-less insert
//! shapes, with the store assigning identity.

use bson::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
}

/// A friend relation. `accept_time` is unset while the request is pending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub send_time: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_time: Option<DateTime>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFriend {
    pub sender_id: String,
    pub recipient_id: String,
    pub send_time: DateTime,
}

impl NewFriend {
    pub fn request(sender_id: impl Into<String>, recipient_id: impl Into<String>) -> Self {
        NewFriend {
            sender_id: sender_id.into(),
            recipient_id: recipient_id.into(),
            send_time: DateTime::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Membership of one user in one conversation. A row without `leave_time`
/// is an active member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMember {
    pub id: String,
    pub conversation_id: String,
    pub user_id: String,
    pub join_time: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_time: Option<DateTime>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversationMember {
    pub conversation_id: String,
    pub user_id: String,
    pub join_time: DateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub author_id: String,
    pub content: String,
    pub sent_at: DateTime,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub conversation_id: String,
    pub author_id: String,
    pub content: String,
    pub sent_at: DateTime,
}

impl NewMessage {
    pub fn new(
        conversation_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        NewMessage {
            conversation_id: conversation_id.into(),
            author_id: author_id.into(),
            content: content.into(),
            sent_at: DateTime::now(),
        }
    }
}
