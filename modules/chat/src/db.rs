//! Per-entity model wiring.

use palaver_db::{DocumentStore, Model};

/// Fields that reference other records and may be stored in either
/// identifier representation.
const REFERENCE_FIELDS: [&str; 4] = ["userId", "conversationId", "senderId", "recipientId"];

/// One model façade per chat entity, wired against an injected store
/// handle. Only messages are listed through the keyset pagination engine;
/// the other entities need single-record or unordered-list retrieval only.
#[derive(Clone)]
pub struct ChatDb {
    pub users: Model,
    pub friends: Model,
    pub conversations: Model,
    pub members: Model,
    pub messages: Model,
}

impl ChatDb {
    pub fn new(store: &dyn DocumentStore) -> Self {
        let model = |name: &str| {
            Model::new(store.collection(name)).with_reference_fields(REFERENCE_FIELDS)
        };
        ChatDb {
            users: model("User"),
            friends: model("Friend"),
            conversations: model("Conversation"),
            members: model("ConversationMember"),
            messages: model("Message").with_keyset_paging(),
        }
    }
}
