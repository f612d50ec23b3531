//! Query helpers behind the route layer.
//!
//! Callers hand in already-validated values; these helpers only shape the
//! queries and map documents to typed records.

use bson::DateTime;
use palaver_db::{Filter, Page, PageCursor, PageRequest, Query, Value};
use tracing::debug;

use crate::db::ChatDb;
use crate::entities::{
    Conversation, ConversationMember, Friend, Message, NewConversation, NewConversationMember,
    NewFriend, NewMessage, NewUser, User,
};
use crate::error::{decode, encode, ChatResult};

/* ---------- users ---------- */

pub async fn create_user(db: &ChatDb, new: NewUser) -> ChatResult<User> {
    let created = db.users.create(encode("User", &new)?).await?;
    decode("User", created)
}

pub async fn user_by_id(db: &ChatDb, id: &str) -> ChatResult<Option<User>> {
    let found = db.users.find_unique(&Filter::eq("id", id), None).await?;
    found.map(|d| decode("User", d)).transpose()
}

pub async fn user_by_username(db: &ChatDb, username: &str) -> ChatResult<Option<User>> {
    let found = db
        .users
        .find_unique(&Filter::eq("username", username), None)
        .await?;
    found.map(|d| decode("User", d)).transpose()
}

/* ---------- friends ---------- */

pub async fn send_friend_request(
    db: &ChatDb,
    sender_id: &str,
    recipient_id: &str,
) -> ChatResult<Friend> {
    let new = NewFriend::request(sender_id, recipient_id);
    let created = db.friends.create(encode("Friend", &new)?).await?;
    decode("Friend", created)
}

/// All relations the user participates in, on either side.
pub async fn friends_of(db: &ChatDb, user_id: &str) -> ChatResult<Vec<Friend>> {
    let filter = Filter::or([
        Filter::eq("senderId", user_id),
        Filter::eq("recipientId", user_id),
    ]);
    let found = db.friends.find_many(Query::new().filter(filter)).await?;
    found.into_iter().map(|d| decode("Friend", d)).collect()
}

/// The relation between two users, if any. `bidirectional` also accepts a
/// request sent the other way.
pub async fn friend_relation(
    db: &ChatDb,
    user_id: &str,
    other_id: &str,
    bidirectional: bool,
) -> ChatResult<Option<Friend>> {
    let incoming = Filter::and([
        Filter::eq("senderId", other_id),
        Filter::eq("recipientId", user_id),
    ]);
    let filter = if bidirectional {
        Filter::or([
            incoming,
            Filter::and([
                Filter::eq("senderId", user_id),
                Filter::eq("recipientId", other_id),
            ]),
        ])
    } else {
        incoming
    };
    let found = db.friends.find_first(&filter, None).await?;
    found.map(|d| decode("Friend", d)).transpose()
}

pub async fn accept_friend_request(db: &ChatDb, relation_id: &str) -> ChatResult<bool> {
    let matched = db
        .friends
        .update(
            &Filter::eq("id", relation_id),
            bson::doc! { "acceptTime": DateTime::now() },
        )
        .await?;
    Ok(matched > 0)
}

pub async fn remove_friend(db: &ChatDb, relation_id: &str) -> ChatResult<bool> {
    Ok(db.friends.delete(&Filter::eq("id", relation_id)).await?)
}

/* ---------- conversations and membership ---------- */

/// Create a conversation and enroll every given user.
pub async fn create_conversation(
    db: &ChatDb,
    member_ids: &[String],
    title: Option<String>,
) -> ChatResult<Conversation> {
    let created = db
        .conversations
        .create(encode("Conversation", &NewConversation { title })?)
        .await?;
    let conversation: Conversation = decode("Conversation", created)?;

    let join_time = DateTime::now();
    let members = member_ids
        .iter()
        .map(|user_id| {
            encode(
                "ConversationMember",
                &NewConversationMember {
                    conversation_id: conversation.id.clone(),
                    user_id: user_id.clone(),
                    join_time,
                },
            )
        })
        .collect::<ChatResult<Vec<_>>>()?;
    db.members.create_many(members).await?;

    debug!(conversation = %conversation.id, members = member_ids.len(), "conversation created");
    Ok(conversation)
}

pub async fn rename_conversation(
    db: &ChatDb,
    conversation_id: &str,
    title: &str,
) -> ChatResult<bool> {
    let matched = db
        .conversations
        .update(
            &Filter::eq("id", conversation_id),
            bson::doc! { "title": title },
        )
        .await?;
    Ok(matched > 0)
}

/// Conversation ids the user currently belongs to, via projection.
pub async fn conversation_ids_of(db: &ChatDb, user_id: &str) -> ChatResult<Vec<String>> {
    let found = db
        .members
        .find_many(
            Query::new()
                .filter(Filter::eq("userId", user_id))
                .select(["conversationId"]),
        )
        .await?;
    Ok(found
        .iter()
        .filter_map(|d| d.get_str("conversationId").ok().map(str::to_owned))
        .collect())
}

/// The user's membership row in the conversation, provided they have not
/// left.
pub async fn active_member(
    db: &ChatDb,
    conversation_id: &str,
    user_id: &str,
) -> ChatResult<Option<ConversationMember>> {
    let filter = Filter::and([
        Filter::eq("conversationId", conversation_id),
        Filter::eq("userId", user_id),
        Filter::eq("leaveTime", Value::Null),
    ]);
    let found = db.members.find_first(&filter, None).await?;
    found.map(|d| decode("ConversationMember", d)).transpose()
}

/// Memberships that ended, newest joiners included.
pub async fn former_members(
    db: &ChatDb,
    conversation_id: &str,
) -> ChatResult<Vec<ConversationMember>> {
    let filter = Filter::and([
        Filter::eq("conversationId", conversation_id),
        Filter::ne("leaveTime", Value::Null),
    ]);
    let found = db.members.find_many(Query::new().filter(filter)).await?;
    found
        .into_iter()
        .map(|d| decode("ConversationMember", d))
        .collect()
}

pub async fn add_member(
    db: &ChatDb,
    conversation_id: &str,
    user_id: &str,
) -> ChatResult<ConversationMember> {
    let new = NewConversationMember {
        conversation_id: conversation_id.to_owned(),
        user_id: user_id.to_owned(),
        join_time: DateTime::now(),
    };
    let created = db.members.create(encode("ConversationMember", &new)?).await?;
    decode("ConversationMember", created)
}

/// Mark the user's membership as ended; returns false when there is no
/// active membership to end.
pub async fn leave_conversation(
    db: &ChatDb,
    conversation_id: &str,
    user_id: &str,
) -> ChatResult<bool> {
    let Some(member) = active_member(db, conversation_id, user_id).await? else {
        return Ok(false);
    };
    let matched = db
        .members
        .update(
            &Filter::eq("id", member.id.as_str()),
            bson::doc! { "leaveTime": DateTime::now() },
        )
        .await?;
    Ok(matched > 0)
}

/* ---------- messages ---------- */

pub async fn send_message(db: &ChatDb, new: NewMessage) -> ChatResult<Message> {
    let created = db.messages.create(encode("Message", &new)?).await?;
    decode("Message", created)
}

pub async fn message_by_id(db: &ChatDb, id: &str) -> ChatResult<Option<Message>> {
    let found = db.messages.find_unique(&Filter::eq("id", id), None).await?;
    found.map(|d| decode("Message", d)).transpose()
}

/// One page of a conversation's history. Without a cursor this is the
/// newest page; `After`/`Before` continue from a previous page's cursor.
pub async fn message_page(
    db: &ChatDb,
    conversation_id: &str,
    limit: u64,
    cursor: Option<PageCursor>,
) -> ChatResult<Page<Message>> {
    let request = PageRequest {
        filter: Some(Filter::eq("conversationId", conversation_id)),
        select: None,
        order_by: None,
        limit,
        cursor,
    };
    let page = db.messages.find_page(request).await?;

    let Page {
        records,
        has_next,
        next_cursor,
    } = page;
    let records = records
        .into_iter()
        .map(|d| decode("Message", d))
        .collect::<ChatResult<Vec<Message>>>()?;
    Ok(Page {
        records,
        has_next,
        next_cursor,
    })
}
