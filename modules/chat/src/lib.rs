//! Chat domain on top of the Palaver data layer.
//!
//! Defines the typed chat entities, wires one model façade per entity
//! against an injected document store, and provides the query helpers the
//! route layer consumes. There is no process-wide store handle; every
//! [`ChatDb`] owns its own wiring.

pub mod db;
pub mod entities;
pub mod error;
pub mod queries;

pub use db::ChatDb;
pub use entities::{
    Conversation, ConversationMember, Friend, Message, NewConversation, NewConversationMember,
    NewFriend, NewMessage, NewUser, User,
};
pub use error::{ChatError, ChatResult};
