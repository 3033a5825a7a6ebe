//! One-to-one messaging.

use std::sync::Arc;

use devlink_core::error::AppError;
use devlink_core::result::AppResult;
use devlink_core::types::UserId;
use devlink_database::repositories::direct_message::DirectMessageRepository;
use devlink_entity::chat::{DirectChatSummary, DirectMessage};

use crate::context::RequestContext;

/// Manages direct conversations between users.
#[derive(Debug, Clone)]
pub struct DirectMessageService {
    /// Direct message repository.
    messages: Arc<DirectMessageRepository>,
}

impl DirectMessageService {
    /// Creates a new direct message service.
    pub fn new(messages: Arc<DirectMessageRepository>) -> Self {
        Self { messages }
    }

    /// Persists a message from the caller to the recipient.
    pub async fn send(
        &self,
        ctx: &RequestContext,
        recipient_id: UserId,
        body: &str,
    ) -> AppResult<DirectMessage> {
        if body.trim().is_empty() {
            return Err(AppError::validation("Message text required"));
        }
        if recipient_id == ctx.user_id {
            return Err(AppError::validation("Cannot message yourself"));
        }
        self.messages.create(ctx.user_id, recipient_id, body).await
    }

    /// All messages between the caller and another user, oldest first.
    pub async fn conversation_with(
        &self,
        ctx: &RequestContext,
        other_id: UserId,
    ) -> AppResult<Vec<DirectMessage>> {
        self.messages.find_conversation(ctx.user_id, other_id).await
    }

    /// The caller's chat list: one row per partner, most recent first.
    pub async fn list_chats(&self, ctx: &RequestContext) -> AppResult<Vec<DirectChatSummary>> {
        self.messages.list_chats(ctx.user_id).await
    }
}
