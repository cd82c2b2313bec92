pub mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{HttpApi, LoginResponse};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Message, Profile};
use crate::session::UserType;

/// The remote endpoints the messaging widget depends on.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Every message the user sent or received, in server order.
    async fn fetch_messages(&self, user_id: u64) -> Result<Vec<Message>, ApiError>;

    async fn send_message(
        &self,
        sender_id: u64,
        receiver_id: u64,
        body: &str,
    ) -> Result<(), ApiError>;

    /// Mark everything `other_id` sent to `user_id` as read.
    async fn mark_read(&self, user_id: u64, other_id: u64) -> Result<(), ApiError>;

    async fn fetch_profile(&self, role: UserType, id: u64) -> Result<Profile, ApiError>;
}
