use async_trait::async_trait;

use crate::error::Error;
use crate::models::{ChannelRef, MessageContent, MessageRef, UserRef};

/// Everything the giveaway core needs from a chat platform.
///
/// Implementations report a message that no longer exists as
/// `Error::NotFound`; callers treat that as a soft failure.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn post_message(&self, channel: ChannelRef, content: &MessageContent) -> Result<MessageRef, Error>;

    async fn edit_message(&self, message: MessageRef, content: &MessageContent) -> Result<(), Error>;

    async fn add_reaction(&self, message: MessageRef, emoji: &str) -> Result<(), Error>;

    /// Every user currently reacting to `message` with `emoji`, bots included.
    async fn fetch_reacting_identities(&self, message: MessageRef, emoji: &str) -> Result<Vec<UserRef>, Error>;

    fn is_bot_identity(&self, user: &UserRef) -> bool;

    /// Number of communities the bot is part of, if the platform knows it.
    fn guild_count(&self) -> Option<usize> {
        None
    }

    /// Total members across those communities, if the platform knows it.
    fn member_count(&self) -> Option<u64> {
        None
    }
}
