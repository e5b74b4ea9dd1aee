use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::scheduler_traits::TimerHandle;

/// Emoji participants react with to enter a giveaway.
pub const ENTRY_REACTION: &str = "🎉";

/// A chat channel, referenced by its platform id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef(pub u64);

/// A chat user. Bot accounts are identities too; see `ChatPlatform::is_bot_identity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserRef(pub u64);

/// A posted message. Platforms need the channel as well as the message id
/// to address it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: ChannelRef,
    pub message_id: u64,
}

impl MessageRef {
    pub fn new(channel: ChannelRef, message_id: u64) -> Self {
        Self { channel, message_id }
    }
}

/// Identifies a giveaway for its whole lifetime: the id of the entry message
/// participants react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GiveawayKey(pub u64);

impl From<MessageRef> for GiveawayKey {
    fn from(message: MessageRef) -> Self {
        GiveawayKey(message.message_id)
    }
}

impl fmt::Display for GiveawayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A giveaway whose entry window is still open.
#[derive(Debug)]
pub struct ActiveGiveaway {
    pub key: GiveawayKey,
    pub channel: ChannelRef,
    pub prize: String,
    pub winner_count: u32,
    pub timer: TimerHandle,
}

/// A giveaway that has been drawn. `winners` is the currently displayed
/// winner set; a reroll replaces it and nothing else.
#[derive(Debug, Clone)]
pub struct EndedGiveaway {
    pub key: GiveawayKey,
    pub channel: ChannelRef,
    pub prize: String,
    pub winner_count: u32,
    pub ended_at: DateTime<Utc>,
    pub announcement: MessageRef,
    pub winners: Vec<UserRef>,
}

/// Result of ending or rerolling a giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub key: GiveawayKey,
    pub prize: String,
    pub winners: Vec<UserRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiveawayStats {
    pub active_count: usize,
    pub ended_count: usize,
}
