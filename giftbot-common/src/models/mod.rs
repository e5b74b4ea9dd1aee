// File: giftbot-common/src/models/mod.rs
pub mod giveaway;
pub mod message;

pub use giveaway::{
    ActiveGiveaway, ChannelRef, DrawOutcome, EndedGiveaway, GiveawayKey, GiveawayStats, MessageRef,
    UserRef, ENTRY_REACTION,
};
pub use message::{CommandResponse, MessageContent, MessageField};
