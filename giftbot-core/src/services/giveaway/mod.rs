// File: giftbot-core/src/services/giveaway/mod.rs

pub mod duration;
pub mod manager;
pub mod participants;
pub mod render;
pub mod selector;

pub use duration::{format_duration, parse_duration};
pub use manager::GiveawayManager;
pub use participants::filter_participants;
pub use render::GiveawayRenderer;
pub use selector::select_winners;
