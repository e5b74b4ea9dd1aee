pub mod embeds;
pub mod runtime;

pub use runtime::DiscordPlatform;
