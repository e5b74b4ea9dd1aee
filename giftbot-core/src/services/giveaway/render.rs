use chrono::Utc;

use giftbot_common::models::{GiveawayStats, MessageContent, UserRef};

pub const COLOR_ENTRY: u32 = 0xFFD700;
pub const COLOR_ENDED: u32 = 0xFF0000;
pub const COLOR_REROLLED: u32 = 0x00FF00;
pub const COLOR_INFO: u32 = 0x7289DA;

pub const NO_PARTICIPANTS: &str = "No valid participants";

/// Builds the messages the bot posts. Holds only the display name used in
/// titles and footers.
#[derive(Debug, Clone)]
pub struct GiveawayRenderer {
    bot_name: String,
}

impl GiveawayRenderer {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self { bot_name: bot_name.into() }
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    fn footer(&self) -> String {
        format!("{} Giveaway System", self.bot_name)
    }

    pub fn entry(&self, prize: &str, duration: &str, winner_count: u32) -> MessageContent {
        MessageContent::new("🎉 GIVEAWAY 🎉", COLOR_ENTRY)
            .description(format!(
                "**Prize:** {prize}\n**Duration:** {duration}\n**Winners:** {winner_count}\n\nReact with 🎉 to enter!"
            ))
            .footer(self.footer())
            .timestamp(Utc::now())
    }

    pub fn ended(&self, prize: &str, winners: &[UserRef]) -> MessageContent {
        MessageContent::new("🎉 GIVEAWAY ENDED 🎉", COLOR_ENDED)
            .description(format!("**Prize:** {prize}\n**Winners:** {}", winners_text(winners)))
            .footer(self.footer())
            .timestamp(Utc::now())
    }

    pub fn rerolled(&self, prize: &str, winners: &[UserRef]) -> MessageContent {
        MessageContent::new("🎉 GIVEAWAY REROLLED 🎉", COLOR_REROLLED)
            .description(format!("**Prize:** {prize}\n**New Winners:** {}", winners_text(winners)))
            .footer(self.footer())
            .timestamp(Utc::now())
    }

    /// `guilds` and `members` are shown only when the platform reports them.
    pub fn stats(&self, stats: &GiveawayStats, guilds: Option<usize>, members: Option<u64>) -> MessageContent {
        let mut content = MessageContent::new(format!("{} Statistics", self.bot_name), COLOR_INFO);
        if let Some(guilds) = guilds {
            content = content.field("Servers", guilds.to_string(), true);
        }
        if let Some(members) = members {
            content = content.field("Users", members.to_string(), true);
        }
        content
            .field("Active Giveaways", stats.active_count.to_string(), true)
            .field("Ended Giveaways", stats.ended_count.to_string(), true)
            .footer(self.footer())
            .timestamp(Utc::now())
    }

    /// `prefix` is `/` for slash commands or the text prefix, e.g. `!`.
    pub fn help(&self, prefix: &str) -> MessageContent {
        let start_usage = if prefix == "/" {
            "/start channel duration prize winners".to_string()
        } else {
            format!("{prefix}start #channel duration prize winners")
        };
        MessageContent::new(format!("{} Commands", self.bot_name), COLOR_INFO)
            .description(format!(
                "Here are all the available commands for {}:",
                self.bot_name
            ))
            .field(start_usage, "Start a new giveaway", false)
            .field(format!("{prefix}end message_id"), "End a giveaway early", false)
            .field(format!("{prefix}reroll message_id"), "Reroll an ended giveaway", false)
            .field(format!("{prefix}stats"), "Show bot statistics", false)
            .field(format!("{prefix}invite"), "Get bot invite link", false)
            .field(format!("{prefix}support"), "Get support server link", false)
            .field(format!("{prefix}help"), "Show this help message", false)
            .footer(self.footer())
            .timestamp(Utc::now())
    }
}

pub fn mention(user: &UserRef) -> String {
    format!("<@{}>", user.0)
}

pub fn winners_text(winners: &[UserRef]) -> String {
    if winners.is_empty() {
        return NO_PARTICIPANTS.to_string();
    }
    winners.iter().map(mention).collect::<Vec<_>>().join(", ")
}
