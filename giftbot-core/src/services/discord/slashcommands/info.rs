// File: giftbot-core/src/services/discord/slashcommands/info.rs

use twilight_model::application::command::CommandType;
use twilight_util::builder::command::CommandBuilder;

pub fn create_stats_command() -> CommandBuilder {
    CommandBuilder::new("stats", "Show bot statistics", CommandType::ChatInput)
}

pub fn create_invite_command() -> CommandBuilder {
    CommandBuilder::new("invite", "Get bot invite link", CommandType::ChatInput)
}

pub fn create_support_command() -> CommandBuilder {
    CommandBuilder::new("support", "Get support server link", CommandType::ChatInput)
}

pub fn create_help_command() -> CommandBuilder {
    CommandBuilder::new("help", "Show help information", CommandType::ChatInput)
}
