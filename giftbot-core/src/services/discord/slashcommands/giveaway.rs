// File: giftbot-core/src/services/discord/slashcommands/giveaway.rs

use twilight_model::application::command::CommandType;
use twilight_model::channel::ChannelType;
use twilight_model::guild::Permissions;
use twilight_util::builder::command::{ChannelBuilder, CommandBuilder, IntegerBuilder, StringBuilder};

/// `/start channel duration prize winners`
pub fn create_start_command() -> CommandBuilder {
    CommandBuilder::new("start", "Start a new giveaway", CommandType::ChatInput)
        .default_member_permissions(Permissions::MANAGE_MESSAGES)
        .option(
            ChannelBuilder::new("channel", "Channel to start giveaway in")
                .channel_types([ChannelType::GuildText, ChannelType::GuildAnnouncement])
                .required(true),
        )
        .option(StringBuilder::new("duration", "Duration (e.g., 1d, 2h)").required(true))
        .option(StringBuilder::new("prize", "Prize to win").required(true))
        .option(
            IntegerBuilder::new("winners", "Number of winners")
                .min_value(1)
                .required(true),
        )
}

/// `/end message_id`
pub fn create_end_command() -> CommandBuilder {
    CommandBuilder::new("end", "End a giveaway early", CommandType::ChatInput)
        .default_member_permissions(Permissions::MANAGE_MESSAGES)
        .option(StringBuilder::new("message_id", "Giveaway message ID").required(true))
}

/// `/reroll message_id`
pub fn create_reroll_command() -> CommandBuilder {
    CommandBuilder::new("reroll", "Reroll an ended giveaway", CommandType::ChatInput)
        .default_member_permissions(Permissions::MANAGE_MESSAGES)
        .option(StringBuilder::new("message_id", "Ended giveaway message ID").required(true))
}
