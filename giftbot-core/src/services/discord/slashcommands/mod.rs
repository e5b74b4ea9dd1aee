// File: giftbot-core/src/services/discord/slashcommands/mod.rs

pub mod giveaway;
pub mod info;

use std::sync::Arc;

use twilight_http::Client as HttpClient;
use twilight_model::application::interaction::application_command::{
    CommandDataOption, CommandOptionValue,
};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;

use giftbot_common::models::ChannelRef;

use crate::Error;
use crate::services::command_service::{
    parse_giveaway_key, parse_winner_count, EndGiveaway, GiveawayCommand, RerollGiveaway,
    StartGiveaway,
};
use crate::services::discord::slashcommands::giveaway::{
    create_end_command, create_reroll_command, create_start_command,
};
use crate::services::discord::slashcommands::info::{
    create_help_command, create_invite_command, create_stats_command, create_support_command,
};

pub async fn register_global_slash_commands(
    http: &Arc<HttpClient>,
    application_id: Id<ApplicationMarker>,
) -> Result<(), Error> {
    let commands = [
        create_start_command().build(),
        create_end_command().build(),
        create_reroll_command().build(),
        create_stats_command().build(),
        create_invite_command().build(),
        create_support_command().build(),
        create_help_command().build(),
    ];

    http.interaction(application_id)
        .set_global_commands(&commands)
        .await
        .map_err(|e| Error::Platform(format!("Failed to register global slash commands: {e}")))?;

    Ok(())
}

/// Turns a slash command invocation into a `GiveawayCommand`, rejecting
/// missing or mistyped options.
pub fn command_from_options(name: &str, options: &[CommandDataOption]) -> Result<GiveawayCommand, Error> {
    match name {
        "start" => Ok(GiveawayCommand::Start(StartGiveaway {
            channel: channel_option(options, "channel")?,
            duration: string_option(options, "duration")?,
            prize: string_option(options, "prize")?,
            winners: parse_winner_count(integer_option(options, "winners")?)?,
        })),
        "end" => Ok(GiveawayCommand::End(EndGiveaway {
            key: parse_giveaway_key(&string_option(options, "message_id")?)?,
        })),
        "reroll" => Ok(GiveawayCommand::Reroll(RerollGiveaway {
            key: parse_giveaway_key(&string_option(options, "message_id")?)?,
        })),
        "stats" => Ok(GiveawayCommand::Stats),
        "help" => Ok(GiveawayCommand::Help),
        "invite" => Ok(GiveawayCommand::Invite),
        "support" => Ok(GiveawayCommand::Support),
        other => Err(Error::InvalidArgument(format!("Unrecognized command: {other}"))),
    }
}

fn find_option<'a>(options: &'a [CommandDataOption], name: &str) -> Result<&'a CommandOptionValue, Error> {
    options
        .iter()
        .find(|option| option.name == name)
        .map(|option| &option.value)
        .ok_or_else(|| Error::InvalidArgument(format!("Missing required option `{name}`.")))
}

fn string_option(options: &[CommandDataOption], name: &str) -> Result<String, Error> {
    match find_option(options, name)? {
        CommandOptionValue::String(value) => Ok(value.clone()),
        _ => Err(Error::InvalidArgument(format!("Option `{name}` must be text."))),
    }
}

fn integer_option(options: &[CommandDataOption], name: &str) -> Result<i64, Error> {
    match find_option(options, name)? {
        CommandOptionValue::Integer(value) => Ok(*value),
        _ => Err(Error::InvalidArgument(format!("Option `{name}` must be a whole number."))),
    }
}

fn channel_option(options: &[CommandDataOption], name: &str) -> Result<ChannelRef, Error> {
    match find_option(options, name)? {
        CommandOptionValue::Channel(id) => Ok(ChannelRef(id.get())),
        _ => Err(Error::InvalidArgument("Please mention a valid channel.".into())),
    }
}

#[cfg(test)]
mod tests {
    use giftbot_common::models::GiveawayKey;

    use super::*;

    fn option(name: &str, value: CommandOptionValue) -> CommandDataOption {
        CommandDataOption {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn start_options_map_to_struct() {
        let options = vec![
            option("channel", CommandOptionValue::Channel(Id::new(55))),
            option("duration", CommandOptionValue::String("2h".into())),
            option("prize", CommandOptionValue::String("Steam key".into())),
            option("winners", CommandOptionValue::Integer(2)),
        ];
        let command = command_from_options("start", &options).unwrap();
        assert_eq!(
            command,
            GiveawayCommand::Start(StartGiveaway {
                channel: ChannelRef(55),
                duration: "2h".into(),
                prize: "Steam key".into(),
                winners: 2,
            })
        );
    }

    #[test]
    fn missing_or_bad_options_are_rejected() {
        let options = vec![option("duration", CommandOptionValue::String("2h".into()))];
        assert!(matches!(
            command_from_options("start", &options),
            Err(Error::InvalidArgument(_))
        ));

        let options = vec![
            option("channel", CommandOptionValue::Channel(Id::new(55))),
            option("duration", CommandOptionValue::String("2h".into())),
            option("prize", CommandOptionValue::String("Steam key".into())),
            option("winners", CommandOptionValue::Integer(0)),
        ];
        assert!(matches!(
            command_from_options("start", &options),
            Err(Error::InvalidArgument(_))
        ));

        let options = vec![option("message_id", CommandOptionValue::Integer(5))];
        assert!(command_from_options("end", &options).is_err());
    }

    #[test]
    fn end_and_reroll_parse_message_id() {
        let options = vec![option("message_id", CommandOptionValue::String(" 777 ".into()))];
        assert_eq!(
            command_from_options("end", &options).unwrap(),
            GiveawayCommand::End(EndGiveaway { key: GiveawayKey(777) })
        );
        assert_eq!(
            command_from_options("reroll", &options).unwrap(),
            GiveawayCommand::Reroll(RerollGiveaway { key: GiveawayKey(777) })
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(command_from_options("ping", &[]).is_err());
    }
}
