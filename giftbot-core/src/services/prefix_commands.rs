// giftbot-core/src/services/prefix_commands.rs

use once_cell::sync::Lazy;
use regex::Regex;

use giftbot_common::models::{ChannelRef, GiveawayKey};

use crate::Error;
use crate::services::command_service::{
    parse_giveaway_key, parse_winner_count, EndGiveaway, GiveawayCommand, RerollGiveaway,
    StartGiveaway,
};

static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<#(\d+)>$").expect("channel mention regex is valid"));

/// Parses a chat line such as `!start #giveaways 1d Nitro 2`.
///
/// Returns `None` when the line is not addressed to the bot (wrong prefix or
/// unknown command), so ordinary chatter is ignored silently. Known commands
/// with bad arguments come back as `Some(Err(..))`.
pub fn parse_prefix_command(prefix: &str, content: &str) -> Option<Result<GiveawayCommand, Error>> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let mut args: Vec<&str> = rest.split_whitespace().collect();
    if args.is_empty() {
        return None;
    }
    let command = args.remove(0).to_lowercase();

    let parsed = match command.as_str() {
        "start" => parse_start(&args),
        "end" => first_arg_key(&args, "Please provide a giveaway message ID.")
            .map(|key| GiveawayCommand::End(EndGiveaway { key })),
        "reroll" => first_arg_key(&args, "Please provide an ended giveaway message ID.")
            .map(|key| GiveawayCommand::Reroll(RerollGiveaway { key })),
        "stats" => Ok(GiveawayCommand::Stats),
        "help" => Ok(GiveawayCommand::Help),
        "invite" => Ok(GiveawayCommand::Invite),
        "support" => Ok(GiveawayCommand::Support),
        _ => return None,
    };
    Some(parsed)
}

/// `start #channel <duration> <prize...> <winners>`
fn parse_start(args: &[&str]) -> Result<GiveawayCommand, Error> {
    let channel = args
        .first()
        .and_then(|raw| CHANNEL_MENTION.captures(raw))
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(ChannelRef)
        .ok_or_else(|| Error::InvalidArgument("Please mention a valid channel.".into()))?;

    let duration = args
        .get(1)
        .ok_or_else(|| Error::InvalidArgument("Please specify a duration (e.g., 1d, 2h).".into()))?;

    let prize = if args.len() > 3 {
        args[2..args.len() - 1].join(" ")
    } else {
        String::new()
    };
    if prize.is_empty() {
        return Err(Error::InvalidArgument("Please specify a prize.".into()));
    }

    let winners = args
        .last()
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or_else(|| Error::InvalidArgument("Please specify a valid number of winners.".into()))
        .and_then(parse_winner_count)?;

    Ok(GiveawayCommand::Start(StartGiveaway {
        channel,
        duration: duration.to_string(),
        prize,
        winners,
    }))
}

fn first_arg_key(args: &[&str], missing: &str) -> Result<GiveawayKey, Error> {
    let raw = args
        .first()
        .ok_or_else(|| Error::InvalidArgument(missing.to_string()))?;
    parse_giveaway_key(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Option<Result<GiveawayCommand, Error>> {
        parse_prefix_command("!", content)
    }

    fn invalid_argument(content: &str) -> String {
        match parse(content) {
            Some(Err(Error::InvalidArgument(msg))) => msg,
            other => panic!("expected InvalidArgument for '{content}', got {other:?}"),
        }
    }

    #[test]
    fn start_with_multi_word_prize() {
        let command = parse("!start <#42> 1d Nitro Classic 3").unwrap().unwrap();
        assert_eq!(
            command,
            GiveawayCommand::Start(StartGiveaway {
                channel: ChannelRef(42),
                duration: "1d".into(),
                prize: "Nitro Classic".into(),
                winners: 3,
            })
        );
    }

    #[test]
    fn command_name_is_case_insensitive() {
        assert_eq!(parse("!STATS").unwrap().unwrap(), GiveawayCommand::Stats);
        assert_eq!(parse("!Help").unwrap().unwrap(), GiveawayCommand::Help);
    }

    #[test]
    fn start_argument_errors() {
        assert_eq!(invalid_argument("!start general 1d Prize 1"), "Please mention a valid channel.");
        assert_eq!(
            invalid_argument("!start general 1d <#5> Prize 1"),
            "Please mention a valid channel."
        );
        assert_eq!(invalid_argument("!start <#1>"), "Please specify a duration (e.g., 1d, 2h).");
        assert_eq!(invalid_argument("!start <#1> 1d 2"), "Please specify a prize.");
        assert_eq!(
            invalid_argument("!start <#1> 1d Prize zero"),
            "Please specify a valid number of winners."
        );
        assert_eq!(
            invalid_argument("!start <#1> 1d Prize 0"),
            "Please specify a valid number of winners."
        );
    }

    #[test]
    fn end_and_reroll_take_a_message_id() {
        assert_eq!(
            parse("!end 123456").unwrap().unwrap(),
            GiveawayCommand::End(EndGiveaway { key: GiveawayKey(123456) })
        );
        assert_eq!(
            parse("!reroll 99").unwrap().unwrap(),
            GiveawayCommand::Reroll(RerollGiveaway { key: GiveawayKey(99) })
        );
        assert_eq!(invalid_argument("!end"), "Please provide a giveaway message ID.");
        assert_eq!(invalid_argument("!reroll"), "Please provide an ended giveaway message ID.");
        assert_eq!(invalid_argument("!end abc"), "Please provide a valid giveaway message ID.");
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        assert!(parse("hello there").is_none());
        assert!(parse("!").is_none());
        assert!(parse("!dance").is_none());
        assert!(parse_prefix_command("g!", "!stats").is_none());
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(
            parse_prefix_command("g!", "g!invite").unwrap().unwrap(),
            GiveawayCommand::Invite
        );
    }
}
