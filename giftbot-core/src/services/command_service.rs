// giftbot-core/src/services/command_service.rs

use std::sync::Arc;

use tracing::{debug, info, warn};

use giftbot_common::models::{ChannelRef, CommandResponse, GiveawayKey};

use crate::Error;
use crate::config::BotConfig;
use crate::services::giveaway::GiveawayManager;

/// `start`: open a giveaway in `channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartGiveaway {
    pub channel: ChannelRef,
    pub duration: String,
    pub prize: String,
    pub winners: u32,
}

/// `end`: close an active giveaway early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndGiveaway {
    pub key: GiveawayKey,
}

/// `reroll`: draw new winners for an ended giveaway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerollGiveaway {
    pub key: GiveawayKey,
}

/// Every command either front end can produce. Arguments are already
/// validated into typed fields by the time one of these exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GiveawayCommand {
    Start(StartGiveaway),
    End(EndGiveaway),
    Reroll(RerollGiveaway),
    Stats,
    Help,
    Invite,
    Support,
}

impl GiveawayCommand {
    pub fn name(&self) -> &'static str {
        match self {
            GiveawayCommand::Start(_) => "start",
            GiveawayCommand::End(_) => "end",
            GiveawayCommand::Reroll(_) => "reroll",
            GiveawayCommand::Stats => "stats",
            GiveawayCommand::Help => "help",
            GiveawayCommand::Invite => "invite",
            GiveawayCommand::Support => "support",
        }
    }
}

/// Who issued a command, as far as the core cares.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Whether the invoker holds the platform's "manage messages" permission.
    pub can_manage_messages: bool,
    /// `/` for slash commands, otherwise the configured text prefix.
    pub prefix: String,
}

/// Maps commands onto the giveaway manager and renders the reply.
pub struct CommandService {
    manager: Arc<GiveawayManager>,
    config: Arc<BotConfig>,
}

impl CommandService {
    pub fn new(manager: Arc<GiveawayManager>, config: Arc<BotConfig>) -> Self {
        Self { manager, config }
    }

    pub fn config(&self) -> &Arc<BotConfig> {
        &self.config
    }

    /// Runs the command and returns the reply, or a typed error.
    pub async fn execute(
        &self,
        command: GiveawayCommand,
        ctx: &CommandContext,
    ) -> Result<CommandResponse, Error> {
        debug!("Executing '{}' (manage_messages={})", command.name(), ctx.can_manage_messages);
        let bot_name = self.manager.renderer().bot_name().to_string();

        match command {
            GiveawayCommand::Start(start) => {
                require_manage_messages(ctx, "start giveaways")?;
                self.manager
                    .create(start.channel, &start.duration, &start.prize, start.winners)
                    .await?;
                Ok(CommandResponse::text(format!(
                    "Giveaway started in <#{}>! {bot_name} will handle the rest!",
                    start.channel
                )))
            }
            GiveawayCommand::End(end) => {
                require_manage_messages(ctx, "end giveaways")?;
                self.manager.end(end.key).await?;
                Ok(CommandResponse::text(format!(
                    "{bot_name} ended the giveaway successfully!"
                )))
            }
            GiveawayCommand::Reroll(reroll) => {
                require_manage_messages(ctx, "reroll giveaways")?;
                self.manager.reroll(reroll.key).await?;
                Ok(CommandResponse::text(format!(
                    "{bot_name} rerolled the giveaway successfully!"
                )))
            }
            GiveawayCommand::Stats => {
                let stats = self.manager.stats();
                let chat = self.manager.chat();
                Ok(CommandResponse::embed(
                    self.manager
                        .renderer()
                        .stats(&stats, chat.guild_count(), chat.member_count()),
                ))
            }
            GiveawayCommand::Help => Ok(CommandResponse::embed(
                self.manager.renderer().help(&ctx.prefix),
            )),
            GiveawayCommand::Invite => Ok(CommandResponse::text(match self.config.invite_url() {
                Some(url) => format!("Invite {bot_name} to your server: {url}"),
                None => format!("No invite link is configured for {bot_name}."),
            })),
            GiveawayCommand::Support => {
                Ok(CommandResponse::text(match &self.config.support_url {
                    Some(url) => format!(
                        "{bot_name} support server: {url}\n\nGet help with giveaways and more!"
                    ),
                    None => format!("No support server is configured for {bot_name}."),
                }))
            }
        }
    }

    /// Like `execute`, but turns errors into the short message shown to the
    /// invoker. Front ends send whatever this returns.
    pub async fn respond(&self, command: GiveawayCommand, ctx: &CommandContext) -> CommandResponse {
        let name = command.name();
        match self.execute(command, ctx).await {
            Ok(response) => {
                info!("Command '{name}' completed");
                response
            }
            Err(e) => {
                match &e {
                    Error::Platform(_) | Error::Config(_) | Error::Io(_) => {
                        warn!("Command '{name}' failed => {e:?}");
                    }
                    _ => debug!("Command '{name}' rejected => {e}"),
                }
                CommandResponse::text(e.user_message())
            }
        }
    }
}

fn require_manage_messages(ctx: &CommandContext, action: &str) -> Result<(), Error> {
    if ctx.can_manage_messages {
        Ok(())
    } else {
        Err(Error::PermissionDenied(format!(
            "You need the Manage Messages permission to {action}."
        )))
    }
}

/// Parses a user-supplied message id into a giveaway key.
pub fn parse_giveaway_key(text: &str) -> Result<GiveawayKey, Error> {
    text.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(GiveawayKey)
        .ok_or_else(|| Error::InvalidArgument("Please provide a valid giveaway message ID.".into()))
}

/// Validates a raw winner count from either front end.
pub fn parse_winner_count(value: i64) -> Result<u32, Error> {
    u32::try_from(value)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| Error::InvalidArgument("Please specify a valid number of winners.".into()))
}
