// File: giftbot-core/src/services/discord/mod.rs

pub mod slashcommands;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, error, info, warn};
use twilight_cache_inmemory::InMemoryCache;
use twilight_http::Client as HttpClient;
use twilight_model::application::interaction::{Interaction, InteractionData};
use twilight_model::channel::Message;
use twilight_model::channel::message::{Embed, MessageFlags};
use twilight_model::guild::Permissions;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::InteractionResponseDataBuilder;

use giftbot_common::models::CommandResponse;

use crate::Error;
use crate::platforms::discord::embeds::to_embed;
use crate::services::command_service::{CommandContext, CommandService, GiveawayCommand};
use crate::services::discord::slashcommands::{command_from_options, register_global_slash_commands};
use crate::services::prefix_commands::parse_prefix_command;

/// Bridges Discord interactions and prefixed chat messages onto the shared
/// `CommandService`.
pub struct DiscordCommandHandler {
    http: Arc<HttpClient>,
    cache: Arc<InMemoryCache>,
    commands: Arc<CommandService>,
    application_id: OnceCell<Id<ApplicationMarker>>,
}

impl DiscordCommandHandler {
    pub fn new(http: Arc<HttpClient>, cache: Arc<InMemoryCache>, commands: Arc<CommandService>) -> Self {
        Self {
            http,
            cache,
            commands,
            application_id: OnceCell::new(),
        }
    }

    /// Called on every READY; commands are registered on the first one only.
    pub async fn on_ready(&self, application_id: Id<ApplicationMarker>) -> Result<(), Error> {
        if self.application_id.set(application_id).is_err() {
            debug!("Application id already known; skipping slash command registration");
            return Ok(());
        }
        register_global_slash_commands(&self.http, application_id).await?;
        info!("Registered global slash commands for application {application_id}");
        Ok(())
    }

    pub async fn handle_interaction(&self, interaction: Interaction) {
        let Some(InteractionData::ApplicationCommand(data)) = &interaction.data else {
            return;
        };
        let Some(application_id) = self.application_id.get().copied() else {
            warn!("Interaction '{}' arrived before READY; ignoring", data.name);
            return;
        };

        let parsed = command_from_options(&data.name, &data.options);
        let ephemeral = parsed.as_ref().map(is_ephemeral).unwrap_or(true);

        // Giveaway commands make several REST calls; defer so Discord's
        // three second response window cannot expire.
        if let Err(e) = self.defer(application_id, &interaction, ephemeral).await {
            error!("Failed to defer interaction '{}' => {e:?}", data.name);
            return;
        }

        let response = match parsed {
            Ok(command) => {
                let ctx = CommandContext {
                    can_manage_messages: interaction_can_manage_messages(&interaction),
                    prefix: "/".to_string(),
                };
                self.commands.respond(command, &ctx).await
            }
            Err(e) => CommandResponse::text(e.user_message()),
        };

        if let Err(e) = self.complete(application_id, &interaction, &response).await {
            error!("Failed to answer interaction '{}' => {e:?}", data.name);
        }
    }

    pub async fn handle_message(&self, message: Message) {
        let prefix = self.commands.config().prefix.clone();
        let Some(parsed) = parse_prefix_command(&prefix, &message.content) else {
            return;
        };

        let response = match parsed {
            Ok(command) => {
                let ctx = CommandContext {
                    can_manage_messages: self.member_can_manage_messages(&message),
                    prefix,
                };
                self.commands.respond(command, &ctx).await
            }
            Err(e) => CommandResponse::text(e.user_message()),
        };

        if let Err(e) = self.reply(&message, &response).await {
            error!("Failed to reply in channel {} => {e:?}", message.channel_id);
        }
    }

    async fn defer(
        &self,
        application_id: Id<ApplicationMarker>,
        interaction: &Interaction,
        ephemeral: bool,
    ) -> Result<(), Error> {
        let data = ephemeral.then(|| {
            InteractionResponseDataBuilder::new()
                .flags(MessageFlags::EPHEMERAL)
                .build()
        });
        self.http
            .interaction(application_id)
            .create_response(
                interaction.id,
                &interaction.token,
                &InteractionResponse {
                    kind: InteractionResponseType::DeferredChannelMessageWithSource,
                    data,
                },
            )
            .await
            .map_err(|e| Error::Platform(format!("Error deferring interaction: {e}")))?;
        Ok(())
    }

    async fn complete(
        &self,
        application_id: Id<ApplicationMarker>,
        interaction: &Interaction,
        response: &CommandResponse,
    ) -> Result<(), Error> {
        let embeds = response_embeds(response)?;
        self.http
            .interaction(application_id)
            .update_response(&interaction.token)
            .content(response.text.as_deref())
            .embeds(Some(embeds.as_slice()))
            .await
            .map_err(|e| Error::Platform(format!("Error updating interaction response: {e}")))?;
        Ok(())
    }

    async fn reply(&self, message: &Message, response: &CommandResponse) -> Result<(), Error> {
        let embeds = response_embeds(response)?;
        let mut request = self.http.create_message(message.channel_id).reply(message.id);
        if let Some(text) = &response.text {
            request = request.content(text);
        }
        if !embeds.is_empty() {
            request = request.embeds(&embeds);
        }
        request
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord reply: {e}")))?;
        Ok(())
    }

    /// Text commands carry no resolved permissions, so compute them from the
    /// cached guild, roles and channel overwrites. Unknown means no.
    fn member_can_manage_messages(&self, message: &Message) -> bool {
        match self
            .cache
            .permissions()
            .in_channel(message.author.id, message.channel_id)
        {
            Ok(permissions) => permissions.contains(Permissions::MANAGE_MESSAGES),
            Err(e) => {
                debug!(
                    "Could not resolve permissions for {} in {} => {e}",
                    message.author.id, message.channel_id
                );
                false
            }
        }
    }
}

fn is_ephemeral(command: &GiveawayCommand) -> bool {
    !matches!(command, GiveawayCommand::Stats | GiveawayCommand::Help)
}

fn interaction_can_manage_messages(interaction: &Interaction) -> bool {
    interaction
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .map(|permissions| permissions.contains(Permissions::MANAGE_MESSAGES))
        .unwrap_or(false)
}

fn response_embeds(response: &CommandResponse) -> Result<Vec<Embed>, Error> {
    response.embed.as_ref().map(to_embed).transpose().map(|embed| embed.into_iter().collect())
}
