use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_cache_inmemory::{InMemoryCache, ResourceType};
use twilight_gateway::{
    self as gateway,
    CloseFrame,
    ConfigBuilder,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_http::error::ErrorType;
use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::gateway::payload::outgoing::update_presence::UpdatePresencePayload;
use twilight_model::gateway::presence::{Activity, ActivityType, MinimalActivity, Status};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker, UserMarker};

use giftbot_common::models::{ChannelRef, MessageContent, MessageRef, UserRef};
use giftbot_common::traits::platform_traits::ChatPlatform;

use crate::Error;
use crate::platforms::discord::embeds::to_embed;
use crate::services::discord::DiscordCommandHandler;

/// Discord caps a reaction user page at 100.
const REACTIONS_PAGE_SIZE: u16 = 100;

/// Reads gateway events for one shard, keeps the cache current and hands
/// interactions and chat messages to the command handler. Each command runs
/// on its own task so a slow one never stalls the shard.
async fn shard_runner(mut shard: Shard, cache: Arc<InMemoryCache>, handler: Arc<DiscordCommandHandler>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
                continue;
            }
        };
        cache.update(&event);

        match event {
            Event::Ready(ready) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={})",
                    ready.user.name, ready.user.id
                );
                let handler = handler.clone();
                let application_id = ready.application.id;
                tokio::spawn(async move {
                    if let Err(e) = handler.on_ready(application_id).await {
                        error!("Failed to register slash commands => {e:?}");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler.handle_interaction(interaction.0).await;
                });
            }
            Event::MessageCreate(msg) => {
                if msg.author.bot {
                    trace!("Ignoring bot message from {}", msg.author.name);
                    continue;
                }
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler.handle_message(msg.0).await;
                });
            }
            other => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// The Discord side of the bot: REST client, gateway shards and the
/// `ChatPlatform` implementation the giveaway core talks to.
pub struct DiscordPlatform {
    token: String,
    http: Arc<HttpClient>,
    cache: Arc<InMemoryCache>,
    /// Users seen with the bot flag while fetching reactions.
    known_bots: DashSet<u64>,
    shard_senders: Mutex<Vec<MessageSender>>,
}

impl DiscordPlatform {
    pub fn new(token: String) -> Self {
        let http = Arc::new(
            ClientBuilder::new()
                .token(token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );
        let cache = InMemoryCache::builder()
            .resource_types(
                ResourceType::GUILD
                    | ResourceType::CHANNEL
                    | ResourceType::ROLE
                    | ResourceType::MEMBER
                    | ResourceType::USER_CURRENT,
            )
            .build();

        Self {
            token,
            http,
            cache: Arc::new(cache),
            known_bots: DashSet::new(),
            shard_senders: Mutex::new(Vec::new()),
        }
    }

    pub fn http(&self) -> Arc<HttpClient> {
        self.http.clone()
    }

    pub fn cache(&self) -> Arc<InMemoryCache> {
        self.cache.clone()
    }

    /// Opens the recommended number of shards and spawns a runner for each.
    pub async fn connect(&self, handler: Arc<DiscordCommandHandler>) -> Result<Vec<JoinHandle<()>>, Error> {
        if self.token.is_empty() {
            return Err(Error::Config("Discord token is empty".into()));
        }

        let config = ConfigBuilder::new(
            self.token.clone(),
            Intents::GUILDS
                | Intents::GUILD_MESSAGES
                | Intents::MESSAGE_CONTENT
                | Intents::GUILD_MESSAGE_REACTIONS,
        )
        .presence(help_presence()?)
        .build();

        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        let mut senders = self.shard_senders.lock().await;
        let mut tasks = Vec::new();
        for shard in shards {
            senders.push(shard.sender());
            let cache = self.cache.clone();
            let handler = handler.clone();
            tasks.push(tokio::spawn(async move {
                shard_runner(shard, cache, handler).await;
            }));
        }
        info!("(DiscordPlatform) Connected with {} shard(s)", tasks.len());
        Ok(tasks)
    }

    /// Asks every shard to close; the runners finish once the gateway
    /// acknowledges.
    pub async fn disconnect(&self) {
        let mut senders = self.shard_senders.lock().await;
        for sender in senders.iter() {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        senders.clear();
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn post_message(&self, channel: ChannelRef, content: &MessageContent) -> Result<MessageRef, Error> {
        let channel_id = channel_id(channel)?;
        let embed = to_embed(content)?;
        let message = self
            .http
            .create_message(channel_id)
            .embeds(&[embed])
            .await
            .map_err(|e| map_http_error("Error sending Discord message", e))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error reading sent message: {e}")))?;

        debug!("Posted message {} in channel {}", message.id, channel_id);
        Ok(MessageRef::new(channel, message.id.get()))
    }

    async fn edit_message(&self, message: MessageRef, content: &MessageContent) -> Result<(), Error> {
        let (channel_id, message_id) = message_ids(message)?;
        let embeds = [to_embed(content)?];
        self.http
            .update_message(channel_id, message_id)
            .embeds(Some(embeds.as_slice()))
            .await
            .map_err(|e| map_http_error("Error editing Discord message", e))?;
        Ok(())
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &str) -> Result<(), Error> {
        let (channel_id, message_id) = message_ids(message)?;
        self.http
            .create_reaction(channel_id, message_id, &RequestReactionType::Unicode { name: emoji })
            .await
            .map_err(|e| map_http_error("Error adding reaction", e))?;
        Ok(())
    }

    async fn fetch_reacting_identities(&self, message: MessageRef, emoji: &str) -> Result<Vec<UserRef>, Error> {
        let (channel_id, message_id) = message_ids(message)?;
        let reaction = RequestReactionType::Unicode { name: emoji };
        let mut after: Option<Id<UserMarker>> = None;
        let mut users = Vec::new();

        loop {
            let mut request = self
                .http
                .reactions(channel_id, message_id, &reaction)
                .limit(REACTIONS_PAGE_SIZE);
            if let Some(after) = after {
                request = request.after(after);
            }
            let page = request
                .await
                .map_err(|e| map_http_error("Error fetching reactions", e))?
                .models()
                .await
                .map_err(|e| Error::Platform(format!("Error reading reactions: {e}")))?;

            let page_len = page.len();
            after = page.last().map(|user| user.id);
            for user in page {
                if user.bot {
                    self.known_bots.insert(user.id.get());
                }
                users.push(UserRef(user.id.get()));
            }
            if page_len < usize::from(REACTIONS_PAGE_SIZE) {
                break;
            }
        }

        debug!("Message {message_id}: fetched {} reacting user(s)", users.len());
        Ok(users)
    }

    fn is_bot_identity(&self, user: &UserRef) -> bool {
        self.known_bots.contains(&user.0)
            || self
                .cache
                .current_user()
                .map(|me| me.id.get() == user.0)
                .unwrap_or(false)
    }

    fn guild_count(&self) -> Option<usize> {
        Some(self.cache.stats().guilds())
    }

    fn member_count(&self) -> Option<u64> {
        Some(
            self.cache
                .iter()
                .guilds()
                .filter_map(|guild| guild.member_count())
                .sum(),
        )
    }
}

/// "Playing /help", shown on every shard.
fn help_presence() -> Result<UpdatePresencePayload, Error> {
    let activity: Activity = MinimalActivity {
        kind: ActivityType::Playing,
        name: "/help".into(),
        url: None,
    }
    .into();
    UpdatePresencePayload::new(vec![activity], false, None, Status::Online)
        .map_err(|e| Error::Platform(format!("Invalid gateway presence: {e}")))
}

fn channel_id(channel: ChannelRef) -> Result<Id<ChannelMarker>, Error> {
    Id::new_checked(channel.0)
        .ok_or_else(|| Error::InvalidArgument(format!("Invalid channel ID: {channel}")))
}

fn message_ids(message: MessageRef) -> Result<(Id<ChannelMarker>, Id<MessageMarker>), Error> {
    let message_id = Id::new_checked(message.message_id)
        .ok_or_else(|| Error::NotFound(format!("Invalid message ID: {}", message.message_id)))?;
    Ok((channel_id(message.channel)?, message_id))
}

/// Discord answers 404 for deleted messages and channels; everything else is
/// a platform failure.
fn map_http_error(context: &str, e: twilight_http::Error) -> Error {
    if let ErrorType::Response { status, .. } = e.kind() {
        if status.get() == 404 {
            return Error::NotFound(format!("{context}: not found"));
        }
    }
    Error::Platform(format!("{context}: {e}"))
}
