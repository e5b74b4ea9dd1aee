use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use giftbot_core::config::{BotConfig, DEFAULT_BOT_NAME, DEFAULT_PORT, DEFAULT_PREFIX};
use giftbot_core::health::{start_health_server, HealthState};
use giftbot_core::platforms::discord::DiscordPlatform;
use giftbot_core::services::discord::DiscordCommandHandler;
use giftbot_core::services::giveaway::{GiveawayManager, GiveawayRenderer};
use giftbot_core::services::CommandService;
use giftbot_core::tasks::{spawn_expiry_dispatch_task, TokioTimerScheduler};
use giftbot_core::Error;

#[derive(Parser, Debug, Clone)]
#[command(name = "giftbot")]
#[command(author, version, about = "giftbot - Discord giveaway bot")]
struct Args {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,

    /// Application (client) id, used for the invite link
    #[arg(long, env = "CLIENT_ID")]
    client_id: Option<String>,

    /// Prefix for text commands
    #[arg(long, env = "PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Port for the health-check HTTP server
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Support server link shown by the `support` command
    #[arg(long, env = "SUPPORT_URL")]
    support_url: Option<String>,

    /// Name shown in titles and footers
    #[arg(long, env = "BOT_NAME", default_value = DEFAULT_BOT_NAME)]
    bot_name: String,
}

impl From<Args> for BotConfig {
    fn from(args: Args) -> Self {
        BotConfig {
            discord_token: args.token,
            client_id: args.client_id,
            prefix: args.prefix,
            port: args.port,
            support_url: args.support_url,
            bot_name: args.bot_name,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("giftbot=info".parse().unwrap_or_default())
        .add_directive("giftbot_core=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config: BotConfig = args.into();
    config.validate()?;
    info!("giftbot starting. prefix='{}', port={}", config.prefix, config.port);

    if let Err(e) = run_bot(config).await {
        // Failing to reach Discord at startup is the one fatal condition.
        error!("Bot error: {:?}", e);
        return Err(Box::new(e) as Box<dyn std::error::Error>);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_bot(config: BotConfig) -> Result<(), Error> {
    let config = Arc::new(config);

    let discord = Arc::new(DiscordPlatform::new(config.discord_token.clone()));
    let (scheduler, expired_rx) = TokioTimerScheduler::new();
    let manager = Arc::new(GiveawayManager::new(
        discord.clone(),
        Arc::new(scheduler),
        GiveawayRenderer::new(config.bot_name.clone()),
    ));
    let _expiry_handle = spawn_expiry_dispatch_task(manager.clone(), expired_rx);

    let commands = Arc::new(CommandService::new(manager.clone(), config.clone()));
    let handler = Arc::new(DiscordCommandHandler::new(
        discord.http(),
        discord.cache(),
        commands,
    ));

    let shard_tasks = discord.connect(handler).await?;

    let health_shutdown = start_health_server(
        config.port,
        HealthState {
            bot_name: config.bot_name.clone(),
            manager: manager.clone(),
        },
    )
    .await?;

    info!("{} is ready!", config.bot_name);
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c => {e:?}");
    }

    info!("Shutting down...");
    manager.shutdown();
    let _ = health_shutdown.send(());
    discord.disconnect().await;
    for task in shard_tasks {
        let _ = task.await;
    }
    Ok(())
}
