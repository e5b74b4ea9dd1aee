// giftbot-core/src/config.rs

use crate::Error;

/// Permission bits requested by the invite link.
pub const INVITE_PERMISSIONS: u64 = 277_025_770_560;

pub const DEFAULT_BOT_NAME: &str = "Giveaway Bot";
pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_PORT: u16 = 3000;

/// Runtime settings, assembled by the server binary from CLI flags and
/// environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub client_id: Option<String>,
    pub prefix: String,
    pub port: u16,
    pub support_url: Option<String>,
    pub bot_name: String,
}

impl BotConfig {
    pub fn new(discord_token: impl Into<String>) -> Self {
        Self {
            discord_token: discord_token.into(),
            client_id: None,
            prefix: DEFAULT_PREFIX.to_string(),
            port: DEFAULT_PORT,
            support_url: None,
            bot_name: DEFAULT_BOT_NAME.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.discord_token.trim().is_empty() {
            return Err(Error::Config("Discord token is empty".into()));
        }
        if self.prefix.trim().is_empty() || self.prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "Command prefix '{}' must be non-empty and contain no whitespace",
                self.prefix
            )));
        }
        if let Some(id) = &self.client_id {
            if id.parse::<u64>().is_err() {
                return Err(Error::Config(format!("Client ID '{id}' is not a numeric id")));
            }
        }
        Ok(())
    }

    pub fn invite_url(&self) -> Option<String> {
        let client_id = self.client_id.as_ref()?;
        Some(format!(
            "https://discord.com/oauth2/authorize?client_id={client_id}&permissions={INVITE_PERMISSIONS}&scope={}",
            urlencoding::encode("bot applications.commands")
        ))
    }
}
