use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform-neutral rich message. The Discord adapter turns this into an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<MessageField>,
    pub color: u32,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl MessageContent {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
            color,
            footer: None,
            timestamp: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(MessageField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }
}

/// What a command handler sends back to whoever invoked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub text: Option<String>,
    pub embed: Option<MessageContent>,
    /// Only visible to the invoker, where the platform supports that.
    pub ephemeral: bool,
}

impl CommandResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            embed: None,
            ephemeral: true,
        }
    }

    pub fn embed(content: MessageContent) -> Self {
        Self {
            text: None,
            embed: Some(content),
            ephemeral: false,
        }
    }
}
