use twilight_model::channel::message::Embed;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder};

use giftbot_common::models::MessageContent;

use crate::Error;

/// Converts platform-neutral content into a validated Discord embed.
pub fn to_embed(content: &MessageContent) -> Result<Embed, Error> {
    let mut builder = EmbedBuilder::new()
        .title(content.title.clone())
        .color(content.color);

    if let Some(description) = &content.description {
        builder = builder.description(description.clone());
    }
    for field in &content.fields {
        let mut field_builder = EmbedFieldBuilder::new(field.name.clone(), field.value.clone());
        if field.inline {
            field_builder = field_builder.inline();
        }
        builder = builder.field(field_builder);
    }
    if let Some(footer) = &content.footer {
        builder = builder.footer(EmbedFooterBuilder::new(footer.clone()));
    }
    if let Some(at) = content.timestamp {
        let timestamp = Timestamp::from_secs(at.timestamp())
            .map_err(|e| Error::Platform(format!("Invalid embed timestamp: {e}")))?;
        builder = builder.timestamp(timestamp);
    }

    builder
        .validate()
        .map(|b| b.build())
        .map_err(|e| Error::Platform(format!("Invalid embed: {e}")))
}
