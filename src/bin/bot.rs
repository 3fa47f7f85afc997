use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use frontman::core::{chunk_for_message, Config};
use frontman::features::chat::{IncomingMessage, KnowledgeAugmenter, Responder, SessionStore};
use frontman::features::persona::PersonaProfile;
use frontman::llm::{CompletionClient, OpenAiCompletion};
use frontman::wiki::WikiApi;

struct Handler {
    responder: Arc<Responder>,
}

impl Handler {
    /// DMs always get a reply; guild messages only when the bot is mentioned.
    fn should_respond(&self, ctx: &Context, msg: &Message) -> bool {
        if msg.guild_id.is_none() {
            return true;
        }
        let current_user = ctx.cache.current_user();
        msg.mentions.iter().any(|user| user.id == current_user.id)
    }

    /// Remove `<@id>` / `<@!id>` mention tokens from the message text.
    fn strip_mentions(content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut rest = content;
        while let Some(start) = rest.find("<@") {
            out.push_str(&rest[..start]);
            match rest[start..].find('>') {
                Some(end) => rest = &rest[start + end + 1..],
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out.trim().to_string()
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        if !self.should_respond(&ctx, &msg) {
            return;
        }

        let text = Self::strip_mentions(&msg.content);
        if text.is_empty() && msg.attachments.is_empty() {
            return;
        }

        let nick = msg
            .author_nick(&ctx)
            .await
            .unwrap_or_else(|| msg.author.name.clone());

        let incoming = IncomingMessage::new(msg.channel_id.0, nick, text)
            .with_attachments(msg.attachments.iter().map(|a| a.url.clone()).collect())
            .with_preamble(self.responder.profile().preamble());

        let typing = msg.channel_id.start_typing(&ctx.http).ok();
        let reply = self.responder.respond(&incoming).await;
        if let Some(typing) = typing {
            typing.stop();
        }

        for chunk in chunk_for_message(&reply) {
            if chunk.trim().is_empty() {
                continue;
            }
            if let Err(e) = msg.channel_id.say(&ctx.http, &chunk).await {
                error!("Failed to deliver reply chunk: {e}");
            }
        }
        debug!("Reply delivered to channel {}", msg.channel_id);
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads its key from env vars, not from our config.
    // Set both OPENAI_API_KEY and OPENAI_KEY for compatibility.
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Frontman Discord bot...");

    let profile = PersonaProfile::frontman(&config.persona_long_name, &config.persona_short_name);
    let sessions = SessionStore::new(config.session_max_channels);
    let llm: Arc<dyn CompletionClient> = Arc::new(OpenAiCompletion);

    let mut responder = Responder::new(profile, sessions, llm.clone(), config.openai_model.clone());
    match &config.wiki_api_url {
        Some(url) => {
            info!("📖 Wiki lookups enabled via {url}");
            let wiki = Arc::new(WikiApi::new(url.clone()));
            responder = responder.with_augmenter(KnowledgeAugmenter::new(
                llm,
                wiki,
                config.openai_model.clone(),
                config.wiki_name.clone(),
            ));
        }
        None => info!("📖 WIKI_API_URL not set - wiki lookups disabled"),
    }

    let handler = Handler {
        responder: Arc::new(responder),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
