//! Telegram integration -- post the daily summary through the Bot API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::json;

use crate::error::NotifyError;
use crate::integrations::github::USER_AGENT;
use crate::integrations::traits::Notifier;
use crate::storage::TelegramConfig;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// The `result` of `getMe`.
#[derive(Debug, Deserialize)]
struct BotUser {
    first_name: String,
    #[serde(default)]
    username: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: i64,
}

impl TelegramNotifier {
    /// Build a client from validated configuration.
    ///
    /// # Errors
    /// Fails if `chat_id` is missing or the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let chat_id = config
            .chat_id
            .ok_or_else(|| NotifyError::Rejected("chat_id is not configured".into()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(NotifyError::Transport)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Check the bot token with `getMe` and return the bot's name.
    ///
    /// Run this before anything else so a revoked or mistyped token stops
    /// the job before the history is touched.
    ///
    /// # Errors
    /// Returns an error if the request fails, Telegram answers non-2xx, or
    /// the response is not `ok`.
    pub async fn authorize(&self) -> Result<String, NotifyError> {
        let request = self.client.get(self.method_url("getMe"));
        let bot: BotUser = call(request)
            .await?
            .ok_or_else(|| NotifyError::Rejected("getMe returned no bot".into()))?;
        Ok(bot.username.unwrap_or(bot.first_name))
    }
}

/// Send `request` and unwrap the Bot API envelope.
async fn call<T: DeserializeOwned>(request: RequestBuilder) -> Result<Option<T>, NotifyError> {
    // The bot token is part of the URL; keep it out of error messages.
    let resp = request
        .send()
        .await
        .map_err(|e| NotifyError::Transport(e.without_url()))?;
    let status = resp.status();
    let raw = resp
        .text()
        .await
        .map_err(|e| NotifyError::Transport(e.without_url()))?;

    if !status.is_success() {
        return Err(NotifyError::Status {
            status: status.as_u16(),
            body: raw,
        });
    }

    let parsed: ApiResponse<T> = serde_json::from_str(&raw)
        .map_err(|e| NotifyError::Rejected(format!("unreadable response: {e}")))?;
    if !parsed.ok {
        return Err(NotifyError::Rejected(
            parsed
                .description
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    Ok(parsed.result)
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let body = json!({ "chat_id": self.chat_id, "text": text });
        let request = self.client.post(self.method_url("sendMessage")).json(&body);
        call::<IgnoredAny>(request).await?;
        Ok(())
    }
}
