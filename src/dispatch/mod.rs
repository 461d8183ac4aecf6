//! Outbound messaging through the Twilio WhatsApp API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::DispatchError;

/// Twilio caps WhatsApp message bodies at 1600 characters.
const WHATSAPP_MAX_MESSAGE_LENGTH: usize = 1600;

/// Pause between sequential chunks of one split message.
const INTER_CHUNK_PAUSE: Duration = Duration::from_millis(800);

/// Delivers generated text to a client's channel address.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), DispatchError>;
}

/// Twilio Messages API client.
///
/// Dispatch is never blindly retried: without a deduplication token a retry
/// risks delivering the same message twice.
pub struct TwilioDispatcher {
    client: reqwest::Client,
    account_sid: String,
    auth_token: SecretString,
    /// Sender address including the `whatsapp:` prefix.
    from: String,
}

impl TwilioDispatcher {
    pub fn new(
        client: reqwest::Client,
        account_sid: String,
        auth_token: SecretString,
        phone_number: &str,
    ) -> Self {
        Self {
            client,
            account_sid,
            auth_token,
            from: format!("whatsapp:{phone_number}"),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }

    async fn send_chunk(&self, to: &str, body: &str) -> Result<(), DispatchError> {
        let form = [("From", self.from.as_str()), ("To", to), ("Body", body)];

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(|e| DispatchError::SendFailed {
                to: to.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl Dispatcher for TwilioDispatcher {
    async fn send(&self, to: &str, body: &str) -> Result<(), DispatchError> {
        let chunks = split_message(body, WHATSAPP_MAX_MESSAGE_LENGTH);
        let mut first = true;
        for chunk in &chunks {
            if !first {
                tokio::time::sleep(INTER_CHUNK_PAUSE).await;
            }
            first = false;
            self.send_chunk(to, chunk).await?;
        }
        tracing::info!(to, chunks = chunks.len(), "WhatsApp message dispatched");
        Ok(())
    }
}

/// Split a reply into chunks of at most `max_len` bytes without ever cutting
/// through a UTF-8 sequence. Breaks at the last newline in the window, then
/// the last space, and hard-cuts only when the window holds no whitespace.
/// Replies carry accents and emoji, so the window edge must be clamped to a
/// char boundary before any slicing.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.len() > max_len {
        let window = &rest[..char_floor(rest, max_len)];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&at| at > 0)
            .unwrap_or(window.len());
        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}

/// Largest char-boundary index at or below `at`. For non-empty input this is
/// never 0: an oversized first char is kept whole rather than looping.
fn char_floor(s: &str, at: usize) -> usize {
    let mut at = at.min(s.len());
    while at > 0 && !s.is_char_boundary(at) {
        at -= 1;
    }
    if at == 0 {
        s.chars().next().map_or(0, char::len_utf8)
    } else {
        at
    }
}
