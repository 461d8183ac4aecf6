//! Response generation via the OpenAI chat completions API.
//!
//! One operation behind a trait so the engine and tests never touch the
//! network directly. The HTTP client carries a bounded timeout; a timeout is
//! recoverable (logged, webhook still acknowledged), never propagated to the
//! caller as a 500.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::LlmError;
use crate::flow::prompts::PERSONA;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.7;

/// Everything the generator needs for one reply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Instruction for the current stage.
    pub instruction: String,
    /// Client display name, if known.
    pub client_name: Option<String>,
    /// The inbound message text.
    pub inbound_text: String,
}

/// Produces the reply text for one stage of the conversation.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError>;
}

/// OpenAI chat completions client.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    /// The `client` should carry the configured request timeout.
    pub fn new(client: reqwest::Client, api_key: SecretString, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    fn system_prompt(instruction: &str) -> String {
        format!("{PERSONA}\n\nInstrução da etapa atual:\n{instruction}")
    }

    fn user_prompt(request: &GenerationRequest) -> String {
        match request.client_name.as_deref() {
            Some(name) => format!("Cliente ({name}): {}", request.inbound_text),
            None => format!("Cliente: {}", request.inbound_text),
        }
    }
}

#[async_trait]
impl ResponseGenerator for OpenAiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "messages": [
                { "role": "system", "content": Self::system_prompt(&request.instruction) },
                { "role": "user", "content": Self::user_prompt(&request) },
            ],
        });

        let resp = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!(
                "chat completion returned {status}: {body}"
            )));
        }

        let completion: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("no completion content".to_string()))?;

        Ok(content)
    }
}
