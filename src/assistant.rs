//! Generative cooking assistant. The session treats it as a blocking
//! request/response text service; failures never reach the repository and
//! are turned into a readable reply by [`respond`].

use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str = "You are a friendly cooking assistant. \
    Answer with clear, step-by-step recipes that list the ingredients first and \
    then numbered instructions. Be thorough but easy to follow, and assume the \
    cook is a beginner.";

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("the assistant is not configured")]
    NotConfigured,

    #[error("request rejected with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unreadable response: {0}")]
    Decode(#[from] std::io::Error),
}

pub trait Assistant {
    /// Send `prompt` and block until the full reply arrives.
    fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Stand-in used when no API key is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

impl Assistant for Unconfigured {
    fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiAssistant {
    api_key: String,
    model: String,
    api_base: String,
    timeout: Duration,
}

impl GeminiAssistant {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            api_base: GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at another server, used by tests.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

impl Assistant for GeminiAssistant {
    fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(prompt),
                }],
            }],
        };

        debug!("asking {} ({} chars)", self.model, prompt.len());
        let response = ureq::post(&self.endpoint())
            .timeout(self.timeout)
            .set("x-goog-api-key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => {
                    let message = response
                        .into_string()
                        .ok()
                        .and_then(|raw| error_message(&raw))
                        .unwrap_or_else(|| "no details".to_string());
                    warn!("assistant returned status {status}: {message}");
                    AssistantError::Status { status, message }
                }
                ureq::Error::Transport(transport) => {
                    warn!("assistant request failed: {transport}");
                    AssistantError::Transport(transport.to_string())
                }
            })?;

        let reply: GenerateResponse = response.into_json()?;
        Ok(reply.text())
    }
}

/// Pick the assistant the configuration allows for.
pub fn from_config(config: &Config) -> Box<dyn Assistant> {
    match &config.api_key {
        Some(key) => Box::new(
            GeminiAssistant::new(key.clone(), config.model.clone())
                .with_timeout(config.request_timeout),
        ),
        None => {
            debug!("no API key configured, assistant disabled");
            Box::new(Unconfigured)
        }
    }
}

/// Wrap the user's text in the cooking-assistant instruction.
pub fn build_prompt(request: &str) -> String {
    format!(
        "{SYSTEM_INSTRUCTION}\n\n\
         The user wants a recipe or help with cooking.\n\
         User: {}\n\
         Assistant:",
        request.trim()
    )
}

/// Ask `assistant` and always come back with something to show.
pub fn respond(assistant: &dyn Assistant, prompt: &str) -> String {
    match assistant.generate(prompt) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                "Sorry, I couldn't come up with an answer. Please try again.".to_string()
            } else {
                text.to_string()
            }
        }
        Err(AssistantError::NotConfigured) => {
            "The assistant is not configured. Set the GEMINI_API_KEY environment \
             variable and restart to enable it."
                .to_string()
        }
        Err(err) => format!("Error from assistant: {err}"),
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn error_message(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
