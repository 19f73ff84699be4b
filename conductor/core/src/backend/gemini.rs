//! Gemini Backend Implementation
//!
//! Talks to the Gemini `generateContent` REST endpoint:
//!
//! ```text
//! POST {base_url}/v1beta/models/{model}:generateContent
//! x-goog-api-key: <key>
//! ```
//!
//! `chat` sends the history as `user`/`model` turns with Baron's persona as
//! the system instruction. `mix` asks for `application/json` constrained by
//! the cocktail schema and parses the first candidate's text as a
//! [`Cocktail`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::persona::{cocktail_schema, mix_prompt, MIX_INSTRUCTION, SYSTEM_INSTRUCTION};
use super::traits::{BackendError, BistroBackend};
use crate::cocktail::Cocktail;
use crate::config::BackendSettings;
use crate::messages::MessageRole;
use crate::session::HistoryTurn;

/// Gemini backend client
#[derive(Clone, Debug)]
pub struct GeminiBackend {
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a backend from resolved settings
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingApiKey`] if no key was resolved, or
    /// [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, BackendError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BackendError::MissingApiKey(settings.api_key_env.clone()))?;

        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            temperature: settings.temperature,
            http_client,
        })
    }

    /// Model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn generate(&self, body: &Value) -> Result<Option<String>, BackendError> {
        let response = self
            .http_client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        parsed.first_text()
    }
}

#[async_trait]
impl BistroBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn chat(&self, user_text: &str, history: &[HistoryTurn]) -> Result<String, BackendError> {
        let body = chat_body(user_text, history, self.temperature);
        tracing::debug!(model = %self.model, turns = history.len(), "Requesting reply");
        Ok(self.generate(&body).await?.unwrap_or_default())
    }

    async fn mix(&self, mood: &str) -> Result<Option<Cocktail>, BackendError> {
        let body = mix_body(mood);
        tracing::debug!(model = %self.model, "Requesting cocktail");
        match self.generate(&body).await? {
            Some(text) => Ok(Some(parse_cocktail(&text)?)),
            None => Ok(None),
        }
    }
}

fn wire_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

fn text_content(role: &str, text: &str) -> Value {
    json!({ "role": role, "parts": [{ "text": text }] })
}

/// Request body for a reply
#[must_use]
pub fn chat_body(user_text: &str, history: &[HistoryTurn], temperature: f32) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| text_content(wire_role(turn.role), &turn.text))
        .collect();
    contents.push(text_content("user", user_text));

    json!({
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        "contents": contents,
        "generationConfig": { "temperature": temperature },
    })
}

/// Request body for a cocktail
#[must_use]
pub fn mix_body(mood: &str) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": format!("{SYSTEM_INSTRUCTION}\n{MIX_INSTRUCTION}") }]
        },
        "contents": [text_content("user", &mix_prompt(mood))],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": cocktail_schema(),
        },
    })
}

/// Parse a cocktail out of a candidate's text
///
/// Tolerates a Markdown code fence around the JSON.
///
/// # Errors
///
/// Returns [`BackendError::Malformed`] if the text is not a cocktail.
pub fn parse_cocktail(text: &str) -> Result<Cocktail, BackendError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(unfenced)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate; `None` if it is blank
    fn first_text(self) -> Result<Option<String>, BackendError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(BackendError::EmptyCandidate)?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        Ok(if text.trim().is_empty() { None } else { Some(text) })
    }
}
