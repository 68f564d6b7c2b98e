//! LLM-backed page extractor
//!
//! Fetches the page, condenses it, and asks an OpenAI-compatible
//! chat-completions endpoint to answer the instruction as JSON.

use crate::config::ExtractorConfig;
use crate::extractor::page::condense_html;
use crate::extractor::{ExtractorResult, PageExtractor};
use crate::{ConfigError, HarvestError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const SYSTEM_PROMPT: &str = "You extract structured data from web pages. \
The page is given as TITLE, LINKS (url | anchor text), IMAGES (url | alt text) and TEXT sections. \
Only use URLs that appear in the page. \
Answer with a single JSON object of the form {\"content\": ...} and nothing else.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Page extractor that delegates interpretation to a language model
pub struct LlmExtractor {
    client: Client,
    completions_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_page_chars: usize,
}

impl LlmExtractor {
    /// Builds an extractor, reading the API key from the configured environment variable
    pub fn from_env(config: &ExtractorConfig) -> Result<Self, HarvestError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ConfigError::Validation(format!(
                "environment variable {} must hold the extractor API key",
                config.api_key_env
            ))
        })?;
        Self::new(config, api_key)
    }

    /// Builds an extractor with an explicit API key
    pub fn new(config: &ExtractorConfig, api_key: String) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_page_chars: config.max_page_chars,
        })
    }

    async fn fetch_page(&self, page_url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(page_url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: page_url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: page_url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| HarvestError::Http {
            url: page_url.to_string(),
            source,
        })
    }

    async fn complete(&self, page_url: &str, prompt: String) -> Result<String, HarvestError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(prompt),
                },
            ],
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: self.completions_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HarvestError::Extractor {
                url: page_url.to_string(),
                message: format!("completion request failed with {}: {}", status, body.trim()),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|source| HarvestError::Http {
            url: self.completions_url.clone(),
            source,
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| HarvestError::Extractor {
                url: page_url.to_string(),
                message: "completion contained no message content".to_string(),
            })
    }
}

#[async_trait]
impl PageExtractor for LlmExtractor {
    async fn extract(
        &self,
        page_url: &str,
        instruction: &str,
    ) -> Result<ExtractorResult, HarvestError> {
        let base = Url::parse(page_url)?;
        let html = self.fetch_page(page_url).await?;
        let condensed = condense_html(&html, &base).render(self.max_page_chars);

        tracing::debug!(
            "Asking {} about {} ({} chars of page context)",
            self.model,
            page_url,
            condensed.len()
        );

        let prompt = format!(
            "Page URL: {}\n\nInstruction: {}\n\n{}",
            page_url, instruction, condensed
        );
        let completion = self.complete(page_url, prompt).await?;

        Ok(parse_completion(&completion))
    }
}

/// Interprets the model's reply
///
/// JSON (optionally inside a Markdown code fence) goes through
/// [`ExtractorResult::from_json`]; any other non-empty reply is taken as a
/// plain scalar answer.
pub fn parse_completion(completion: &str) -> ExtractorResult {
    let body = strip_code_fence(completion.trim());

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ExtractorResult::from_json(&value),
        Err(_) if !body.is_empty() => ExtractorResult::Scalar(body.to_string()),
        Err(_) => ExtractorResult::Malformed("empty completion".to_string()),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line, if any
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
