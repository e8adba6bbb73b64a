//! OpenAI-compatible Enricher
//!
//! Sends a summary of the core report to a Chat Completions endpoint and asks
//! for a JSON object with recommendations, a risk level and integrations.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::Enricher;
use crate::config::EnrichmentConfig;
use crate::types::{AnalysisReport, Enrichment, Result, ScopeError};

/// Section JSON longer than this is cut before it goes into the prompt
const MAX_SECTION_CHARS: usize = 2000;

const SYSTEM_PROMPT: &str = "You review file analysis reports. Respond ONLY with a JSON object: \
{\"recommendations\": [string], \"risk_level\": \"low\"|\"medium\"|\"high\", \
\"integrations\": [string], \"confidence\": number between 0 and 1}";

/// OpenAI API enricher with secure API key handling
pub struct OpenAiEnricher {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEnricher")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiEnricher {
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                ScopeError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScopeError::Enrichment(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request(&self, report: &AnalysisReport) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(report),
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

fn build_prompt(report: &AnalysisReport) -> String {
    let section = |value: &crate::types::Section| {
        let json = serde_json::to_string(value).unwrap_or_default();
        match json.char_indices().nth(MAX_SECTION_CHARS) {
            Some((cut, _)) => format!("{}...", &json[..cut]),
            None => json,
        }
    };

    format!(
        "File: {}\nCategory: {}\nSize: {}\n\nStructure: {}\nContent: {}\nQuality: {}\nSecurity: {}\n\n\
         Suggest improvements, assess the risk and list systems this file could integrate with.",
        report.record.name,
        report.category,
        report.record.size_human,
        section(&report.structure),
        section(&report.content),
        section(&report.quality),
        section(&report.security),
    )
}

/// Fields the model is asked to return
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Insights {
    recommendations: Vec<String>,
    risk_level: String,
    integrations: Vec<String>,
    confidence: f64,
}

/// Parse the model's answer, tolerating a fenced code block around the JSON
fn parse_insights(content: &str, model: &str) -> Result<Enrichment> {
    let start = content.find('{');
    let end = content.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &content[s..=e],
        _ => {
            return Err(ScopeError::Enrichment(
                "No JSON object in enrichment response".to_string(),
            ));
        }
    };

    let insights: Insights = serde_json::from_str(json)?;
    Ok(Enrichment {
        model: model.to_string(),
        recommendations: insights.recommendations,
        risk_level: if insights.risk_level.is_empty() {
            "unknown".to_string()
        } else {
            insights.risk_level
        },
        integrations: insights.integrations,
        confidence: insights.confidence.clamp(0.0, 1.0),
        error: None,
    })
}

#[async_trait]
impl Enricher for OpenAiEnricher {
    async fn enrich(&self, report: &AnalysisReport) -> Result<Enrichment> {
        info!(
            "Enriching {} with OpenAI (model: {})",
            report.record.name, self.model
        );

        let start_time = Instant::now();
        let request = self.build_request(report);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ScopeError::Enrichment(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScopeError::Enrichment(format!(
                "OpenAI API error ({}): {}",
                status, body
            )));
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            ScopeError::Enrichment(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let content = response_body
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| ScopeError::Enrichment("No content in OpenAI response".to_string()))?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received enrichment response"
        );
        parse_insights(content, &self.model)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisHints, FileClassifier};

    fn enricher() -> OpenAiEnricher {
        let config = EnrichmentConfig {
            api_key: Some("sk-test-key".to_string()),
            api_base: "http://localhost:9/v1/".to_string(),
            ..Default::default()
        };
        OpenAiEnricher::new(&config).unwrap()
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", enricher());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-test-key"));
    }

    #[test]
    fn test_request_carries_report_summary() {
        let report = FileClassifier::default().analyze_bytes(
            "app.py",
            b"def main():\n    pass\n",
            &AnalysisHints::default(),
        );
        let enricher = enricher();
        assert_eq!(enricher.api_base, "http://localhost:9/v1");

        let request = enricher.build_request(&report);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        let prompt = body["messages"][1]["content"].as_str().unwrap();
        assert!(prompt.contains("File: app.py"));
        assert!(prompt.contains("Category: code"));
        assert!(prompt.contains("functions_count"));
    }

    #[test]
    fn test_parse_insights_from_fenced_block() {
        let content = "```json\n{\"recommendations\": [\"add tests\"], \"risk_level\": \"low\", \"confidence\": 1.7}\n```";
        let enrichment = parse_insights(content, "gpt-4o-mini").unwrap();
        assert_eq!(enrichment.model, "gpt-4o-mini");
        assert_eq!(enrichment.recommendations, vec!["add tests"]);
        assert_eq!(enrichment.risk_level, "low");
        assert!(enrichment.integrations.is_empty());
        assert_eq!(enrichment.confidence, 1.0);
    }

    #[test]
    fn test_parse_insights_rejects_prose() {
        assert!(matches!(
            parse_insights("I cannot help with that", "m"),
            Err(ScopeError::Enrichment(_))
        ));
    }
}
