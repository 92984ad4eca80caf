use anyhow::{Result, anyhow};
use questlog_core::{AssistantError, LlmConfig, StreamCallback, StreamChunk};
use reqwest::blocking::Client;
use serde_json::{Value, json};
use std::io::BufRead;

pub trait GenerateClient {
    /// Streaming generation: invokes `cb` for each text fragment as it
    /// arrives and returns the fully assembled response text once the
    /// stream ends.
    fn generate_streaming(&self, prompt: &str, cb: StreamCallback) -> Result<String>;
}

/// Blocking client for a local Ollama-style `/api/generate` endpoint.
///
/// The generation call carries no timeout: a long local inference is
/// expected to block the worker thread until the stream ends.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    cfg: LlmConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(cfg: LlmConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { cfg, client })
    }
}

impl GenerateClient for OllamaClient {
    fn generate_streaming(&self, prompt: &str, cb: StreamCallback) -> Result<String> {
        let payload = json!({
            "model": self.cfg.model,
            "prompt": prompt,
            "stream": true,
        });

        let response = self
            .client
            .post(&self.cfg.endpoint)
            .json(&payload)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    anyhow::Error::new(AssistantError::NetworkUnavailable)
                } else {
                    anyhow!("request to model server failed: {e}")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let detail: String = body.chars().take(200).collect();
            return Err(anyhow!(
                "model server error (HTTP {}): {detail}",
                status.as_u16()
            ));
        }

        // The body is newline-delimited JSON; each object may carry a
        // `response` fragment. Unparsable lines and objects without the
        // field are skipped, not errors.
        let mut full_text = String::new();
        let reader = std::io::BufReader::new(response);
        for line_result in reader.lines() {
            let line = line_result.map_err(|e| anyhow!("stream read error: {e}"))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value: Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(_) => continue,
            };
            if let Some(fragment) = value.get("response").and_then(|v| v.as_str()) {
                full_text.push_str(fragment);
                cb(StreamChunk::ContentDelta(fragment.to_string()));
            }
            if value.get("done").and_then(|v| v.as_bool()) == Some(true) {
                break;
            }
        }
        cb(StreamChunk::Done);
        Ok(full_text)
    }
}
