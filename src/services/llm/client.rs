use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::diagnosis::{ConversationTurn, Role};
use crate::kernel::mission::Mission;

const SYSTEM_PROMPT: &str = "You are Jaimes, the phone assistant of an automotive repair shop. \
    You are friendly, concise and professional. Never promise a price or an appointment time \
    you have not confirmed.";

/// Turns of prior conversation included in the prompt.
const HISTORY_WINDOW: usize = 8;

#[derive(Clone)]
pub struct LlmService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    stream: bool,
    n_predict: usize,
    temperature: f32,
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlmService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout) // hard timeout at the network level
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One-shot completion for this turn's mission.
    pub async fn generate(&self, mission: &Mission, history: &[ConversationTurn]) -> Result<String> {
        let request_body = CompletionRequest {
            prompt: build_prompt(mission, history),
            stream: false,
            n_predict: 96,
            temperature: 0.4,
            stop: vec!["Caller:".to_string(), "System:".to_string()],
        };

        // llama-server style /completion endpoint
        let response = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("LLM server error: {}", response.status()));
        }

        let resp_json: CompletionResponse = response.json().await?;
        Ok(resp_json.content.trim().to_string())
    }
}

pub fn build_prompt(mission: &Mission, history: &[ConversationTurn]) -> String {
    let mut prompt = format!("System: {}\nSystem: {}\n", SYSTEM_PROMPT, mission.instruction());
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    for turn in &history[start..] {
        let speaker = match turn.role {
            Role::User => "Caller",
            Role::Assistant => "Assistant",
        };
        prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
    }
    prompt.push_str("Assistant:");
    prompt
}
