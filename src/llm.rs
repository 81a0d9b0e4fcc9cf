use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::error::{BrainrotError, BrainrotResult};

pub const GROQ_BASE_URL: &str = "https://api.groq.com";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\-]+").unwrap());

/// One text-generation call. Returns the raw completion, possibly empty.
#[async_trait]
pub trait DialogueRequester: Send + Sync {
    async fn request(&self, system_prompt: &str, user_prompt: &str) -> BrainrotResult<String>;
}

/// `JOE_ROGAN` -> `JOE ROGAN`, for prose only. Schema ids stay untouched.
pub fn spaced(agent: &str) -> String {
    SEPARATORS.replace_all(agent, " ").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialoguePrompt {
    pub system: String,
    pub user: String,
}

pub fn build_prompt(topic: &str, agent_a: &str, agent_b: &str) -> DialoguePrompt {
    let a = spaced(agent_a);
    let b = spaced(agent_b);

    let system = format!(
        r#"You are an expert dialogue generator for educational short-form videos written in podcast conversation style. You must create a back-and-forth script between two agents:

- {a} is a **curious student** who is inquisitive and frantic. They ask meaningful, bold, silly, and/or exaggerated questions to hook the audience.
- {b} is an **expert teacher** and master of the topic who can explain the topic with extreme certainty, fun analogies, and occasional wild metaphors.

{b} will directly answer the questions asked by {a} about the topic in an enlightening, engaging, and humorous way.
Both agents are **caricatures of themselves**, behaving as exaggerated versions of their real-life personas.

The dialogue must:
- Lead to a short form video that is **no more than 60 seconds**
- Contain **no more than 7 exchanges**
- Start with {a} asking an **attention-grabbing intro question** with {b}'s name in it
- Focus **75% on clearly explaining the topic**, and **25% on humor**
- Be suitable for a **wide, non-expert audience**

The agentId attribute must be exactly {agent_a} or {agent_b}. The text attribute is that character's line of dialogue.

The JSON format WHICH MUST BE ADHERED TO ALWAYS is as follows:
{{
  "transcript": [
    {{ "agentId": "the exact value of {agent_a} or {agent_b} depending on who is talking", "text": "their line of conversation in the dialog" }}
  ]
}}"#
    );

    let user = format!(
        r#"Generate a 60-second podcast-style dialogue on the topic: "{topic}"
{a} (agentId: {agent_a}) should begin with a dramatic, funny, or ridiculous intro question about {topic}.
Then, {b} (agentId: {agent_b}) should respond confidently, explaining the topic using analogies and humor while keeping everything technically accurate.
The rest of the dialogue should alternate, with {a} reacting with exaggerated curiosity and {b} continuing to break down the topic.
Follow the required JSON format and keep the exchange count at 7 or less."#
    );

    DialoguePrompt { system, user }
}

#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            temperature: 0.5,
            max_tokens: 2048,
        }
    }
}

/// Groq's OpenAI-compatible chat completions endpoint in JSON mode.
pub struct GroqRequester {
    config: GroqConfig,
    http: reqwest::Client,
}

impl GroqRequester {
    pub fn new(config: GroqConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DialogueRequester for GroqRequester {
    async fn request(&self, system_prompt: &str, user_prompt: &str) -> BrainrotResult<String> {
        let url = format!(
            "{}/openai/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "response_format": { "type": "json_object" },
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "top_p": 1,
            "stream": false,
        });

        info!("Requesting dialogue completion from {}", self.config.model);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BrainrotError::Request(format!(
                "Groq API error {}: {}",
                status, body
            )));
        }
        let resp_body: serde_json::Value = resp.json().await?;

        let content = resp_body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        debug!("Completion received ({} chars)", content.len());
        Ok(content)
    }
}
