use crate::types::{
    ApiErrorBody, Idea, IdeaRequest, ImageInput, InputBlock, InputMessage, MessagesRequest,
    MessagesResponse,
};
use crate::{ClaudeError, Result};

const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

const DEFAULT_IDEA_COUNT: u32 = 5;
const MAX_IDEA_COUNT: u32 = 20;

pub const ANALYSIS_PROMPT: &str = "You are a social media content strategist. Analyze this post \
screenshot and respond with a JSON object with the keys \"summary\", \"hook\", \"format\", \
\"strengths\" (array of strings), \"improvements\" (array of strings) and \"ideas\" (array of \
strings with follow-up content ideas). Respond with JSON only.";

// ─── ClaudeClient ─────────────────────────────────────────────────────────

/// Client for `POST /v1/messages`.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
        }
    }

    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a raw Messages API request.
    pub async fn messages(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let api_key = self.api_key.as_deref().ok_or(ClaudeError::MissingApiKey)?;
        let url = format!("{}/v1/messages", self.base_url);

        tracing::debug!(model = %request.model, "sending messages request");
        let resp = self
            .http
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let (kind, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(e) => (e.error.kind, e.error.message),
                Err(_) => ("unknown".to_string(), body),
            };
            tracing::warn!(status = status.as_u16(), %kind, "anthropic request failed");
            return Err(ClaudeError::Api {
                status: status.as_u16(),
                kind,
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| ClaudeError::Decode { body, source })
    }

    /// Single-turn prompt, returning the reply text.
    pub async fn complete(&self, system: Option<&str>, content: Vec<InputBlock>) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system.map(str::to_string),
            messages: vec![InputMessage::user(content)],
        };
        let text = self.messages(&request).await?.text();
        if text.trim().is_empty() {
            return Err(ClaudeError::EmptyResponse);
        }
        Ok(text)
    }

    /// Ask the model to analyze a post image. Returns the raw reply text.
    pub async fn analyze_image(&self, image: ImageInput, prompt: Option<&str>) -> Result<String> {
        let content = vec![
            InputBlock::Image {
                source: image.into_source(),
            },
            InputBlock::text(prompt.unwrap_or(ANALYSIS_PROMPT)),
        ];
        self.complete(None, content).await
    }

    /// Generate content ideas for a niche.
    pub async fn generate_ideas(&self, request: &IdeaRequest) -> Result<Vec<Idea>> {
        let prompt = idea_prompt(request);
        let text = self
            .complete(
                Some("You are a creative content strategist for social media creators."),
                vec![InputBlock::text(prompt)],
            )
            .await?;
        parse_ideas(&text)
    }
}

// ─── Prompt helpers ───────────────────────────────────────────────────────

pub fn idea_prompt(request: &IdeaRequest) -> String {
    let count = request
        .count
        .unwrap_or(DEFAULT_IDEA_COUNT)
        .clamp(1, MAX_IDEA_COUNT);
    let mut prompt = format!("Generate {count} content ideas for a creator in the \"{}\" niche", request.niche);
    if let Some(pillar) = request.pillar.as_deref().filter(|p| !p.is_empty()) {
        prompt.push_str(&format!(" within the content pillar \"{pillar}\""));
    }
    if let Some(platform) = request.platform.as_deref().filter(|p| !p.is_empty()) {
        prompt.push_str(&format!(" for {platform}"));
    }
    prompt.push_str(
        ". Respond with a JSON array only. Each element must be an object with the keys \
\"title\", \"hook\", \"format\" and \"description\".",
    );
    prompt
}

/// Slice out the first JSON value of the given kind (`[`…`]` or `{`…`}`).
/// Models often wrap JSON in prose or code fences.
pub fn extract_json(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_ideas(text: &str) -> Result<Vec<Idea>> {
    let json = extract_json(text, '[', ']').unwrap_or(text);
    serde_json::from_str(json).map_err(|source| ClaudeError::Decode {
        body: text.to_string(),
        source,
    })
}
