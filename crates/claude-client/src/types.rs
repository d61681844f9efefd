use serde::{Deserialize, Serialize};

// ─── Request ──────────────────────────────────────────────────────────────

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<InputMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: Vec<InputBlock>,
}

impl InputMessage {
    pub fn user(content: Vec<InputBlock>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputBlock {
    Text { text: String },
    Image { source: ImageSource },
}

impl InputBlock {
    pub fn text(text: impl Into<String>) -> Self {
        InputBlock::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

/// An image handed to the vision endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    Base64 { media_type: String, data: String },
    Url(String),
}

impl ImageInput {
    /// Accepts raw base64 or a `data:<media>;base64,<data>` URL.
    pub fn from_base64(data: &str, media_type: Option<&str>) -> Self {
        if let Some(rest) = data.strip_prefix("data:") {
            if let Some((meta, payload)) = rest.split_once(',') {
                let media = meta.trim_end_matches(";base64");
                return ImageInput::Base64 {
                    media_type: media.to_string(),
                    data: payload.to_string(),
                };
            }
        }
        ImageInput::Base64 {
            media_type: media_type.unwrap_or("image/png").to_string(),
            data: data.to_string(),
        }
    }

    pub(crate) fn into_source(self) -> ImageSource {
        match self {
            ImageInput::Base64 { media_type, data } => ImageSource::Base64 { media_type, data },
            ImageInput::Url(url) => ImageSource::Url { url },
        }
    }
}

// ─── Response ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub model: String,
    pub role: Role,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

impl MessagesResponse {
    /// Concatenated text of every text block.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// Block types this client does not use.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// `{"type":"error","error":{"type":"…","message":"…"}}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

// ─── Content ideas ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub niche: String,
    #[serde(default)]
    pub pillar: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub title: String,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub description: String,
}
