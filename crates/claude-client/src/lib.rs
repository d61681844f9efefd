//! `claude-client`: async client for the Anthropic Messages API.
//!
//! Covers the two calls studio makes: vision analysis of a post image and
//! content-idea generation. Both are single-turn requests; there is no
//! streaming and no retry.
//!
//! ```rust,ignore
//! use claude_client::{ClaudeClient, ImageInput};
//!
//! let client = ClaudeClient::new(std::env::var("ANTHROPIC_API_KEY").ok());
//! let image = ImageInput::from_base64(&png_b64, Some("image/png"));
//! let analysis = client.analyze_image(image, None).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{extract_json, parse_ideas, ClaudeClient, ANALYSIS_PROMPT};
pub use error::ClaudeError;
pub use types::{
    ContentBlock, Idea, IdeaRequest, ImageInput, InputBlock, InputMessage, MessagesRequest,
    MessagesResponse, Role, TokenUsage,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeError>;
