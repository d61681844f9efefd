use axum::extract::State;
use axum::Json;
use claude_client::{extract_json, IdeaRequest, ImageInput, ANALYSIS_PROMPT};
use serde::Deserialize;
use serde_json::Value;
use studio_core::content::{self, ContentBlob, ContentItem, Pillar};

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeBody {
    #[serde(default)]
    pub url: Option<String>,
    /// Base64 image or `data:` URL, used when no `url` is given.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "mediaType")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// POST /api/analyze-content — capture a post (or take an uploaded image)
/// and ask Claude to analyze it.
pub async fn analyze_content(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<AnalyzeBody>,
) -> Result<Json<Value>, AppError> {
    let url = body.url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let image = body.image.as_deref().filter(|i| !i.is_empty());

    let (input, capture) = match (url, image) {
        (Some(url), _) => {
            let capture = app.capture.capture(url).await?;
            let input = ImageInput::from_base64(&capture.image_base64, Some(&capture.media_type));
            (input, Some(capture))
        }
        (None, Some(image)) => (ImageInput::from_base64(image, body.media_type.as_deref()), None),
        (None, None) => return Err(AppError::bad_request("either url or image is required")),
    };

    let is_video = capture.as_ref().is_some_and(|c| c.is_video);
    let mut prompt = body.prompt.unwrap_or_else(|| ANALYSIS_PROMPT.to_string());
    if is_video {
        prompt.push_str(" The post is a video; the image is its cover frame.");
    }

    let raw = app.claude.analyze_image(input, Some(&prompt)).await?;
    let analysis = parse_analysis(&raw);

    Ok(Json(serde_json::json!({
        "analysis": analysis,
        "raw": raw,
        "is_video": is_video,
        "platform": capture.as_ref().map(|c| c.platform),
        "title": capture.as_ref().and_then(|c| c.title.clone()),
        "image_url": capture.as_ref().map(|c| c.image_url.clone()),
    })))
}

/// The model's JSON object, or its prose wrapped as `{ "summary": ... }`.
fn parse_analysis(raw: &str) -> Value {
    extract_json(raw, '{', '}')
        .and_then(|json| serde_json::from_str::<Value>(json).ok())
        .filter(Value::is_object)
        .unwrap_or_else(|| serde_json::json!({ "summary": raw.trim() }))
}

#[derive(Deserialize)]
pub struct GenerateIdeasBody {
    #[serde(flatten)]
    pub request: IdeaRequest,
    /// When set, the ideas are also saved as content in this pillar.
    #[serde(default, alias = "pillarId")]
    pub pillar_id: Option<String>,
}

/// POST /api/generate-ideas — ask Claude for content ideas.
pub async fn generate_ideas(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<GenerateIdeasBody>,
) -> Result<Json<Value>, AppError> {
    if body.request.niche.trim().is_empty() {
        return Err(AppError::bad_request("niche is required"));
    }
    let ideas = app.claude.generate_ideas(&body.request).await?;
    tracing::info!(count = ideas.len(), niche = %body.request.niche, "generated ideas");

    let Some(pillar_id) = body.pillar_id else {
        return Ok(Json(serde_json::json!({ "ideas": ideas })));
    };

    let to_save = ideas.clone();
    let saved = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| {
                let mut ids = Vec::with_capacity(to_save.len());
                for idea in to_save {
                    let mut item = ContentItem::new(idea.title);
                    item.description = idea.description;
                    item.format = idea.format;
                    if !idea.hook.is_empty() {
                        item.set_blob(&ContentBlob {
                            hook: Some(idea.hook),
                            ..Default::default()
                        })?;
                    }
                    ids.push(content::add_content(pillars, &pillar_id, item)?);
                }
                Ok(ids)
            })
        })
        .await?;

    Ok(Json(serde_json::json!({ "ideas": ideas, "saved": saved })))
}
