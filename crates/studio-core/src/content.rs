use crate::error::{Result, StudioError};
use crate::paths;
use crate::types::ContentStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContentItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    /// JSON-encoded [`ContentBlob`]. Kept as a string so older payloads with
    /// arbitrary text survive a round trip.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pillar_id: Option<String>,
    #[serde(default)]
    pub status: ContentStatus,
}

impl ContentItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: paths::new_id(),
            title: title.into(),
            description: String::new(),
            format: String::new(),
            tags: Vec::new(),
            platforms: Vec::new(),
            scheduled_date: None,
            url: String::new(),
            pillar_id: None,
            status: ContentStatus::Idea,
        }
    }

    /// Decode the `url` blob. Anything that is not a JSON object decodes to an
    /// empty blob.
    pub fn blob(&self) -> ContentBlob {
        serde_json::from_str(&self.url).unwrap_or_default()
    }

    pub fn set_blob(&mut self, blob: &ContentBlob) -> Result<()> {
        self.url = serde_json::to_string(blob)?;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.scheduled_date.is_none()
    }
}

/// Script, caption and related drafting material stored inside
/// [`ContentItem::url`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Partial update applied by [`update_content`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub tags: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub url: Option<String>,
    pub status: Option<ContentStatus>,
}

impl ContentPatch {
    pub fn apply(self, item: &mut ContentItem) -> Result<()> {
        if let Some(title) = self.title {
            item.title = non_empty(title)?;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(format) = self.format {
            item.format = format;
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        if let Some(platforms) = self.platforms {
            item.platforms = platforms;
        }
        if let Some(url) = self.url {
            item.url = url;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pillar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

impl Pillar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: paths::new_id(),
            name: name.into(),
            content: Vec::new(),
        }
    }

    pub fn find(&self, content_id: &str) -> Option<&ContentItem> {
        self.content.iter().find(|c| c.id == content_id)
    }
}

// ---------------------------------------------------------------------------
// Pillar list operations (operate on a mutable Vec<Pillar>)
// ---------------------------------------------------------------------------

pub fn create_pillar(pillars: &mut Vec<Pillar>, name: &str) -> Result<String> {
    let pillar = Pillar::new(non_empty(name.to_string())?);
    let id = pillar.id.clone();
    pillars.push(pillar);
    Ok(id)
}

pub fn rename_pillar(pillars: &mut [Pillar], id: &str, name: &str) -> Result<()> {
    let name = non_empty(name.to_string())?;
    find_mut(pillars, id)?.name = name;
    Ok(())
}

pub fn delete_pillar(pillars: &mut Vec<Pillar>, id: &str) -> Result<Pillar> {
    let pos = pillars
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| StudioError::PillarNotFound(id.to_string()))?;
    Ok(pillars.remove(pos))
}

/// Add `item` to a pillar, stamping its `pillar_id`. Returns the content id.
pub fn add_content(pillars: &mut [Pillar], pillar_id: &str, mut item: ContentItem) -> Result<String> {
    paths::validate_id(&item.id)?;
    non_empty(item.title.clone())?;
    let pillar = find_mut(pillars, pillar_id)?;
    if pillar.content.iter().any(|c| c.id == item.id) {
        return Err(StudioError::ContentExists(item.id));
    }
    item.pillar_id = Some(pillar.id.clone());
    let id = item.id.clone();
    pillar.content.push(item);
    Ok(id)
}

pub fn update_content(
    pillars: &mut [Pillar],
    pillar_id: &str,
    content_id: &str,
    patch: ContentPatch,
) -> Result<ContentItem> {
    let item = find_content_mut(pillars, pillar_id, content_id)?;
    patch.apply(item)?;
    Ok(item.clone())
}

pub fn remove_content(pillars: &mut [Pillar], pillar_id: &str, content_id: &str) -> Result<ContentItem> {
    let pillar = find_mut(pillars, pillar_id)?;
    let pos = pillar
        .content
        .iter()
        .position(|c| c.id == content_id)
        .ok_or_else(|| StudioError::ContentNotFound(content_id.to_string()))?;
    Ok(pillar.content.remove(pos))
}

/// Move a content item from one pillar to another.
pub fn move_content(pillars: &mut [Pillar], from: &str, to: &str, content_id: &str) -> Result<()> {
    // Check the destination before detaching so a bad target leaves state untouched.
    find_mut(pillars, to)?;
    let item = remove_content(pillars, from, content_id)?;
    add_content(pillars, to, item)?;
    Ok(())
}

pub fn find_content<'a>(pillars: &'a [Pillar], pillar_id: &str, content_id: &str) -> Result<&'a ContentItem> {
    pillars
        .iter()
        .find(|p| p.id == pillar_id)
        .ok_or_else(|| StudioError::PillarNotFound(pillar_id.to_string()))?
        .find(content_id)
        .ok_or_else(|| StudioError::ContentNotFound(content_id.to_string()))
}

fn find_mut<'a>(pillars: &'a mut [Pillar], id: &str) -> Result<&'a mut Pillar> {
    pillars
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| StudioError::PillarNotFound(id.to_string()))
}

fn find_content_mut<'a>(
    pillars: &'a mut [Pillar],
    pillar_id: &str,
    content_id: &str,
) -> Result<&'a mut ContentItem> {
    find_mut(pillars, pillar_id)?
        .content
        .iter_mut()
        .find(|c| c.id == content_id)
        .ok_or_else(|| StudioError::ContentNotFound(content_id.to_string()))
}

fn non_empty(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StudioError::InvalidName("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
