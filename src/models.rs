use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::helpers::chapter_id_from_href;

/// One hit from the search page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Slug from the `/manga/<slug>` segment of `href`
    pub id: String,
    pub title: String,
    pub image: String,
    pub href: String,
}

/// A manga as the host hands it back for details.
///
/// Fields the source does not know about are kept in `extra` and echoed back
/// unchanged in [`MangaDetails`].
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MangaRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MangaRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

impl From<SearchResult> for MangaRef {
    fn from(result: SearchResult) -> Self {
        Self {
            id: result.id,
            href: Some(result.href),
            title: Some(result.title),
            image: Some(result.image),
            ..Self::default()
        }
    }
}

/// The host's manga enriched with author, description and chapters
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MangaDetails {
    #[serde(flatten)]
    pub manga: MangaRef,
    pub chapters: Vec<Chapter>,
}

impl MangaDetails {
    /// The input reference with an empty chapter list
    pub fn fallback(manga: &MangaRef) -> Self {
        let mut manga = manga.clone();
        manga.extra.remove("chapters");
        Self {
            manga,
            chapters: Vec::new(),
        }
    }

    pub fn author(&self) -> Option<&str> {
        self.manga.author.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.manga.description.as_deref()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Digits of the `/c<n>/` path segment
    pub id: String,
    pub title: String,
    pub chapter_number: f64,
    pub href: String,
}

/// A chapter as the host hands it back for page listing
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ChapterRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChapterRef {
    pub fn from_href(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// Explicit id, else the one encoded in `href`
    pub fn resolved_id(&self) -> Option<String> {
        self.id
            .clone()
            .or_else(|| self.href.as_deref().and_then(chapter_id_from_href))
    }
}

impl From<&Chapter> for ChapterRef {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: Some(chapter.id.clone()),
            href: Some(chapter.href.clone()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub url: String,
    /// 1-based position in emission order
    pub page_number: u32,
}
