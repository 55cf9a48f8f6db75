use std::sync::LazyLock;

use url::Url;

use crate::error::{ExtractionError, Result};
use crate::helpers::{
    chapter_id_from_href, clean_text, collapse_whitespace, is_page_image, manga_id_from_href,
    parse_chapter_number, qualify_url,
};
use crate::http_client::{request_headers, HttpFetcher, PageFetcher};
use crate::matchers::{ExtractorChain, MatchMode, Matcher, RegexMatcher};
use crate::models::{Chapter, ChapterRef, MangaDetails, MangaRef, Page, SearchResult};

pub const BASE_URL: &str = "https://www.mangahere.cc";

const SOURCE: &str = "MangaHere";
const MAX_SEARCH_RESULTS: usize = 50;
const MAX_PAGES: usize = 100;

fn compile(patterns: &[(&'static str, &str)]) -> Vec<Box<dyn Matcher>> {
    patterns
        .iter()
        .map(|&(name, pattern)| Box::new(RegexMatcher::new(name, pattern).unwrap()) as Box<dyn Matcher>)
        .collect()
}

// (href, image src, alt)
static SEARCH_MATCHERS: LazyLock<Vec<Box<dyn Matcher>>> = LazyLock::new(|| {
    compile(&[
        (
            "card",
            r#"(?i)<a[^>]*href="([^"]*/manga/[^"]+)"[^>]*>[\s\S]*?<img[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*>"#,
        ),
        (
            "list-item",
            r#"(?i)<li[^>]*>[\s\S]*?<a[^>]*href="([^"]*/manga/[^"]+)"[^>]*>[\s\S]*?<img[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*>"#,
        ),
        (
            "book-link",
            r#"(?i)<a[^>]*href="([^"]*/manga/[^"]+)"[^>]*class="[^"]*book"[^>]*>[\s\S]*?<img[^>]*src="([^"]*)"[^>]*alt="([^"]*)"[^>]*>"#,
        ),
    ])
});

static AUTHOR_MATCHER: LazyLock<RegexMatcher> = LazyLock::new(|| {
    RegexMatcher::new(
        "author",
        r#"(?i)<span class="detail-info-right-say">[\s\S]*?Author[^<]*<a[^>]*>([^<]+)</a>"#,
    )
    .unwrap()
});

static DESCRIPTION_MATCHERS: LazyLock<Vec<Box<dyn Matcher>>> = LazyLock::new(|| {
    compile(&[
        ("info-content", r#"(?i)<span class="detail-info-content">([\s\S]*?)</span>"#),
        ("info-paragraph", r#"(?i)<p class="detail-info">([\s\S]*?)</p>"#),
    ])
});

// (href, anchor inner markup)
static CHAPTER_MATCHERS: LazyLock<Vec<Box<dyn Matcher>>> = LazyLock::new(|| {
    compile(&[
        (
            "chapter-link",
            r#"(?i)<a[^>]*href="([^"]*/manga/[^"]+/c[0-9]+/[^"]*)"[^>]*>([\s\S]*?)</a>"#,
        ),
        (
            "chapter-list-item",
            r#"(?i)<li[^>]*>[\s\S]*?<a[^>]*href="([^"]*/manga/[^"]+/c[0-9]+/[^"]*)"[^>]*>([\s\S]*?)</a>"#,
        ),
    ])
});

// (src), most specific first
static PAGE_MATCHERS: LazyLock<Vec<Box<dyn Matcher>>> = LazyLock::new(|| {
    compile(&[
        ("manga-page-class", r#"(?i)<img[^>]*src="([^"]*)"[^>]*class="manga-page"[^>]*>"#),
        ("onerror-fallback", r#"(?i)<img[^>]*src="([^"]*)"[^>]*onerror="[^"]*"[^>]*>"#),
        (
            "site-cdn",
            r#"(?i)<img[^>]*src="([^"]*(?:mangahere|fmcdn\.mangahere)[^"]*)"[^>]*>"#,
        ),
        ("any-raster", r#"(?i)<img[^>]*src="([^"]*(?:jpg|jpeg|png|webp)[^"]*)"[^>]*>"#),
    ])
});

/// Build the search page URL for `keyword`
pub fn search_url(base_url: &str, keyword: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &format!("{}/search", base_url.trim_end_matches('/')),
        &[("title", keyword)],
    )?;
    Ok(url.to_string())
}

/// Canonical title page URL, always ending in `/`
pub fn manga_url(base_url: &str, manga: &MangaRef) -> Result<String> {
    let mut url = match manga.href.as_deref().filter(|h| !h.is_empty()) {
        Some(href) => qualify_url(base_url, href),
        None if !manga.id.is_empty() => format!("{}/manga/{}", base_url.trim_end_matches('/'), manga.id),
        None => return Err(ExtractionError::MissingHref),
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    Ok(url)
}

/// Search hits from a results page; every pattern contributes, capped at 50
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<SearchResult> {
    ExtractorChain::new(SOURCE, &SEARCH_MATCHERS, MatchMode::Accumulate)
        .with_limit(MAX_SEARCH_RESULTS)
        .collect(html, |candidate| {
            let href = qualify_url(base_url, candidate.group(0));
            let id = manga_id_from_href(&href)?;
            let result = SearchResult {
                id: id.clone(),
                title: clean_text(candidate.group(2)),
                image: qualify_url(base_url, candidate.group(1)),
                href,
            };
            Some((id, result))
        })
}

pub fn parse_author(html: &str) -> Option<String> {
    AUTHOR_MATCHER
        .first(html)
        .map(|c| collapse_whitespace(c.group(0)))
        .filter(|a| !a.is_empty())
}

/// First description pattern whose cleaned text is non-empty
pub fn parse_description(html: &str) -> Option<String> {
    DESCRIPTION_MATCHERS
        .iter()
        .filter_map(|m| m.first(html))
        .map(|c| clean_text(c.group(0)))
        .find(|d| !d.is_empty())
}

/// Chapter list, deduplicated by id and sorted ascending by number
pub fn parse_chapter_list(html: &str, base_url: &str) -> Vec<Chapter> {
    let mut chapters = ExtractorChain::new(SOURCE, &CHAPTER_MATCHERS, MatchMode::Accumulate)
        .collect(html, |candidate| {
            let href = qualify_url(base_url, candidate.group(0));
            let id = chapter_id_from_href(&href)?;
            let title = clean_text(candidate.group(1));
            let chapter_number = parse_chapter_number(&title, &id);
            let title = if title.is_empty() {
                format!("Chapter {}", chapter_number)
            } else {
                title
            };
            let chapter = Chapter {
                id: id.clone(),
                title,
                chapter_number,
                href,
            };
            Some((id, chapter))
        });

    chapters.sort_by(|a, b| a.chapter_number.total_cmp(&b.chapter_number));
    chapters
}

/// Details page applied on top of the caller's reference
pub fn parse_manga_details(html: &str, base_url: &str, manga: &MangaRef) -> MangaDetails {
    let mut details = MangaDetails::fallback(manga);
    if let Some(author) = parse_author(html) {
        details.manga.author = Some(author);
    }
    if let Some(description) = parse_description(html) {
        details.manga.description = Some(description);
    }
    details.chapters = parse_chapter_list(html, base_url);
    details
}

/// Page images from a reader page.
///
/// Matchers run in priority order and the first one that yields a usable
/// image wins, even if it found fewer images than a broader matcher would.
pub fn parse_chapter_pages(html: &str, base_url: &str) -> Vec<Page> {
    ExtractorChain::new(SOURCE, &PAGE_MATCHERS, MatchMode::FirstHit)
        .with_limit(MAX_PAGES)
        .collect(html, |candidate| {
            let src = candidate.group(0);
            is_page_image(src).then(|| (src, qualify_url(base_url, src)))
        })
        .into_iter()
        .zip(1..)
        .map(|(url, page_number)| Page { url, page_number })
        .collect()
}

async fn try_search_manga<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    keyword: &str,
) -> Result<Vec<SearchResult>> {
    let url = search_url(base_url, keyword)?;
    let html = fetcher.fetch_text(&url, &request_headers()).await?;
    Ok(parse_search_results(&html, base_url))
}

async fn try_get_manga_details<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    manga: &MangaRef,
) -> Result<MangaDetails> {
    let url = manga_url(base_url, manga)?;
    let html = fetcher.fetch_text(&url, &request_headers()).await?;
    Ok(parse_manga_details(&html, base_url, manga))
}

async fn try_get_chapter_pages<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    chapter: &ChapterRef,
) -> Result<Vec<Page>> {
    let href = chapter
        .href
        .as_deref()
        .filter(|h| !h.is_empty())
        .ok_or(ExtractionError::MissingHref)?;
    let url = qualify_url(base_url, href);
    let html = fetcher.fetch_text(&url, &request_headers()).await?;
    Ok(parse_chapter_pages(&html, base_url))
}

/// Search by keyword. Empty on any failure.
pub async fn search_manga_base<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    keyword: &str,
) -> Vec<SearchResult> {
    match try_search_manga(fetcher, base_url, keyword).await {
        Ok(results) => {
            if results.is_empty() {
                log::warn!("{}: no search results for {:?}", SOURCE, keyword);
            } else {
                log::info!("{}: found {} result(s) for {:?}", SOURCE, results.len(), keyword);
            }
            results
        }
        Err(e) => {
            log::error!("{}: search for {:?} failed: {}", SOURCE, keyword, e);
            Vec::new()
        }
    }
}

/// Enrich `manga` with author, description and chapters.
/// On failure the input comes back with no chapters.
pub async fn get_manga_details_base<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    manga: &MangaRef,
) -> MangaDetails {
    match try_get_manga_details(fetcher, base_url, manga).await {
        Ok(details) => {
            if details.chapters.is_empty() {
                log::warn!("{}: no chapters found for {}", SOURCE, manga.id);
            } else {
                log::info!("{}: found {} chapter(s) for {}", SOURCE, details.chapters.len(), manga.id);
            }
            details
        }
        Err(e) => {
            log::error!("{}: details for {} failed: {}", SOURCE, manga.id, e);
            MangaDetails::fallback(manga)
        }
    }
}

/// Page images of a chapter. Empty on any failure.
pub async fn get_chapter_pages_base<F: PageFetcher + ?Sized>(
    fetcher: &F,
    base_url: &str,
    chapter: &ChapterRef,
) -> Vec<Page> {
    let label = chapter.resolved_id().unwrap_or_else(|| "?".to_string());
    match try_get_chapter_pages(fetcher, base_url, chapter).await {
        Ok(pages) => {
            if pages.is_empty() {
                log::warn!("{}: no page images found for chapter {}", SOURCE, label);
            } else {
                log::info!("{}: found {} page(s) for chapter {}", SOURCE, pages.len(), label);
            }
            pages
        }
        Err(e) => {
            log::error!("{}: pages for chapter {} failed: {}", SOURCE, label, e);
            Vec::new()
        }
    }
}

/// MangaHere source bound to a fetcher and a site origin
pub struct MangaHere<F = HttpFetcher> {
    fetcher: F,
    base_url: String,
}

impl MangaHere<HttpFetcher> {
    /// Source on the public site with the default HTTP client
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> MangaHere<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point at another origin, e.g. a mirror. Any path on it is ignored
    /// when hrefs are resolved.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn search_manga(&self, keyword: &str) -> Vec<SearchResult> {
        search_manga_base(&self.fetcher, &self.base_url, keyword).await
    }

    pub async fn get_manga_details(&self, manga: &MangaRef) -> MangaDetails {
        get_manga_details_base(&self.fetcher, &self.base_url, manga).await
    }

    pub async fn get_chapter_pages(&self, chapter: &ChapterRef) -> Vec<Page> {
        get_chapter_pages_base(&self.fetcher, &self.base_url, chapter).await
    }
}
