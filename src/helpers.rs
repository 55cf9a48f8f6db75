//! Normalization helpers shared by the extractors
//!
//! - URL qualification against the site origin
//! - Markup stripping and whitespace collapsing for captured text
//! - Identity derivation from hrefs (manga slug, chapter id)
//! - Chapter number parsing
//! - Page image filtering
//!
//! # Examples
//!
//! ```
//! use mangahere_source::helpers::{chapter_id_from_href, parse_chapter_number, qualify_url};
//!
//! let href = qualify_url("https://www.mangahere.cc", "/manga/onepunch_man/c217/1.html");
//! assert_eq!(href, "https://www.mangahere.cc/manga/onepunch_man/c217/1.html");
//! assert_eq!(chapter_id_from_href(&href).as_deref(), Some("217"));
//! assert_eq!(parse_chapter_number("Ch.217 - The Hero", "217"), 217.0);
//! ```

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use url::Url;

static MANGA_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/manga/([^/]+)").unwrap());
static CHAPTER_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/c([0-9]+)/").unwrap());
// "Chapter 12.5", "Ch.217", "c001"
static CHAPTER_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bc(?:h(?:apter)?)?\.?\s*([0-9]+(?:\.[0-9]+)?)").unwrap());

/// Substrings marking site chrome rather than page scans
const NON_CONTENT_MARKERS: &[&str] = &["logo", "button", "icon", "ad."];

/// Sources shorter than this are icons or spacers
const MIN_IMAGE_SRC_LEN: usize = 20;

/// Make `raw` absolute against `base_url`.
///
/// Anything already starting with `http` is returned untouched, so qualifying
/// twice is the same as qualifying once. Root-relative and protocol-relative
/// references are resolved with URL join semantics.
pub fn qualify_url(base_url: &str, raw: &str) -> String {
    if raw.starts_with("http") {
        return raw.to_string();
    }
    match Url::parse(base_url).and_then(|base| base.join(raw)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", base_url.trim_end_matches('/'), raw),
    }
}

/// Collapse every whitespace run to one space and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop embedded tags, decode entities, collapse whitespace.
///
/// Text nodes are joined with a space so sibling blocks
/// (`<p>Ch.2</p><p>Oct 5</p>`) do not run together.
pub fn clean_text(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return collapse_whitespace(fragment);
    }
    let parsed = Html::parse_fragment(fragment);
    let text = parsed.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&text)
}

/// Slug after `/manga/` in an href, e.g. `onepunch_man`
pub fn manga_id_from_href(href: &str) -> Option<String> {
    MANGA_ID_PATTERN
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Digits of the `/c<digits>/` segment in a chapter href
pub fn chapter_id_from_href(href: &str) -> Option<String> {
    CHAPTER_ID_PATTERN
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Chapter number from the visible title, else from the chapter id
pub fn parse_chapter_number(title: &str, chapter_id: &str) -> f64 {
    CHAPTER_NUMBER_PATTERN
        .captures(title)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or_else(|| chapter_id.parse::<f64>().unwrap_or_default())
}

/// Whether an `<img>` source looks like a page scan
pub fn is_page_image(src: &str) -> bool {
    if src.chars().count() < MIN_IMAGE_SRC_LEN {
        return false;
    }
    !NON_CONTENT_MARKERS.iter().any(|marker| src.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.mangahere.cc";

    #[test]
    fn test_qualify_relative_path() {
        assert_eq!(
            qualify_url(BASE, "/manga/onepunch_man/"),
            "https://www.mangahere.cc/manga/onepunch_man/"
        );
    }

    #[test]
    fn test_qualify_is_idempotent() {
        let once = qualify_url(BASE, "/manga/onepunch_man/c217/1.html");
        let twice = qualify_url(BASE, &once);
        assert_eq!(once, twice);
        assert_eq!(once.matches("mangahere.cc").count(), 1);
    }

    #[test]
    fn test_qualify_protocol_relative_uses_base_scheme() {
        assert_eq!(
            qualify_url(BASE, "//fmcdn.mangahere.com/store/manga/1/cover.jpg"),
            "https://fmcdn.mangahere.com/store/manga/1/cover.jpg"
        );
    }

    #[test]
    fn test_qualify_keeps_absolute() {
        let url = "https://zjcdn.mangahere.org/store/manga/11362/01-217.0/compressed/q001.jpg";
        assert_eq!(qualify_url(BASE, url), url);
    }

    #[test]
    fn test_clean_text_strips_markup_and_entities() {
        assert_eq!(
            clean_text("  Saitama is a <b>hero</b>\n  for fun &amp; <a href=\"#\">profit</a> "),
            "Saitama is a hero for fun & profit"
        );
        assert_eq!(clean_text("One   Punch\tMan"), "One Punch Man");
        assert_eq!(clean_text("<br/>  "), "");
    }

    #[test]
    fn test_clean_text_separates_nested_blocks() {
        let inner = r#"
            <div><p class="title3">Ch.002 - B</p><p class="title2">Oct 5,2023</p></div>
        "#;
        assert_eq!(clean_text(inner), "Ch.002 - B Oct 5,2023");
    }

    #[test]
    fn test_manga_id_from_href() {
        assert_eq!(
            manga_id_from_href("https://www.mangahere.cc/manga/onepunch_man/").as_deref(),
            Some("onepunch_man")
        );
        assert_eq!(manga_id_from_href("https://www.mangahere.cc/search?title=x"), None);
    }

    #[test]
    fn test_chapter_id_from_href() {
        assert_eq!(chapter_id_from_href("/manga/onepunch_man/c217/1.html").as_deref(), Some("217"));
        assert_eq!(chapter_id_from_href("/manga/x/v01/c001/1.html").as_deref(), Some("001"));
        assert_eq!(chapter_id_from_href("/manga/onepunch_man/"), None);
    }

    #[test]
    fn test_chapter_ids_are_ascii_digits_only() {
        assert_eq!(chapter_id_from_href("/manga/x/c１２/1.html"), None);
        assert_eq!(parse_chapter_number("Ch.１２", "12"), 12.0);
    }

    #[test]
    fn test_parse_chapter_number_variants() {
        assert_eq!(parse_chapter_number("Chapter 12.5", "12"), 12.5);
        assert_eq!(parse_chapter_number("Ch.217 - The Hero", "999"), 217.0);
        assert_eq!(parse_chapter_number("Vol.01 Ch.003", "3"), 3.0);
        assert_eq!(parse_chapter_number("c045", "1"), 45.0);
    }

    #[test]
    fn test_parse_chapter_number_falls_back_to_id() {
        assert_eq!(parse_chapter_number("The Hero Returns", "217"), 217.0);
        assert_eq!(parse_chapter_number("Epic 3", "8"), 8.0);
        assert_eq!(parse_chapter_number("", "001"), 1.0);
    }

    #[test]
    fn test_is_page_image() {
        assert!(is_page_image("//zjcdn.mangahere.org/store/manga/1/q001.jpg"));
        assert!(!is_page_image("/img/a.png"));
        assert!(!is_page_image("https://www.mangahere.cc/media/images/logo.png"));
        assert!(!is_page_image("https://www.mangahere.cc/media/images/button_next.png"));
        assert!(!is_page_image("https://static.example.com/favicon-icon-32.png"));
        assert!(!is_page_image("https://cdn.example.com/ad.banner/728x90.jpg"));
    }
}
