use mangahere_source::config::Config;
use mangahere_source::models::{ChapterRef, MangaRef};

#[tokio::main]
async fn main() {
    env_logger::init();

    let keyword = std::env::args().nth(1).unwrap_or_else(|| "onepunch".to_string());
    let config = Config::load();
    let source = match config.mangahere.create_source() {
        Ok(source) => source,
        Err(e) => {
            println!("✗ Could not build source: {}", e);
            return;
        }
    };

    println!("Testing MangaHere source against {}...\n", source.base_url());

    println!("=== Testing search_manga({:?}) ===", keyword);
    let results = source.search_manga(&keyword).await;
    println!("✓ Found {} manga", results.len());
    for result in results.iter().take(3) {
        println!("  - {} [{}] ({})", result.title, result.id, result.href);
    }

    let Some(first) = results.into_iter().next() else {
        return;
    };

    println!("\n=== Testing get_manga_details for: {} ===", first.title);
    let details = source.get_manga_details(&MangaRef::from(first)).await;
    println!("  Author: {}", details.author().unwrap_or("-"));
    println!("✓ Found {} chapters", details.chapters.len());
    if let (Some(first), Some(last)) = (details.chapters.first(), details.chapters.last()) {
        println!("  First: {} ({})", first.title, first.chapter_number);
        println!("  Last: {} ({})", last.title, last.chapter_number);
    }

    let Some(latest) = details.chapters.last() else {
        return;
    };

    println!("\n=== Testing get_chapter_pages for: {} ===", latest.title);
    let pages = source.get_chapter_pages(&ChapterRef::from(latest)).await;
    println!("✓ Found {} pages", pages.len());
    for page in pages.iter().take(3) {
        println!("  {:>3}: {}", page.page_number, page.url);
    }
}
