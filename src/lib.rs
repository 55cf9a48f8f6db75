// Library interface for the MangaHere source
// Hosts call the three operations on `MangaHere`; the free functions in
// `sources::mangahere` accept any `PageFetcher` and base URL.

pub mod config;
pub mod error;
pub mod helpers;
pub mod http_client;
pub mod matchers;
pub mod models;
pub mod sources;

pub use error::{ExtractionError, Result};
pub use http_client::{HttpFetcher, PageFetcher, USER_AGENT};
pub use models::{Chapter, ChapterRef, MangaDetails, MangaRef, Page, SearchResult};
pub use sources::mangahere::{MangaHere, BASE_URL};
