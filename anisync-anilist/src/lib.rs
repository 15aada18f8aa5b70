//! AniList GraphQL client for seasonal anime catalog pages.

pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::{ANILIST_ENDPOINT, AniListClient, ClientSettings, MAX_PER_PAGE, parse_page_response};
pub use error::FetchError;
pub use query::{SEASON_PAGE_QUERY, season_page_request};
pub use types::{
    FuzzyDate, MediaItem, MediaTitle, Page, PageInfo, PageRequest, Season, SeasonQuery,
};
