//! The season page query and its request body.

use serde::Serialize;

use crate::types::{PageRequest, Season, SeasonQuery};

/// Fetches one page of non-adult (or adult) anime for a season.
pub const SEASON_PAGE_QUERY: &str = r#"query ($pageNo: Int, $perPage: Int, $season: MediaSeason, $seasonYear: Int, $isAdult: Boolean) {
  Page(page: $pageNo, perPage: $perPage) {
    pageInfo {
      total
      currentPage
      lastPage
      hasNextPage
      perPage
    }
    media(season: $season, seasonYear: $seasonYear, isAdult: $isAdult) {
      id
      title {
        romaji
        english
        native
        userPreferred
      }
      synonyms
      startDate {
        year
        month
        day
      }
      genres
    }
  }
}"#;

/// JSON body POSTed to the GraphQL endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPageVariables {
    pub page_no: u32,
    pub per_page: u32,
    pub season: Season,
    pub season_year: i32,
    pub is_adult: bool,
}

/// Build the request body for one page of a season.
pub fn season_page_request(
    query: &SeasonQuery,
    request: PageRequest,
) -> GraphQlRequest<'static, SeasonPageVariables> {
    GraphQlRequest {
        query: SEASON_PAGE_QUERY,
        variables: SeasonPageVariables {
            page_no: request.page,
            per_page: request.per_page,
            season: query.season,
            season_year: query.season_year,
            is_adult: query.is_adult,
        },
    }
}
