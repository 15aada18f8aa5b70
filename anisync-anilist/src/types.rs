use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level GraphQL response wrapper. AniList returns `data: null` together
/// with an `errors` array when a query is rejected.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: Page,
}

/// One page of a season query.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_info: PageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<MediaItem>,
}

impl Page {
    /// True when this page reports nothing past itself. A failed or empty
    /// page (`lastPage` 0) is always last.
    pub fn is_last(&self) -> bool {
        self.page_info.current_page >= self.page_info.last_page
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub per_page: u32,
}

/// A single media entry as AniList reports it.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: MediaTitle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: FuzzyDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaTitle {
    #[serde(default)]
    pub romaji: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
    #[serde(default)]
    pub user_preferred: Option<String>,
}

impl MediaTitle {
    /// The title shown for a media row: English when it has any non-whitespace
    /// content, otherwise the user-preferred title.
    pub fn display_title(&self) -> &str {
        non_blank(self.english.as_deref())
            .or_else(|| non_blank(self.user_preferred.as_deref()))
            .unwrap_or("")
    }

    /// English, native and romaji titles, trimmed, in that order. Blank
    /// variants are dropped; equal variants are kept.
    pub fn variants(&self) -> Vec<&str> {
        [&self.english, &self.native, &self.romaji]
            .into_iter()
            .filter_map(|t| non_blank(t.as_deref()))
            .collect()
    }
}

/// AniList's partial date. Any component may be missing.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// Resolve to a calendar date, defaulting a missing or zero month/day to 1.
    ///
    /// Returns `None` when there is no year or the components do not form a
    /// valid date.
    pub fn normalized(&self) -> Option<NaiveDate> {
        let year = self.year?;
        let month = self.month.filter(|&m| m != 0).unwrap_or(1);
        let day = self.day.filter(|&d| d != 0).unwrap_or(1);
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// AniList `MediaSeason` enum values.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Every season, in the order partitions are synced.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
            Self::Winter => "WINTER",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of one paginated season query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeasonQuery {
    pub season: Season,
    pub season_year: i32,
    pub is_adult: bool,
}

impl std::fmt::Display for SeasonQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.season, self.season_year)?;
        if self.is_adult {
            f.write_str(" (adult)")?;
        }
        Ok(())
    }
}

/// Which page to fetch and how large pages are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
