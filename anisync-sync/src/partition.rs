//! Season partitions synced on every cycle.

use anisync_anilist::{Season, SeasonQuery};
use chrono::Datelike;

/// How many years before the current one are synced.
pub const YEARS_BACK: i32 = 3;
/// How many years after the current one are synced.
pub const YEARS_AHEAD: i32 = 1;

/// The local wall-clock year.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Every (year, season) scope for a cycle, year ascending then season in
/// declaration order. Adult titles are never requested.
pub fn enumerate_partitions(current_year: i32) -> Vec<SeasonQuery> {
    (current_year - YEARS_BACK..=current_year + YEARS_AHEAD)
        .flat_map(|year| {
            Season::ALL.into_iter().map(move |season| SeasonQuery {
                season,
                season_year: year,
                is_adult: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_twenty_partitions() {
        let partitions = enumerate_partitions(2026);
        assert_eq!(partitions.len(), 20);
        assert!(partitions.iter().all(|p| !p.is_adult));
    }

    #[test]
    fn spans_three_back_one_ahead() {
        let partitions = enumerate_partitions(2026);
        assert_eq!(partitions.first().unwrap().season_year, 2023);
        assert_eq!(partitions.last().unwrap().season_year, 2027);
    }

    #[test]
    fn orders_by_year_then_season() {
        let partitions = enumerate_partitions(2000);
        let first_year: Vec<_> = partitions[..4].iter().map(|p| p.season).collect();
        assert_eq!(first_year, Season::ALL.to_vec());
        assert!(partitions.windows(2).all(|w| w[0].season_year <= w[1].season_year));
        assert_eq!(
            partitions[4],
            SeasonQuery {
                season: Season::Spring,
                season_year: 1998,
                is_adult: false,
            }
        );
    }
}
