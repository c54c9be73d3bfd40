use log::debug;

use crate::config::{CityResults, SummaryStats};

/// Aggregated figures over all the constituencies.
///
/// The average number of votes per city is rounded to the nearest integer,
/// halves rounding up. The total saturates at `u64::MAX`.
pub fn summarize(results: &CityResults) -> SummaryStats {
    let city_count = results.len();
    let total_votes = results
        .cities()
        .iter()
        .fold(0u64, |acc, (_, t)| acc.saturating_add(t.total()));
    let avg_votes = if city_count > 0 {
        let n = city_count as u64;
        let rem = total_votes % n;
        total_votes / n + u64::from(rem >= n - rem)
    } else {
        0
    };
    debug!(
        "summarize: {} cities, {} votes, {} on average",
        city_count, total_votes, avg_votes
    );
    SummaryStats {
        city_count,
        total_votes,
        avg_votes,
    }
}
