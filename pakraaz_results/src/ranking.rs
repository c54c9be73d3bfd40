use log::debug;

use crate::config::{RankedEntry, Ranking, TieBreakMode, VoteTally};

/// Ranks the candidates of a tally by decreasing number of votes.
///
/// The winner is the first candidate of the ranking and the loser the last
/// one. When the tally holds a single candidate, it is both the winner and
/// the loser. An empty tally has neither.
///
/// ```
/// use pakraaz_results::*;
///
/// let tally: VoteTally = vec![("A", 10), ("B", 30), ("C", 30)].into_iter().collect();
/// let ranking = rank(&tally, TieBreakMode::InputOrder);
/// assert_eq!(ranking.winner.as_deref(), Some("B"));
/// assert_eq!(ranking.loser.as_deref(), Some("A"));
/// ```
pub fn rank(tally: &VoteTally, tiebreak: TieBreakMode) -> Ranking {
    let mut sorted: Vec<&(String, u64)> = tally.entries().iter().collect();
    // The sort is stable: under InputOrder, equal counts keep the tally order.
    match tiebreak {
        TieBreakMode::InputOrder => sorted.sort_by(|a, b| b.1.cmp(&a.1)),
        TieBreakMode::Alphabetical => sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0))),
    }
    debug!("rank: sorted tally ({:?}): {:?}", tiebreak, sorted);

    let ranked: Vec<RankedEntry> = sorted
        .iter()
        .map(|(name, count)| RankedEntry {
            candidate_name: name.clone(),
            vote_count: *count,
        })
        .collect();
    Ranking {
        winner: ranked.first().map(|e| e.candidate_name.clone()),
        loser: ranked.last().map(|e| e.candidate_name.clone()),
        ranked,
    }
}

/// The share of the votes received by an entry, in percent, rounded to one decimal.
pub fn percentage(entry: &RankedEntry, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (entry.vote_count as f64 * 1000.0 / total as f64).round() / 10.0
}

impl Ranking {
    /// True if the first two candidates received the same number of votes,
    /// in which case the winner was picked by the tie break.
    pub fn is_tied(&self) -> bool {
        match self.ranked.as_slice() {
            [first, second, ..] => first.vote_count == second.vote_count,
            _ => false,
        }
    }

    pub fn total_votes(&self) -> u64 {
        self.ranked
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.vote_count))
    }
}
