use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::config::{Candidate, CityResults, ConstituencyError};

lazy_static! {
    static ref SAINT_RX: Regex = Regex::new(r"(?-u:\b)(st|saint)(?-u:\b)").unwrap();
    static ref SPACES_RX: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_LETTER_RX: Regex = Regex::new(r"[^a-z\s]").unwrap();
}

/// Canonical form of a city name, used to compare the city of a voter with
/// the city of a candidate.
///
/// The steps are applied in order: trimming, lowercasing, folding `saint`
/// into `st`, collapsing whitespace and finally dropping everything that is
/// not a lowercase ASCII letter or a space. Punctuation is dropped after the
/// whitespace is collapsed, so `"a - b"` keeps two spaces.
pub fn normalize_city(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };
    let lower = raw.trim().to_lowercase();
    let saints = SAINT_RX.replace_all(&lower, "st");
    let spaced = SPACES_RX.replace_all(&saints, " ");
    NON_LETTER_RX.replace_all(&spaced, "").into_owned()
}

/// The candidates standing in the constituency of a voter.
///
/// Returns an error if the city of the voter normalizes to nothing. An empty
/// list is a valid answer: no candidate is registered in that city.
pub fn candidates_for_city<'a>(
    candidates: &'a [Candidate],
    voter_city: Option<&str>,
) -> Result<Vec<&'a Candidate>, ConstituencyError> {
    let city = normalize_city(voter_city);
    if city.is_empty() {
        return Err(ConstituencyError::MissingCity);
    }
    let res: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| normalize_city(c.city.as_deref()) == city)
        .collect();
    debug!(
        "candidates_for_city: {:?}: {} of {} candidates",
        city,
        res.len(),
        candidates.len()
    );
    Ok(res)
}

/// Keeps the cities whose name contains the search term, ignoring case.
/// A blank term keeps everything. Otherwise the term is matched as typed,
/// surrounding spaces included.
pub fn filter_cities(results: &CityResults, term: &str) -> CityResults {
    if term.trim().is_empty() {
        return results.clone();
    }
    let term = term.to_lowercase();
    results
        .cities()
        .iter()
        .filter(|(city, _)| city.to_lowercase().contains(&term))
        .map(|(city, tally)| (city.as_str(), tally.clone()))
        .collect()
}
