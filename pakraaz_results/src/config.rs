// ********* Input data structures ***********

use std::error::Error;
use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// The votes received by each candidate of one constituency.
///
/// The entries keep the order in which they were provided (for the API
/// responses, the order of the keys in the JSON object). This order is used
/// to break ties under [`TieBreakMode::InputOrder`]. A tally read from a
/// `serde_json::Value` keeps the order of that value's map, which is why
/// `serde_json` is built with its `preserve_order` feature.
///
/// Counts are unsigned, so a tally can never hold a negative count.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VoteTally {
    entries: Vec<(String, u64)>,
}

impl VoteTally {
    pub fn new() -> VoteTally {
        VoteTally::default()
    }

    /// Sets the count of a candidate.
    ///
    /// A candidate that is already present keeps its position and gets the new count.
    pub fn insert(&mut self, candidate: &str, count: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == candidate) {
            entry.1 = count;
        } else {
            self.entries.push((candidate.to_string(), count));
        }
    }

    pub fn get(&self, candidate: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == candidate)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of votes cast in this constituency, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count))
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for VoteTally {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut tally = VoteTally::new();
        for (name, count) in iter {
            tally.insert(name.as_ref(), count);
        }
        tally
    }
}

/// The tallies of all the constituencies, keyed by city name.
///
/// Invariant: city names are unique and never empty.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CityResults {
    cities: Vec<(String, VoteTally)>,
}

impl CityResults {
    pub fn new() -> CityResults {
        CityResults::default()
    }

    /// Adds or replaces the tally of a city. Empty city names are ignored.
    pub fn insert(&mut self, city: &str, tally: VoteTally) {
        if city.is_empty() {
            return;
        }
        if let Some(entry) = self.cities.iter_mut().find(|(name, _)| name == city) {
            entry.1 = tally;
        } else {
            self.cities.push((city.to_string(), tally));
        }
    }

    pub fn get(&self, city: &str) -> Option<&VoteTally> {
        self.cities
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, tally)| tally)
    }

    pub fn cities(&self) -> &[(String, VoteTally)] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, VoteTally)> for CityResults {
    fn from_iter<I: IntoIterator<Item = (S, VoteTally)>>(iter: I) -> Self {
        let mut results = CityResults::new();
        for (city, tally) in iter {
            results.insert(city.as_ref(), tally);
        }
        results
    }
}

/// A feedback message, as listed by the feedback endpoint.
///
/// The listing may carry the text as `message` or `feedback` and the date as
/// `timestamp` or `submittedAt`, sometimes both. `message` and `timestamp` win
/// when both are set.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FeedbackFields")]
pub struct FeedbackRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Absent or empty for anonymous feedback.
    #[serde(rename = "voterID", skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub message: String,
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
}

/// The fields of a feedback entry as they appear on the wire.
#[derive(Deserialize)]
struct FeedbackFields {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(rename = "voterID")]
    voter_id: Option<String>,
    name: Option<String>,
    city: Option<String>,
    message: Option<String>,
    feedback: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "submittedAt")]
    submitted_at: Option<DateTime<Utc>>,
}

impl TryFrom<FeedbackFields> for FeedbackRecord {
    type Error = String;

    fn try_from(fields: FeedbackFields) -> Result<Self, Self::Error> {
        let message = match (fields.message, fields.feedback) {
            (Some(m), _) if !m.is_empty() => m,
            (_, Some(f)) => f,
            (Some(m), None) => m,
            (None, None) => return Err(format!("feedback {} has no message", fields.id)),
        };
        let submitted_at = fields
            .timestamp
            .or(fields.submitted_at)
            .ok_or_else(|| format!("feedback {} has no submission date", fields.id))?;
        Ok(FeedbackRecord {
            id: fields.id,
            voter_id: fields.voter_id,
            name: fields.name,
            city: fields.city,
            message,
            submitted_at,
        })
    }
}

impl FeedbackRecord {
    pub fn is_anonymous(&self) -> bool {
        self.voter_id.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub party: Option<String>,
    pub symbol: Option<String>,
    pub city: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoterProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "voterID", alias = "voterId")]
    pub voter_id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub candidate_name: String,
    pub vote_count: u64,
}

/// The outcome of ranking one tally.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Ranking {
    pub winner: Option<String>,
    pub loser: Option<String>,
    /// All the entries, by decreasing number of votes.
    pub ranked: Vec<RankedEntry>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub city_count: usize,
    pub total_votes: u64,
    pub avg_votes: u64,
}

/// The counters shown on the feedback dashboard.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    pub with_id: usize,
    pub anonymous: usize,
    pub recent: usize,
}

/// A feedback message that passed the submission checks.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct FeedbackSubmission {
    pub feedback: String,
    #[serde(rename = "voterID")]
    pub voter_id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub date: DateTime<Utc>,
}

/// Errors raised when matching a voter to a constituency.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ConstituencyError {
    /// The voter profile does not carry a usable city.
    MissingCity,
}

impl Error for ConstituencyError {}

impl Display for ConstituencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstituencyError::MissingCity => {
                write!(f, "the voter profile does not have a city specified")
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FeedbackError {
    EmptyMessage,
}

impl Error for FeedbackError {}

impl Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::EmptyMessage => write!(f, "feedback cannot be empty"),
        }
    }
}

// ********* Configuration **********

/// How candidates with the same number of votes are ordered.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum TieBreakMode {
    /// Keep the order of the tally.
    #[default]
    InputOrder,
    /// Order by candidate name.
    Alphabetical,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum FeedbackFilterMode {
    #[default]
    All,
    WithId,
    Anonymous,
    /// Submitted during the last [`RECENT_WINDOW_DAYS`] days.
    Recent,
}

impl FeedbackFilterMode {
    /// Reads a filter name as used by the dashboards.
    ///
    /// Unknown names select all the feedback.
    pub fn parse(mode: &str) -> FeedbackFilterMode {
        match mode {
            "all" => FeedbackFilterMode::All,
            "withID" => FeedbackFilterMode::WithId,
            "anonymous" => FeedbackFilterMode::Anonymous,
            "recent" => FeedbackFilterMode::Recent,
            x => {
                log::warn!("Unknown feedback filter {:?}, showing all the feedback", x);
                FeedbackFilterMode::All
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeedbackFilterMode::All => "all",
            FeedbackFilterMode::WithId => "withID",
            FeedbackFilterMode::Anonymous => "anonymous",
            FeedbackFilterMode::Recent => "recent",
        }
    }
}

pub const RECENT_WINDOW_DAYS: i64 = 7;

// ********* Serialization of the tallies **********

impl Serialize for VoteTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in self.entries.iter() {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl Serialize for CityResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cities.len()))?;
        for (city, tally) in self.cities.iter() {
            map.serialize_entry(city, tally)?;
        }
        map.end()
    }
}

struct TallyVisitor;

impl<'de> Visitor<'de> for TallyVisitor {
    type Value = VoteTally;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from candidate names to non-negative vote counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<VoteTally, A::Error> {
        let mut entries: Vec<(String, u64)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            if entries.iter().any(|(n, _)| *n == name) {
                return Err(de::Error::custom(format!("duplicate candidate {:?}", name)));
            }
            entries.push((name, count));
        }
        Ok(VoteTally { entries })
    }
}

impl<'de> Deserialize<'de> for VoteTally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TallyVisitor)
    }
}

struct CityResultsVisitor;

impl<'de> Visitor<'de> for CityResultsVisitor {
    type Value = CityResults;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from city names to vote tallies")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CityResults, A::Error> {
        let mut cities: Vec<(String, VoteTally)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((city, tally)) = access.next_entry::<String, VoteTally>()? {
            if city.is_empty() {
                return Err(de::Error::custom("empty city name"));
            }
            if cities.iter().any(|(c, _)| *c == city) {
                return Err(de::Error::custom(format!("duplicate city {:?}", city)));
            }
            cities.push((city, tally));
        }
        Ok(CityResults { cities })
    }
}

impl<'de> Deserialize<'de> for CityResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CityResultsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tally_keeps_document_order() {
        let tally: VoteTally =
            serde_json::from_str(r#"{"Zafar": 3, "Ahmed": 5, "Mehwish": 1}"#).unwrap();
        let names: Vec<&str> = tally.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zafar", "Ahmed", "Mehwish"]);
        assert_eq!(tally.total(), 9);
        assert_eq!(tally.get("Ahmed"), Some(5));
    }

    #[test]
    fn tally_keeps_value_order() {
        let results: CityResults = serde_json::from_value(json!({
            "Karachi": {"Hina Raza": 30, "Bilal Shah": 30},
            "Hyderabad": {"Zubair": 1}
        }))
        .unwrap();
        let cities: Vec<&str> = results.cities().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(cities, vec!["Karachi", "Hyderabad"]);
        let karachi = results.get("Karachi").unwrap();
        let names: Vec<&str> = karachi.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Hina Raza", "Bilal Shah"]);
    }

    #[test]
    fn total_saturates() {
        let tally: VoteTally = vec![("A", u64::MAX - 1), ("B", u64::MAX - 1)].into_iter().collect();
        assert_eq!(tally.total(), u64::MAX);
    }

    #[test]
    fn tally_rejects_bad_counts() {
        assert!(serde_json::from_value::<VoteTally>(json!({"A": -1})).is_err());
        assert!(serde_json::from_value::<VoteTally>(json!({"A": 1.5})).is_err());
        assert!(serde_json::from_value::<VoteTally>(json!({"A": "12"})).is_err());
        assert!(serde_json::from_str::<VoteTally>(r#"{"A": 1, "A": 2}"#).is_err());
    }

    #[test]
    fn city_results_reject_empty_city() {
        let res = serde_json::from_value::<CityResults>(json!({"": {"A": 1}}));
        assert!(res.is_err());
    }

    #[test]
    fn city_results_serialize_back() {
        let js = json!({"Lahore": {"A": 100, "B": 50}, "Karachi": {"C": 70}});
        let results: CityResults = serde_json::from_value(js.clone()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(serde_json::to_value(&results).unwrap(), js);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut tally: VoteTally = vec![("A", 1), ("B", 2)].into_iter().collect();
        tally.insert("A", 7);
        assert_eq!(tally.entries()[0], ("A".to_string(), 7));
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn feedback_record_field_names() {
        let fb: FeedbackRecord = serde_json::from_value(json!({
            "_id": "f1",
            "voterID": "35202-1234567-1",
            "name": "Ayesha",
            "city": "Lahore",
            "feedback": "Queue was long",
            "timestamp": "2024-02-08T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(fb.message, "Queue was long");
        assert!(!fb.is_anonymous());

        let anon: FeedbackRecord = serde_json::from_value(json!({
            "id": "f2",
            "voterID": "",
            "message": "ok",
            "submittedAt": "2024-02-08T09:30:00.000Z"
        }))
        .unwrap();
        assert!(anon.is_anonymous());
        assert_eq!(anon.name, None);
    }

    #[test]
    fn feedback_record_with_both_names() {
        let fb: FeedbackRecord = serde_json::from_str(
            r#"{"_id": "f3", "message": "Ink ran out", "feedback": "old text",
                "submittedAt": "2024-02-01T00:00:00Z", "timestamp": "2024-02-08T09:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(fb.message, "Ink ran out");
        assert_eq!(fb.submitted_at.to_rfc3339(), "2024-02-08T09:30:00+00:00");

        let fb: FeedbackRecord = serde_json::from_value(json!({
            "_id": "f4",
            "message": "",
            "feedback": "Staff was helpful",
            "submittedAt": "2024-02-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(fb.message, "Staff was helpful");

        assert!(serde_json::from_value::<FeedbackRecord>(json!({
            "_id": "f5",
            "submittedAt": "2024-02-01T00:00:00Z"
        }))
        .is_err());
        assert!(
            serde_json::from_value::<FeedbackRecord>(json!({"_id": "f6", "message": "hi"}))
                .is_err()
        );
    }

    #[test]
    fn filter_mode_names() {
        assert_eq!(FeedbackFilterMode::parse("withID"), FeedbackFilterMode::WithId);
        assert_eq!(FeedbackFilterMode::parse("recent"), FeedbackFilterMode::Recent);
        assert_eq!(FeedbackFilterMode::parse("WITHID"), FeedbackFilterMode::All);
        assert_eq!(FeedbackFilterMode::parse(""), FeedbackFilterMode::All);
        for mode in [
            FeedbackFilterMode::All,
            FeedbackFilterMode::WithId,
            FeedbackFilterMode::Anonymous,
            FeedbackFilterMode::Recent,
        ] {
            assert_eq!(FeedbackFilterMode::parse(mode.name()), mode);
        }
    }
}
