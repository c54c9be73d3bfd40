// Readers for the responses of the voting API.
//
// Each endpoint has exactly one accepted shape. The library only sees the
// values once they went through these functions.

use crate::pakraaz::*;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `/api/vote/results/allcities`
#[derive(Debug, Deserialize)]
struct ResultsResponse {
    success: bool,
    data: Option<CityResults>,
}

/// `/api/feedbacks/all`
#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    feedbacks: Vec<FeedbackRecord>,
}

/// `/api/candidates`
#[derive(Debug, Deserialize)]
struct CandidatesResponse {
    data: Vec<Candidate>,
}

fn read_contents(path: &str) -> PakraazResult<String> {
    info!("Attempting to read {:?}", path);
    fs::read_to_string(path).context(OpeningJsonSnafu { path })
}

fn parse_json<T: DeserializeOwned>(contents: &str, path: &str) -> PakraazResult<T> {
    serde_json::from_str(contents).context(ParsingJsonSnafu { path })
}

pub fn read_json_value(path: &str) -> PakraazResult<JSValue> {
    let contents = read_contents(path)?;
    parse_json(&contents, path)
}

pub fn parse_results(contents: &str, path: &str) -> PakraazResult<CityResults> {
    let response: ResultsResponse = parse_json(contents, path)?;
    ensure!(response.success, ResultsNotSuccessfulSnafu { path });
    let results = response.data.context(MissingDataSnafu { path })?;
    debug!("parse_results: {} cities", results.len());
    Ok(results)
}

pub fn read_results(path: &str) -> PakraazResult<CityResults> {
    let contents = read_contents(path)?;
    parse_results(&contents, path)
}

pub fn parse_feedback(contents: &str, path: &str) -> PakraazResult<Vec<FeedbackRecord>> {
    let response: FeedbackResponse = parse_json(contents, path)?;
    debug!("parse_feedback: {} entries", response.feedbacks.len());
    Ok(response.feedbacks)
}

pub fn read_feedback(path: &str) -> PakraazResult<Vec<FeedbackRecord>> {
    let contents = read_contents(path)?;
    parse_feedback(&contents, path)
}

pub fn read_profile(path: &str) -> PakraazResult<VoterProfile> {
    let contents = read_contents(path)?;
    parse_json(&contents, path)
}

pub fn parse_candidates(contents: &str, path: &str) -> PakraazResult<Vec<Candidate>> {
    let response: CandidatesResponse = parse_json(contents, path)?;
    debug!("parse_candidates: {} candidates", response.data.len());
    Ok(response.data)
}

pub fn read_candidates(path: &str) -> PakraazResult<Vec<Candidate>> {
    let contents = read_contents(path)?;
    parse_candidates(&contents, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_envelope() {
        let results = parse_results(
            r#"{"success": true, "data": {"Multan": {"A": 4, "B": 9}}}"#,
            "mem",
        )
        .unwrap();
        assert_eq!(results.get("Multan").map(|t| t.total()), Some(13));
    }

    #[test]
    fn results_envelope_violations() {
        assert!(matches!(
            parse_results(r#"{"success": false, "data": {}}"#, "mem"),
            Err(PakraazError::ResultsNotSuccessful { .. })
        ));
        assert!(matches!(
            parse_results(r#"{"success": true}"#, "mem"),
            Err(PakraazError::MissingData { .. })
        ));
        // A bare map of cities is not a results response.
        assert!(matches!(
            parse_results(r#"{"Multan": {"A": 4}}"#, "mem"),
            Err(PakraazError::ParsingJson { .. })
        ));
        assert!(matches!(
            parse_results(r#"{"success": true, "data": {"Multan": {"A": -4}}}"#, "mem"),
            Err(PakraazError::ParsingJson { .. })
        ));
    }

    #[test]
    fn feedback_envelope() {
        let records = parse_feedback(
            r#"{"feedbacks": [{"_id": "x", "message": "hi", "submittedAt": "2024-01-01T00:00:00Z"}]}"#,
            "mem",
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_anonymous());

        // A bare array is not accepted.
        assert!(parse_feedback("[]", "mem").is_err());
    }

    #[test]
    fn candidates_envelope() {
        let cands = parse_candidates(
            r#"{"data": [{"_id": "c1", "name": "Imran", "party": "PTI", "city": "Lahore"}]}"#,
            "mem",
        )
        .unwrap();
        assert_eq!(cands[0].party.as_deref(), Some("PTI"));
        assert_eq!(cands[0].symbol, None);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_results("/nonexistent/results.json"),
            Err(PakraazError::OpeningJson { .. })
        ));
    }
}
