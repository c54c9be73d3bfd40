use log::{debug, info, warn};

use pakraaz_results::*;
use snafu::{prelude::*, Snafu};

use chrono::{DateTime, Utc};
use serde_json::json;
use serde_json::Value as JSValue;
use std::fs;
use text_diff::print_diff;

use crate::args::{Args, Command, OutputArgs};
use crate::pakraaz::config_reader::*;
use crate::pakraaz::io_api::*;

pub mod config_reader;
pub mod io_api;

#[derive(Debug, Snafu)]
pub enum PakraazError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The results in {path} are marked as not successful"))]
    ResultsNotSuccessful { path: String },
    #[snafu(display("The response in {path} does not contain any data"))]
    MissingData { path: String },
    #[snafu(display("Cannot use tiebreak mode {mode:?}: expected inputOrder or alphabetical"))]
    UnknownTieBreak { mode: String },
    #[snafu(display("Cannot list the candidates of the voter"))]
    Constituency { source: ConstituencyError },
    #[snafu(display("Cannot prepare the feedback"))]
    Feedback { source: FeedbackError },
    #[snafu(display("Error serializing the report"))]
    SerializingReport { source: serde_json::Error },
    #[snafu(display("Error writing the report to {path}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the computed report and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type PakraazResult<T> = Result<T, PakraazError>;

fn ranking_to_json(city: &str, ranking: &Ranking) -> JSValue {
    let total = ranking.total_votes();
    let mut ranked: Vec<JSValue> = Vec::new();
    for entry in ranking.ranked.iter() {
        ranked.push(json!({
            "candidateName": entry.candidate_name,
            "voteCount": entry.vote_count,
            "percentage": percentage(entry, total),
        }));
    }
    json!({
        "city": city,
        "winner": ranking.winner,
        "loser": ranking.loser,
        "tied": ranking.is_tied(),
        "totalVotes": total,
        "ranked": ranked,
    })
}

/// The report on all the cities: the summary, then the ranking of each city.
pub fn build_results_report(results: &CityResults, tiebreak: TieBreakMode) -> JSValue {
    let stats = summarize(results);
    info!(
        "Processing {} cities with {} votes",
        stats.city_count, stats.total_votes
    );
    let mut cities: Vec<JSValue> = Vec::new();
    for (city, tally) in results.cities() {
        let ranking = rank(tally, tiebreak);
        if ranking.is_tied() {
            warn!(
                "{}: tie for the first place, {:?} wins by the {:?} tie break",
                city, ranking.winner, tiebreak
            );
        }
        debug!("{}: {:?}", city, ranking);
        cities.push(ranking_to_json(city, &ranking));
    }
    json!({ "summary": stats, "cities": cities })
}

pub fn build_feedback_report(
    records: &[FeedbackRecord],
    mode: FeedbackFilterMode,
    now: DateTime<Utc>,
) -> JSValue {
    let selected = filter_feedback_at(records, mode, now);
    info!(
        "Selected {} of {} feedback entries with filter {}",
        selected.len(),
        records.len(),
        mode.name()
    );
    json!({
        "filter": mode.name(),
        "stats": feedback_stats(records, now),
        "feedbacks": selected,
    })
}

pub fn build_ballot_report(
    profile: &VoterProfile,
    candidates: &[Candidate],
) -> PakraazResult<JSValue> {
    let eligible = candidates_for_city(candidates, profile.city.as_deref())
        .context(ConstituencySnafu {})?;
    let city = normalize_city(profile.city.as_deref());
    if eligible.is_empty() {
        warn!("No candidates found for the city {:?}", city);
    }
    Ok(json!({
        "voterID": profile.voter_id,
        "city": city,
        "candidates": eligible,
    }))
}

fn run_results(
    input: &str,
    search: &Option<String>,
    tiebreak: TieBreakMode,
) -> PakraazResult<JSValue> {
    let results = read_results(input)?;
    let results = match search {
        Some(term) => {
            let filtered = filter_cities(&results, term);
            info!(
                "Search {:?}: {} of {} cities",
                term,
                filtered.len(),
                results.len()
            );
            filtered
        }
        None => results,
    };
    Ok(build_results_report(&results, tiebreak))
}

fn run_feedback(input: &str, mode: FeedbackFilterMode) -> PakraazResult<JSValue> {
    let records = read_feedback(input)?;
    Ok(build_feedback_report(&records, mode, Utc::now()))
}

fn run_ballot(profile_path: &str, candidates_path: &str) -> PakraazResult<JSValue> {
    let profile = read_profile(profile_path)?;
    let candidates = read_candidates(candidates_path)?;
    build_ballot_report(&profile, &candidates)
}

fn run_submission(message: &str, profile_path: &Option<String>) -> PakraazResult<JSValue> {
    let profile = match profile_path {
        Some(p) => Some(read_profile(p)?),
        None => None,
    };
    let submission =
        FeedbackSubmission::new(message, profile.as_ref(), Utc::now()).context(FeedbackSnafu {})?;
    serde_json::to_value(&submission).context(SerializingReportSnafu {})
}

/// Writes the report and, if a reference is given, compares the two.
fn emit_report(
    report: &JSValue,
    output: &OutputArgs,
    config: &PakraazConfig,
) -> PakraazResult<()> {
    let pretty_js = serde_json::to_string_pretty(report).context(SerializingReportSnafu {})?;

    match output.out.as_deref().or(config.output_path.as_deref()) {
        None | Some("stdout") | Some("") => println!("{}", pretty_js),
        Some(path) => {
            info!("Writing the report to {:?}", path);
            fs::write(path, &pretty_js).context(WritingReportSnafu { path })?;
        }
    }

    if let Some(reference_path) = &output.reference {
        check_reference(&pretty_js, reference_path)?;
    }
    Ok(())
}

/// Compares a pretty-printed report with the report stored in a file.
///
/// Both sides go through the same JSON formatting, so only the content matters.
pub fn check_reference(pretty_js: &str, reference_path: &str) -> PakraazResult<()> {
    let reference = read_json_value(reference_path)?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(SerializingReportSnafu {})?;
    if pretty_reference != pretty_js {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The report matches the reference {}", reference_path);
    Ok(())
}

pub fn run(args: &Args) -> PakraazResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => PakraazConfig::default(),
    };
    debug!("config: {:?}", config);

    match &args.command {
        Command::Results {
            input,
            search,
            tiebreak,
            output,
        } => {
            let tiebreak = match tiebreak.as_deref().or(config.tiebreak_mode.as_deref()) {
                Some(mode) => validate_tiebreak(mode)?,
                None => TieBreakMode::default(),
            };
            let report = run_results(input, search, tiebreak)?;
            emit_report(&report, output, &config)
        }
        Command::Feedback {
            input,
            filter,
            output,
        } => {
            let mode = filter
                .as_deref()
                .or(config.feedback_filter.as_deref())
                .map(FeedbackFilterMode::parse)
                .unwrap_or_default();
            let report = run_feedback(input, mode)?;
            emit_report(&report, output, &config)
        }
        Command::Ballot {
            profile,
            candidates,
            output,
        } => {
            let report = run_ballot(profile, candidates)?;
            emit_report(&report, output, &config)
        }
        Command::Submit {
            message,
            profile,
            output,
        } => {
            let report = run_submission(message, profile)?;
            emit_report(&report, output, &config)
        }
    }
}
