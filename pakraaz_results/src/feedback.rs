use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::config::{
    FeedbackError, FeedbackFilterMode, FeedbackRecord, FeedbackStats, FeedbackSubmission,
    VoterProfile, RECENT_WINDOW_DAYS,
};

/// Selects the feedback matching a filter, evaluated against the current time.
pub fn filter_feedback(
    records: &[FeedbackRecord],
    mode: FeedbackFilterMode,
) -> Vec<&FeedbackRecord> {
    filter_feedback_at(records, mode, Utc::now())
}

/// Selects the feedback matching a filter, `now` being the time of evaluation
/// of the [`FeedbackFilterMode::Recent`] window.
///
/// The order of the records is preserved.
pub fn filter_feedback_at(
    records: &[FeedbackRecord],
    mode: FeedbackFilterMode,
    now: DateTime<Utc>,
) -> Vec<&FeedbackRecord> {
    let res: Vec<&FeedbackRecord> = match mode {
        FeedbackFilterMode::All => records.iter().collect(),
        FeedbackFilterMode::WithId => records.iter().filter(|r| !r.is_anonymous()).collect(),
        FeedbackFilterMode::Anonymous => records.iter().filter(|r| r.is_anonymous()).collect(),
        FeedbackFilterMode::Recent => {
            let cutoff = recent_cutoff(now);
            records.iter().filter(|r| r.submitted_at > cutoff).collect()
        }
    };
    debug!(
        "filter_feedback_at: {:?}: kept {} of {} records",
        mode,
        res.len(),
        records.len()
    );
    res
}

fn recent_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_WINDOW_DAYS)
}

pub fn feedback_stats(records: &[FeedbackRecord], now: DateTime<Utc>) -> FeedbackStats {
    let with_id = records.iter().filter(|r| !r.is_anonymous()).count();
    let cutoff = recent_cutoff(now);
    FeedbackStats {
        total: records.len(),
        with_id,
        anonymous: records.len() - with_id,
        recent: records.iter().filter(|r| r.submitted_at > cutoff).count(),
    }
}

impl FeedbackSubmission {
    /// Checks a feedback message before it is sent.
    ///
    /// The message is kept as typed; it is only rejected when it holds
    /// nothing but whitespace. The identity of the voter, when known, is
    /// attached to the submission.
    pub fn new(
        message: &str,
        voter: Option<&VoterProfile>,
        now: DateTime<Utc>,
    ) -> Result<FeedbackSubmission, FeedbackError> {
        if message.trim().is_empty() {
            return Err(FeedbackError::EmptyMessage);
        }
        Ok(FeedbackSubmission {
            feedback: message.to_string(),
            voter_id: voter.and_then(|v| v.voter_id.clone()),
            name: voter.and_then(|v| v.name.clone()),
            city: voter.and_then(|v| v.city.clone()),
            date: now,
        })
    }
}
