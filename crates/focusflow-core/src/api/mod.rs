//! Backend HTTP surface: wire types and the client.
//!
//! All schema quirks of the backend (optional fields, dual key spellings,
//! number-or-string durations, fraction-or-percent posture scores) are
//! canonicalized here, at deserialization time. Nothing past this module
//! branches on wire shape.

pub mod client;

pub use client::BackendClient;

use serde::{Deserialize, Deserializer, Serialize};

use crate::metrics::PostureScore;

/// Live session status, polled during focus (1s) and break (2s).
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub mode: String,
    #[serde(default)]
    pub remaining_seconds: u32,
    #[serde(default)]
    pub reps: u32,
    /// Normalized at ingress; absent when the backend has no sample yet.
    #[serde(default, deserialize_with = "de_posture")]
    pub posture_score: Option<PostureScore>,
    #[serde(default)]
    pub running: bool,
}

/// Final exercise outcome, fetched once when the break completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseResult {
    /// Accepts both `exercise_type` and `exerciseType`.
    #[serde(alias = "exerciseType")]
    pub exercise_type: String,
    pub count: u32,
    pub goal: u32,
    /// Seconds; the backend sometimes sends this as a string.
    #[serde(rename = "duration", deserialize_with = "de_duration_secs")]
    pub duration_seconds: u32,
    pub completed: bool,
}

/// Acknowledgement body for start/stop calls.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionAck {
    pub status: String,
}

fn de_posture<'de, D>(deserializer: D) -> Result<Option<PostureScore>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(PostureScore::from_raw))
}

fn de_duration_secs<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Float(f) => Ok(f.max(0.0).round() as u32),
        // Numeric strings are seconds; "MM:SS" strings are parsed as such.
        Raw::Text(s) => s
            .trim()
            .parse::<u32>()
            .ok()
            .or_else(|| s.split_once(':').and_then(|_| crate::timer::parse_mmss(&s)))
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable duration '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_with_fraction_posture() {
        let status: SessionStatus = serde_json::from_str(
            r#"{"mode":"focus","running":true,"posture_score":0.75,"reps":0}"#,
        )
        .unwrap();
        assert_eq!(status.posture_score, Some(PostureScore::Fraction(0.75)));
        assert_eq!(status.remaining_seconds, 0);
    }

    #[test]
    fn status_with_percent_posture() {
        let status: SessionStatus =
            serde_json::from_str(r#"{"mode":"focus","running":true,"posture_score":82.0,"reps":3}"#)
                .unwrap();
        assert_eq!(status.posture_score, Some(PostureScore::Percentage(82.0)));
        assert_eq!(status.reps, 3);
    }

    #[test]
    fn status_without_posture() {
        let status: SessionStatus =
            serde_json::from_str(r#"{"mode":"idle","running":false}"#).unwrap();
        assert!(status.posture_score.is_none());
    }

    #[test]
    fn result_accepts_snake_case_key() {
        let result: ExerciseResult = serde_json::from_str(
            r#"{"exercise_type":"squats","count":15,"goal":20,"duration":600,"completed":false}"#,
        )
        .unwrap();
        assert_eq!(result.exercise_type, "squats");
        assert_eq!(result.duration_seconds, 600);
    }

    #[test]
    fn result_accepts_camel_case_key() {
        let result: ExerciseResult = serde_json::from_str(
            r#"{"exerciseType":"pushups","count":22,"goal":20,"duration":"10:00","completed":true}"#,
        )
        .unwrap();
        assert_eq!(result.exercise_type, "pushups");
        assert_eq!(result.duration_seconds, 600);
        assert!(result.completed);
    }

    #[test]
    fn result_accepts_numeric_string_duration() {
        let result: ExerciseResult = serde_json::from_str(
            r#"{"exercise_type":"situps","count":5,"goal":20,"duration":"90","completed":false}"#,
        )
        .unwrap();
        assert_eq!(result.duration_seconds, 90);
    }
}
