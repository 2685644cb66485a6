//! Score Calculator — collapses a candidate's per-category evaluation scores
//! into the single weighted total used for ranking.

use std::cmp::Ordering;

use serde_json::Value;
use thiserror::Error;

use crate::models::CandidateRecord;

/// Category weights. Fixed, process-wide; they sum to 1.0 so a candidate
/// scored 0–10 in every category totals 0–10.
pub const SCORE_WEIGHTS: &[(&str, f64)] = &[
    ("technicalSkills", 0.30),
    ("workExperience", 0.25),
    ("culturalFit", 0.10),
    ("education", 0.20),
    ("additionalSkills", 0.15),
];

/// How many candidates the ranking view highlights.
pub const TOP_CANDIDATES: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// The analysis passed schema validation but lacks a scorable entry for a
    /// canonical category. The schema is deliberately lenient about which
    /// categories are present; this is where the canonical five are enforced.
    #[error("evaluationScores.{0}.score is missing or not a number")]
    MissingScore(String),
}

/// Computes the weighted total score for a validated candidate analysis,
/// rounded to two decimal places.
///
/// Expects `candidateAnalysis.evaluationScores.<category>.score` to be numeric
/// for all five weighted categories.
pub fn compute_total_score(candidate_analysis: &Value) -> Result<f64, ScoreError> {
    let mut total = 0.0;
    for (category, weight) in SCORE_WEIGHTS {
        let score = candidate_analysis["evaluationScores"][*category]["score"]
            .as_f64()
            .ok_or_else(|| ScoreError::MissingScore((*category).to_string()))?;
        total += score * weight;
    }
    Ok(round2(total))
}

/// Rounds half away from zero to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sorts records by total score, best first. Equal scores keep input order.
pub fn rank(mut records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    records.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
    });
    records
}

/// Splits ranked records into the highlighted top candidates and the rest.
pub fn split_ranking(records: Vec<CandidateRecord>) -> (Vec<CandidateRecord>, Vec<CandidateRecord>) {
    let mut ranked = rank(records);
    let rest = ranked.split_off(ranked.len().min(TOP_CANDIDATES));
    (ranked, rest)
}
