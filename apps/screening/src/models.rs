//! Shared data models. Serde names match the JSON the persisted state and the
//! remote analysis service already use, so stored sessions stay readable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One uploaded candidate CV: the source file name and its extracted text.
/// (PDF text extraction happens upstream; this crate only sees plain text.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateCv {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub text: String,
}

/// Fully processed candidate: both CV variants, the validated AI analysis,
/// and the weighted total score used for ranking. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "originalCV")]
    pub original_cv: String,
    #[serde(rename = "anonymizedCV")]
    pub anonymized_cv: String,
    #[serde(rename = "candidateAnalysis")]
    pub candidate_analysis: Value,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
}

/// One generated interview: which candidate, which CV variant was sent to the
/// service, and the questions that came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRecord {
    #[serde(rename = "candidateFileName")]
    pub candidate_file_name: String,
    #[serde(rename = "usedCensoredCV")]
    pub used_censored_cv: bool,
    #[serde(rename = "numberOfQuestions")]
    pub number_of_questions: u32,
    pub questions: Vec<String>,
}

/// Questionnaire answers used to generate a job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireAnswers {
    pub company_name: String,
    pub sector: String,
    pub role: String,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
}
