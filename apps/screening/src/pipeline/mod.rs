//! Screening Pipeline — the orchestration layer tying client, validators,
//! scorer, and store together.
//!
//! Candidates are processed strictly one at a time: each CV's
//! anonymize → analyze pipeline runs to completion before the next begins, so
//! results always arrive in input order and the remote service sees at most
//! one request in flight. A failure mid-batch stops the loop but the records
//! completed so far are returned to the caller; the batch is persisted only
//! when every candidate succeeded.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::AnalysisApi;
use crate::errors::AppError;
use crate::models::{CandidateCv, CandidateRecord, InterviewRecord, QuestionnaireAnswers};
use crate::scoring::compute_total_score;
use crate::store::{keys, StateStore, StoreError};
use crate::validation::schemas::{
    candidate_analysis_schema, job_analysis_schema, job_description_schema,
};
use crate::validation::validate;

/// Shown when the analysis flow starts without its inputs.
const MISSING_INPUT_MESSAGE: &str =
    "Missing job description or candidate CVs. Please ensure all data is uploaded.";

/// Result of one analysis batch. `failure`, when set, names the candidate the
/// batch stopped at; `records` holds everything completed before that point
/// and is still usable for display.
#[derive(Debug)]
pub struct BatchOutcome {
    pub job_analysis: Value,
    pub records: Vec<CandidateRecord>,
    pub failure: Option<BatchFailure>,
    /// True when a previously persisted batch was returned instead of
    /// re-calling the analysis service.
    pub from_cache: bool,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub file_name: String,
    pub error: AppError,
}

pub struct ScreeningPipeline {
    api: Arc<dyn AnalysisApi>,
    store: Arc<dyn StateStore>,
}

impl ScreeningPipeline {
    pub fn new(api: Arc<dyn AnalysisApi>, store: Arc<dyn StateStore>) -> Self {
        Self { api, store }
    }

    /// Generates a job description from questionnaire answers, validates it,
    /// and persists both the object and its plain-text rendering (the text is
    /// what the job analysis later consumes).
    pub async fn generate_job_description(
        &self,
        answers: &QuestionnaireAnswers,
    ) -> Result<Value, AppError> {
        let description = self.api.generate_job_description(answers).await?;

        let validation = validate(&job_description_schema(), &description);
        if !validation.is_valid {
            return Err(AppError::Validation(format!(
                "Error in job description validation: {}",
                validation.message()
            )));
        }

        self.store
            .set(keys::GENERATED_JOB_DESCRIPTION, description.clone())?;
        self.store.set(
            keys::JOB_DESCRIPTION_TEXT,
            Value::String(render_job_description(&description)),
        )?;
        info!(role = %answers.role, "job description generated and stored");
        Ok(description)
    }

    /// Runs the full screening batch over the stored job description and CVs.
    ///
    /// If a completed batch is already persisted it is returned as-is —
    /// analysis never runs twice for the same session unless the state is
    /// reset first.
    pub async fn analyze_all(&self) -> Result<BatchOutcome, AppError> {
        let job_description = self
            .store
            .get(keys::JOB_DESCRIPTION_TEXT)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|text| !text.is_empty());
        let cvs: Vec<CandidateCv> = match self.store.get(keys::CANDIDATE_CVS) {
            Some(value) => serde_json::from_value(value).map_err(StoreError::Json)?,
            None => Vec::new(),
        };

        let job_description = match job_description {
            Some(text) if !cvs.is_empty() => text,
            _ => return Err(AppError::MissingInput(MISSING_INPUT_MESSAGE.to_string())),
        };

        if let (Some(job_analysis), Some(stored)) = (
            self.store.get(keys::JOB_ANALYSIS),
            self.store.get(keys::CANDIDATE_ANALYSES),
        ) {
            let records = serde_json::from_value(stored).map_err(StoreError::Json)?;
            info!("returning previously persisted analysis batch");
            return Ok(BatchOutcome {
                job_analysis,
                records,
                failure: None,
                from_cache: true,
            });
        }

        let job_analysis = self.api.analyze_job_description(&job_description).await?;
        let validation = validate(&job_analysis_schema(), &job_analysis);
        if !validation.is_valid {
            return Err(AppError::Validation(format!(
                "Error in job result validation: {}",
                validation.message()
            )));
        }
        self.store.set(keys::JOB_ANALYSIS, job_analysis.clone())?;

        let mut records = Vec::with_capacity(cvs.len());
        for cv in &cvs {
            match self.process_candidate(&job_analysis, cv).await {
                Ok(record) => {
                    info!(file = %cv.file_name, score = record.total_score, "candidate analyzed");
                    records.push(record);
                }
                Err(error) => {
                    warn!(file = %cv.file_name, %error, "batch stopped; partial results kept");
                    return Ok(BatchOutcome {
                        job_analysis,
                        records,
                        failure: Some(BatchFailure {
                            file_name: cv.file_name.clone(),
                            error,
                        }),
                        from_cache: false,
                    });
                }
            }
        }

        self.store.set(
            keys::CANDIDATE_ANALYSES,
            serde_json::to_value(&records).map_err(StoreError::Json)?,
        )?;

        Ok(BatchOutcome {
            job_analysis,
            records,
            failure: None,
            from_cache: false,
        })
    }

    /// One candidate's two-step pipeline: anonymize, then analyze the
    /// anonymized text against the job analysis.
    async fn process_candidate(
        &self,
        job_analysis: &Value,
        cv: &CandidateCv,
    ) -> Result<CandidateRecord, AppError> {
        let anonymized = self.api.anonymize_cv(&cv.text).await?;
        let anonymized_text = anonymized["anonymizedCV"]
            .as_str()
            .ok_or_else(|| {
                AppError::Validation("anonymizeCV response is missing anonymizedCV".to_string())
            })?
            .to_string();

        let analysis = self
            .api
            .analyze_candidate_cv(job_analysis, &anonymized_text)
            .await?;
        let validation = validate(&candidate_analysis_schema(), &analysis);
        if !validation.is_valid {
            return Err(AppError::Validation(format!(
                "Error in candidate result validation: ({}): {}",
                cv.file_name,
                validation.message()
            )));
        }

        let total_score = compute_total_score(&analysis)?;

        Ok(CandidateRecord {
            file_name: cv.file_name.clone(),
            original_cv: cv.text.clone(),
            anonymized_cv: anonymized_text,
            candidate_analysis: analysis,
            total_score,
        })
    }

    /// Generates interview questions for an already analyzed candidate and
    /// appends the result to the session's interview list.
    pub async fn generate_interview(
        &self,
        file_name: &str,
        use_censored_cv: bool,
        number_of_questions: u32,
    ) -> Result<InterviewRecord, AppError> {
        let job_analysis = self
            .store
            .get(keys::JOB_ANALYSIS)
            .ok_or_else(|| AppError::MissingInput("Missing job analysis data.".to_string()))?;
        let records: Vec<CandidateRecord> = self
            .store
            .get(keys::CANDIDATE_ANALYSES)
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::Json)?
            .unwrap_or_default();

        let record = records
            .iter()
            .find(|r| r.file_name == file_name)
            .ok_or_else(|| {
                AppError::MissingInput(format!("No analyzed candidate named \"{file_name}\"."))
            })?;

        let variant = if use_censored_cv { "censored" } else { "uncensored" };
        let cv_text = if use_censored_cv {
            &record.anonymized_cv
        } else {
            &record.original_cv
        };
        if cv_text.is_empty() {
            return Err(AppError::MissingInput(format!(
                "The chosen CV (\"{variant}\") is empty or not provided."
            )));
        }

        let response = self
            .api
            .generate_interview_questions(&job_analysis, cv_text, number_of_questions)
            .await?;
        // Absent or malformed `questions` degrades to an empty list rather
        // than failing the whole flow.
        let questions = response["questions"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|q| q.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let interview = InterviewRecord {
            candidate_file_name: file_name.to_string(),
            used_censored_cv: use_censored_cv,
            number_of_questions,
            questions,
        };

        let mut interviews: Vec<InterviewRecord> = self
            .store
            .get(keys::GENERATED_INTERVIEWS)
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::Json)?
            .unwrap_or_default();
        interviews.push(interview.clone());
        self.store.set(
            keys::GENERATED_INTERVIEWS,
            serde_json::to_value(&interviews).map_err(StoreError::Json)?,
        )?;

        info!(file = %file_name, count = interview.questions.len(), "interview generated");
        Ok(interview)
    }

    /// Wipes the whole session. The only "cancel" the flow has.
    pub fn reset(&self) -> Result<(), AppError> {
        self.store.clear()?;
        Ok(())
    }
}

/// Plain-text rendering of a generated job description, in the shape the job
/// analysis prompt expects free text.
pub fn render_job_description(description: &Value) -> String {
    let field = |name: &str| description[name].as_str().unwrap_or_default().to_string();
    let list = |name: &str| {
        description[name]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| format!("- {s}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    };

    format!(
        "{role} at {company}\n\n{brief}\n\nResponsibilities:\n{responsibilities}\n\nQualifications:\n{qualifications}\n",
        role = field("role"),
        company = field("companyName"),
        brief = field("briefDescription"),
        responsibilities = list("responsibilities"),
        qualifications = list("qualifications"),
    )
}
